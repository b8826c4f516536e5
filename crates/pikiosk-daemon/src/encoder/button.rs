//! Short/long press classification for the encoder push button

use std::time::{Duration, Instant};

use pikiosk_core::EncoderEvent;

/// Default hold time that turns a press into a long press.
pub const DEFAULT_LONG_PRESS: Duration = Duration::from_millis(1000);

/// Tracks one press at a time.
///
/// A release before the threshold yields `PressShort`. Holding until the
/// threshold yields `PressLong` immediately, and the release that follows
/// yields nothing.
#[derive(Debug, Clone)]
pub struct ButtonTracker {
    long_press: Duration,
    pressed_at: Option<Instant>,
    long_fired: bool,
}

impl ButtonTracker {
    pub fn new(long_press: Duration) -> Self {
        Self {
            long_press,
            pressed_at: None,
            long_fired: false,
        }
    }

    /// Feed the debounced button level (`true` = pressed).
    pub fn update(&mut self, pressed: bool, now: Instant) -> Option<EncoderEvent> {
        match (pressed, self.pressed_at) {
            (true, None) => {
                self.pressed_at = Some(now);
                self.long_fired = false;
                None
            }
            (true, Some(since)) => {
                if !self.long_fired && now.saturating_duration_since(since) >= self.long_press {
                    self.long_fired = true;
                    Some(EncoderEvent::PressLong)
                } else {
                    None
                }
            }
            (false, Some(_)) => {
                self.pressed_at = None;
                if std::mem::take(&mut self.long_fired) {
                    None
                } else {
                    Some(EncoderEvent::PressShort)
                }
            }
            (false, None) => None,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed_at.is_some()
    }
}

impl Default for ButtonTracker {
    fn default() -> Self {
        Self::new(DEFAULT_LONG_PRESS)
    }
}
