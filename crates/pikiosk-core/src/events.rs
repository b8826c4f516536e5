//! Input event definitions

/// A discrete event decoded from the rotary encoder and its push button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncoderEvent {
    /// One detent clockwise
    RotateCw,
    /// One detent counter-clockwise
    RotateCcw,
    /// Button released before the long-press threshold
    PressShort,
    /// Button held until the long-press threshold (emitted at the threshold)
    PressLong,
}

/// Output of the encoder input source.
///
/// The source emits `Encoder` events until the hardware fails, then exactly
/// one `HardwareLost` and nothing after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Encoder(EncoderEvent),
    HardwareLost { reason: String },
}

impl From<EncoderEvent> for InputEvent {
    fn from(event: EncoderEvent) -> Self {
        InputEvent::Encoder(event)
    }
}
