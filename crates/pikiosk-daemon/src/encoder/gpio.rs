//! GPIO sampling of the encoder lines

use std::path::PathBuf;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use embedded_hal::digital::InputPin;
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::CdevPin;
use tokio::sync::mpsc;

use pikiosk_core::prelude::*;
use pikiosk_core::{EncoderEvent, InputEvent};

use super::button::{ButtonTracker, DEFAULT_LONG_PRESS};
use super::debounce::Debounced;
use super::quadrature::QuadratureDecoder;

const CONSUMER: &str = "pikiosk";

/// Encoder wiring and timing.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// GPIO character device
    pub chip: PathBuf,
    pub clk_pin: u32,
    pub dt_pin: u32,
    pub sw_pin: u32,
    /// Swap rotation direction
    pub reverse: bool,
    pub sample_interval: Duration,
    pub rotation_debounce: Duration,
    pub button_debounce: Duration,
    pub long_press: Duration,
    /// Button pulls the line low when pressed
    pub button_active_low: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            chip: PathBuf::from("/dev/gpiochip0"),
            clk_pin: 17,
            dt_pin: 27,
            sw_pin: 22,
            reverse: false,
            sample_interval: Duration::from_millis(1),
            rotation_debounce: Duration::from_millis(2),
            button_debounce: Duration::from_millis(30),
            long_press: DEFAULT_LONG_PRESS,
            button_active_low: true,
        }
    }
}

/// Debounces and decodes three input pins into encoder events.
///
/// Hardware-independent: works with any `embedded-hal` input pin.
pub struct EncoderSampler<A, B, S> {
    clk: A,
    dt: B,
    sw: S,
    clk_line: Debounced,
    dt_line: Debounced,
    sw_line: Debounced,
    decoder: QuadratureDecoder,
    button: ButtonTracker,
    active_low: bool,
}

impl<A, B, S> EncoderSampler<A, B, S>
where
    A: InputPin,
    B: InputPin,
    S: InputPin,
{
    pub fn new(mut clk: A, mut dt: B, sw: S, config: &EncoderConfig, now: Instant) -> Result<Self> {
        let clk_level = read_line(&mut clk, "CLK")?;
        let dt_level = read_line(&mut dt, "DT")?;

        Ok(Self {
            clk,
            dt,
            sw,
            clk_line: Debounced::new(clk_level, config.rotation_debounce, now),
            dt_line: Debounced::new(dt_level, config.rotation_debounce, now),
            // Start released so a button held at boot is timed from now.
            sw_line: Debounced::new(false, config.button_debounce, now),
            decoder: QuadratureDecoder::new(config.reverse),
            button: ButtonTracker::new(config.long_press),
            active_low: config.button_active_low,
        })
    }

    /// Sample every line once and pass decoded events to `emit`.
    ///
    /// A failed read is reported as [`Error::HardwareLost`]; no event is
    /// emitted for that sample.
    pub fn sample(&mut self, now: Instant, mut emit: impl FnMut(EncoderEvent)) -> Result<()> {
        let clk_raw = read_line(&mut self.clk, "CLK")?;
        let dt_raw = read_line(&mut self.dt, "DT")?;
        let sw_high = read_line(&mut self.sw, "SW")?;

        let clk = self.clk_line.update(clk_raw, now);
        let dt = self.dt_line.update(dt_raw, now);
        if let Some(event) = self.decoder.update(clk, dt) {
            emit(event);
        }

        let pressed = self.sw_line.update(sw_high != self.active_low, now);
        if let Some(event) = self.button.update(pressed, now) {
            emit(event);
        }

        Ok(())
    }
}

fn read_line<P: InputPin>(pin: &mut P, name: &str) -> Result<bool> {
    pin.is_high().map_err(|e| Error::HardwareLost {
        reason: format!("{} line read failed: {:?}", name, e),
    })
}

/// The encoder attached to the GPIO character device.
pub struct EncoderInput {
    sampler: EncoderSampler<CdevPin, CdevPin, CdevPin>,
    interval: Duration,
}

impl EncoderInput {
    /// Request the three input lines. Fails with [`Error::Encoder`].
    pub fn open(config: &EncoderConfig) -> Result<Self> {
        let mut chip = Chip::new(&config.chip)
            .map_err(|e| Error::encoder(format!("{}: {}", config.chip.display(), e)))?;

        let clk = request_input(&mut chip, config.clk_pin)?;
        let dt = request_input(&mut chip, config.dt_pin)?;
        let sw = request_input(&mut chip, config.sw_pin)?;

        info!(
            "Encoder lines requested on {} (CLK={}, DT={}, SW={})",
            config.chip.display(),
            config.clk_pin,
            config.dt_pin,
            config.sw_pin
        );

        let sampler = EncoderSampler::new(clk, dt, sw, config, Instant::now())
            .map_err(|e| Error::encoder(e.to_string()))?;

        Ok(Self {
            sampler,
            interval: config.sample_interval,
        })
    }

    /// Start sampling on a dedicated thread.
    ///
    /// Events are sent in order. On a read failure a single
    /// [`InputEvent::HardwareLost`] is sent and the thread exits. The thread
    /// also exits once the receiver is dropped.
    pub fn spawn(self, tx: mpsc::Sender<InputEvent>) -> Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name("encoder".to_string())
            .spawn(move || self.run(tx))
            .map_err(Error::from)
    }

    fn run(mut self, tx: mpsc::Sender<InputEvent>) {
        debug!("Encoder sampling every {:?}", self.interval);
        loop {
            let mut closed = false;
            let result = self.sampler.sample(Instant::now(), |event| {
                trace!("Encoder event: {:?}", event);
                if tx.blocking_send(event.into()).is_err() {
                    closed = true;
                }
            });

            if let Err(e) = result {
                error!("{}", e);
                let reason = match e {
                    Error::HardwareLost { reason } => reason,
                    other => other.to_string(),
                };
                let _ = tx.blocking_send(InputEvent::HardwareLost { reason });
                return;
            }

            if closed {
                debug!("Encoder receiver dropped, stopping sampler");
                return;
            }

            std::thread::sleep(self.interval);
        }
    }
}

fn request_input(chip: &mut Chip, offset: u32) -> Result<CdevPin> {
    let handle = chip
        .get_line(offset)
        .and_then(|line| line.request(LineRequestFlags::INPUT, 0, CONSUMER))
        .map_err(|e| Error::encoder(format!("GPIO line {}: {}", offset, e)))?;

    CdevPin::new(handle).map_err(|e| Error::encoder(format!("GPIO line {}: {}", offset, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::{ErrorKind, ErrorType};
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug)]
    struct PinFault;

    impl embedded_hal::digital::Error for PinFault {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    /// Pin whose level is set from the test; `None` makes reads fail.
    #[derive(Clone)]
    struct ScriptedPin(Rc<Cell<Option<bool>>>);

    impl ScriptedPin {
        fn high() -> Self {
            Self(Rc::new(Cell::new(Some(true))))
        }

        fn set(&self, level: bool) {
            self.0.set(Some(level));
        }

        fn fail(&self) {
            self.0.set(None);
        }
    }

    impl ErrorType for ScriptedPin {
        type Error = PinFault;
    }

    impl InputPin for ScriptedPin {
        fn is_high(&mut self) -> std::result::Result<bool, PinFault> {
            self.0.get().ok_or(PinFault)
        }

        fn is_low(&mut self) -> std::result::Result<bool, PinFault> {
            self.is_high().map(|high| !high)
        }
    }

    struct Rig {
        clk: ScriptedPin,
        dt: ScriptedPin,
        sw: ScriptedPin,
        sampler: EncoderSampler<ScriptedPin, ScriptedPin, ScriptedPin>,
        now: Instant,
        events: Vec<EncoderEvent>,
    }

    /// One clockwise detent as (CLK, DT) levels.
    const CW: [(bool, bool); 4] = [(false, true), (false, false), (true, false), (true, true)];

    impl Rig {
        fn new() -> Self {
            Self::with_config(&EncoderConfig {
                rotation_debounce: Duration::ZERO,
                ..EncoderConfig::default()
            })
        }

        fn with_config(config: &EncoderConfig) -> Self {
            let (clk, dt, sw) = (ScriptedPin::high(), ScriptedPin::high(), ScriptedPin::high());
            let now = Instant::now();
            let sampler =
                EncoderSampler::new(clk.clone(), dt.clone(), sw.clone(), config, now).unwrap();
            Self {
                clk,
                dt,
                sw,
                sampler,
                now,
                events: Vec::new(),
            }
        }

        fn step(&mut self, ms: u64) -> Result<()> {
            self.now += Duration::from_millis(ms);
            let events = &mut self.events;
            self.sampler.sample(self.now, |e| events.push(e))
        }

        fn turn(&mut self, codes: &[(bool, bool)]) {
            self.turn_held(codes, 1);
        }

        /// Hold each code for `ms`, sampling every millisecond.
        fn turn_held(&mut self, codes: &[(bool, bool)], ms: u64) {
            for &(clk, dt) in codes {
                self.clk.set(clk);
                self.dt.set(dt);
                for _ in 0..ms {
                    self.step(1).unwrap();
                }
            }
        }

        fn rest(&mut self, ms: u64) {
            for _ in 0..ms {
                self.step(1).unwrap();
            }
        }
    }

    #[test]
    fn test_rotation_through_pins() {
        let mut rig = Rig::new();

        rig.turn(&CW);
        rig.turn(&[(true, false), (false, false), (false, true), (true, true)]);

        assert_eq!(
            rig.events,
            vec![EncoderEvent::RotateCw, EncoderEvent::RotateCcw]
        );
    }

    #[test]
    fn test_default_debounce_keeps_phases_held_for_two_samples() {
        let mut rig = Rig::with_config(&EncoderConfig::default());

        for _ in 0..10 {
            rig.turn_held(&CW, 2);
        }
        rig.rest(5);

        assert_eq!(rig.events, vec![EncoderEvent::RotateCw; 10]);
    }

    #[test]
    fn test_default_debounce_drops_single_sample_phases() {
        let mut rig = Rig::with_config(&EncoderConfig::default());

        // Each line level spans two samples 1 ms apart, short of the 2 ms
        // window, so no transition is ever accepted.
        for _ in 0..10 {
            rig.turn_held(&CW, 1);
        }
        rig.rest(5);

        assert!(rig.events.is_empty());
    }

    #[test]
    fn test_active_low_button_short_press() {
        let mut rig = Rig::new();

        rig.sw.set(false);
        for _ in 0..10 {
            rig.step(10).unwrap();
        }
        rig.sw.set(true);
        for _ in 0..5 {
            rig.step(10).unwrap();
        }

        assert_eq!(rig.events, vec![EncoderEvent::PressShort]);
    }

    #[test]
    fn test_button_bounce_is_filtered() {
        let mut rig = Rig::new();

        // 5 ms glitches never satisfy the 30 ms window.
        for _ in 0..4 {
            rig.sw.set(false);
            rig.step(5).unwrap();
            rig.sw.set(true);
            rig.step(5).unwrap();
        }

        assert!(rig.events.is_empty());
    }

    #[test]
    fn test_long_press_through_pins() {
        let mut rig = Rig::new();

        rig.sw.set(false);
        for _ in 0..150 {
            rig.step(10).unwrap();
        }
        rig.sw.set(true);
        for _ in 0..5 {
            rig.step(10).unwrap();
        }

        assert_eq!(rig.events, vec![EncoderEvent::PressLong]);
    }

    #[test]
    fn test_read_failure_is_hardware_lost() {
        let mut rig = Rig::new();

        rig.dt.fail();
        let err = rig.step(1).unwrap_err();

        assert!(matches!(err, Error::HardwareLost { .. }));
        assert!(err.is_fatal());
        assert!(rig.events.is_empty());
    }

    #[test]
    fn test_new_fails_on_unreadable_pin() {
        let clk = ScriptedPin::high();
        clk.fail();

        let result = EncoderSampler::new(
            clk,
            ScriptedPin::high(),
            ScriptedPin::high(),
            &EncoderConfig::default(),
            Instant::now(),
        );

        assert!(matches!(result, Err(Error::HardwareLost { .. })));
    }

    #[test]
    fn test_default_config_matches_wiring() {
        let config = EncoderConfig::default();
        assert_eq!((config.clk_pin, config.dt_pin, config.sw_pin), (17, 27, 22));
        assert_eq!(config.long_press, Duration::from_secs(1));
        assert_eq!(config.sample_interval, Duration::from_millis(1));
        assert_eq!(config.rotation_debounce, Duration::from_millis(2));
    }
}
