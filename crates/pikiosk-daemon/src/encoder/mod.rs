//! Rotary encoder input source
//!
//! Raw line levels flow through [`Debounced`] filters into the
//! [`QuadratureDecoder`] (rotation) and the [`ButtonTracker`] (presses).
//! [`EncoderInput`] binds the pipeline to GPIO lines and runs it on its own
//! thread.

pub mod button;
pub mod debounce;
pub mod gpio;
pub mod quadrature;

pub use button::ButtonTracker;
pub use debounce::Debounced;
pub use gpio::{EncoderConfig, EncoderInput, EncoderSampler};
pub use quadrature::QuadratureDecoder;
