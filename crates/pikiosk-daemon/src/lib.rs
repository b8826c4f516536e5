//! # pikiosk-daemon - Process and Hardware Plumbing
//!
//! Everything pikiosk talks to outside its own state: the kiosk browser
//! process, the MediaMTX stream directory, and the rotary encoder.
//!
//! Depends on [`pikiosk_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Kiosk Browser
//! - [`KioskControl`] - Launch/terminate seam used by the app engine
//! - [`KioskLauncher`] - Spawns the browser as a child process
//! - [`KioskOptions`] - Browser command, arguments and environment
//!
//! ### Stream Directory
//! - [`StreamDirectory`] - Async source of the current stream list
//! - [`HttpStreamDirectory`] - `GET /v3/paths/list` over `reqwest`
//! - [`parse_path_list()`] - Parse a `paths/list` response body
//! - [`playback_url()`] - Build the WebRTC player URL for a stream
//!
//! ### Encoder
//! - [`EncoderInput`] - GPIO-backed encoder, sampled on its own thread
//! - [`EncoderSampler`] - Debounce + decode pipeline over any `InputPin`
//! - [`QuadratureDecoder`], [`ButtonTracker`], [`Debounced`] - Building blocks

pub mod directory;
pub mod encoder;
pub mod kiosk;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use directory::{
    parse_path_list, playback_url, HttpStreamDirectory, LocalStreamDirectory, StreamDirectory,
    DEFAULT_API_PORT, DEFAULT_WEBRTC_PORT,
};
pub use encoder::{
    ButtonTracker, Debounced, EncoderConfig, EncoderInput, EncoderSampler, QuadratureDecoder,
};
pub use kiosk::{KioskControl, KioskLauncher, KioskOptions};
