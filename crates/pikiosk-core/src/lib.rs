//! # pikiosk-core - Core Domain Types
//!
//! Foundation crate for pikiosk. Provides domain types, error handling,
//! input event definitions, and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`ServerAddress`] - Stream server IPv4 address (padded / trimmed forms)
//! - [`StreamEntry`] - A stream advertised by the stream directory
//!
//! ### Events (`events`)
//! - [`EncoderEvent`] - Rotation and short/long press events
//! - [`InputEvent`] - Encoder source output, including hardware loss
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use pikiosk_core::prelude::*;
//! ```

pub mod error;
pub mod events;
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout all pikiosk crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use events::{EncoderEvent, InputEvent};
pub use types::{ServerAddress, StreamEntry};
