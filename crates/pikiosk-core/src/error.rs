//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid settings file {path}: {message}")]
    Settings { path: PathBuf, message: String },

    #[error("Invalid server address: {value:?}")]
    InvalidAddress { value: String },

    // ─────────────────────────────────────────────────────────────
    // Stream Directory Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Stream directory request failed: {message}")]
    Http { message: String },

    #[error("Malformed stream directory response: {message}")]
    MalformedResponse { message: String },

    // ─────────────────────────────────────────────────────────────
    // Hardware Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Display error: {message}")]
    Display { message: String },

    #[error("Encoder error: {message}")]
    Encoder { message: String },

    #[error("Encoder hardware became unreadable: {reason}")]
    HardwareLost { reason: String },

    // ─────────────────────────────────────────────────────────────
    // Kiosk Process Errors
    // ─────────────────────────────────────────────────────────────
    #[error("No kiosk browser found (tried: {candidates})")]
    BrowserNotFound { candidates: String },

    #[error("Failed to spawn kiosk browser: {reason}")]
    KioskSpawn { reason: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn settings(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Settings {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_address(value: impl Into<String>) -> Self {
        Self::InvalidAddress {
            value: value.into(),
        }
    }

    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn display(message: impl Into<String>) -> Self {
        Self::Display {
            message: message.into(),
        }
    }

    pub fn encoder(message: impl Into<String>) -> Self {
        Self::Encoder {
            message: message.into(),
        }
    }

    pub fn kiosk_spawn(reason: impl Into<String>) -> Self {
        Self::KioskSpawn {
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error
    ///
    /// Recoverable errors are logged and the appliance keeps running with
    /// its previous state.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Http { .. }
                | Error::MalformedResponse { .. }
                | Error::Config { .. }
                | Error::Settings { .. }
                | Error::InvalidAddress { .. }
                | Error::KioskSpawn { .. }
                | Error::BrowserNotFound { .. }
        )
    }

    /// Check if this error should trigger application exit
    ///
    /// Without a working display or encoder the appliance has no usable
    /// interface; the service supervisor restarts the process.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Display { .. }
                | Error::Encoder { .. }
                | Error::HardwareLost { .. }
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}
