//! Message types for the application (TEA pattern)

use pikiosk_core::{EncoderEvent, InputEvent, ServerAddress, StreamEntry};

/// All possible messages/actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // ─────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────
    /// Event from the encoder input source
    Input(InputEvent),

    // ─────────────────────────────────────────────────────────
    // Stream Directory
    // ─────────────────────────────────────────────────────────
    /// A poll returned the current stream list
    StreamsUpdated(Vec<StreamEntry>),

    /// A poll failed; the previous list is kept
    StreamsFetchFailed { error: String },

    // ─────────────────────────────────────────────────────────
    // Side-effect Outcomes
    // ─────────────────────────────────────────────────────────
    /// `config.json` now holds `address`
    ConfigSaved { address: ServerAddress },

    /// Writing `config.json` failed; `persisted` is what is still on disk
    ConfigSaveFailed {
        error: String,
        persisted: ServerAddress,
    },

    /// The kiosk browser could not be started
    KioskLaunchFailed { error: String },

    // ─────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────
    /// Termination signal received
    Quit,
}

impl From<InputEvent> for Message {
    fn from(event: InputEvent) -> Self {
        Message::Input(event)
    }
}

impl From<EncoderEvent> for Message {
    fn from(event: EncoderEvent) -> Self {
        Message::Input(InputEvent::Encoder(event))
    }
}
