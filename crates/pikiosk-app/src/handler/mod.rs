//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `input`: Encoder events per navigation mode
//! - `streams`: Stream directory results

pub(crate) mod input;
pub(crate) mod streams;
pub(crate) mod update;


use url::Url;

use pikiosk_core::ServerAddress;

use crate::message::Message;

// Re-export main entry point
pub use update::update;

/// Side effects the engine performs after update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Start the kiosk browser on `url` (replacing any running one)
    LaunchKiosk { url: Url },

    /// Stop the kiosk browser
    TerminateKiosk,

    /// Persist a committed server address
    SaveConfig { address: ServerAddress },

    /// Refresh the stream list now and then periodically
    StartStreamPolling,

    /// Stop refreshing the stream list
    StopStreamPolling,
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Whether anything the display shows changed
    pub redraw: bool,
    /// Actions to perform, in order
    pub actions: Vec<UpdateAction>,
    /// Optional follow-up message to process
    pub message: Option<Message>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::default()
        }
    }

    pub fn redraw_if(changed: bool) -> Self {
        Self {
            redraw: changed,
            ..Self::default()
        }
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            ..Self::default()
        }
    }

    pub fn with_action(mut self, action: UpdateAction) -> Self {
        self.actions.push(action);
        self
    }
}
