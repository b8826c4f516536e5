//! pikiosk-app - Application state and orchestration for pikiosk
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the menu
//! state machine, the Engine that owns state and side effects, configuration
//! loading, and background stream polling.

pub(crate) mod actions;
pub mod config;
pub mod engine;
pub mod handler;
pub mod ip_edit;
pub mod menu;
pub mod message;
pub mod poller;
pub(crate) mod process;
pub mod state;

// Re-export primary types
pub use config::{ConfigStore, Settings};
pub use engine::Engine;
pub use handler::{update, UpdateAction, UpdateResult};
pub use ip_edit::{ConfirmChoice, EditStage, IpEditBuffer};
pub use message::Message;
pub use poller::StreamPoller;
pub use state::{AppPhase, AppState, Mode, NavigationView, Notice, Screen};
