//! Configuration for pikiosk
//!
//! - `settings.toml` - appliance settings (ports, pins, browser), read once
//! - `config.json` - the server address, edited from the device itself

pub mod settings;
pub mod store;
pub mod types;

pub use settings::{load_settings, parse_settings, DEFAULT_SETTINGS_PATH};
pub use store::{load, ConfigStore};
pub use types::*;
