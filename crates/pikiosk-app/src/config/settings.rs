//! Settings file loading

use std::path::Path;

use pikiosk_core::prelude::*;

use super::types::Settings;

/// Settings file read when no `--settings` path is given.
pub const DEFAULT_SETTINGS_PATH: &str = "/etc/pikiosk/settings.toml";

/// Load settings from `path`
///
/// The file is optional: a missing file yields defaults silently, an
/// unreadable or invalid one yields defaults with a warning.
pub fn load_settings(path: &Path) -> Settings {
    if !path.exists() {
        debug!("No settings file at {:?}, using defaults", path);
        return Settings::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match parse_settings(path, &content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("{}", e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            Settings::default()
        }
    }
}

/// Parse settings TOML, reporting errors against `path`.
pub fn parse_settings(path: &Path, content: &str) -> Result<Settings> {
    toml::from_str(content).map_err(|e| Error::settings(path, e.to_string()))
}
