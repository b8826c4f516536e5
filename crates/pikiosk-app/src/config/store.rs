//! Persisted server address
//!
//! `config.json` holds a single field, `{"server_ip": "DDD.DDD.DDD.DDD"}`.
//! [`ConfigStore`] is the only writer: a save goes to disk first (temp file,
//! fsync, rename) and is published to subscribers only after it succeeded.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use pikiosk_core::prelude::*;
use pikiosk_core::ServerAddress;

use super::types::ServerConfig;

/// Read the persisted address, falling back to the default.
///
/// Never fails: a missing or malformed file yields
/// [`ServerAddress::DEFAULT`].
pub fn load(path: &Path) -> ServerAddress {
    match read_config(path) {
        Ok(config) => config.server_ip,
        Err(e) => {
            debug!("Using default server address: {}", e);
            ServerAddress::DEFAULT
        }
    }
}

fn read_config(path: &Path) -> Result<ServerConfig> {
    let content = fs::read(path)?;
    Ok(serde_json::from_slice(&content)?)
}

fn write_config(path: &Path, config: &ServerConfig) -> Result<()> {
    let mut json = serde_json::to_string_pretty(config)?;
    json.push('\n');

    let tmp = tmp_path(path);
    let result = (|| -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(Error::config(format!(
            "Failed to write {}: {}",
            path.display(),
            e
        )));
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Handle to the persisted server address.
pub struct ConfigStore {
    path: PathBuf,
    current: watch::Sender<ServerAddress>,
    save_lock: Mutex<()>,
}

impl ConfigStore {
    /// Load the config at `path`.
    ///
    /// When the file is missing or malformed the default address is used and
    /// written back (best effort).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let address = match read_config(&path) {
            Ok(config) => {
                info!("Loaded server address {} from {:?}", config.server_ip, path);
                config.server_ip
            }
            Err(e) => {
                warn!(
                    "Config {:?} unusable ({}), using default {}",
                    path,
                    e,
                    ServerAddress::DEFAULT
                );
                if let Err(e) = write_config(&path, &ServerConfig::default()) {
                    warn!("Could not write default config: {}", e);
                }
                ServerAddress::DEFAULT
            }
        };

        let (current, _) = watch::channel(address);
        Self {
            path,
            current,
            save_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The last successfully saved (or loaded) address.
    pub fn current(&self) -> ServerAddress {
        *self.current.borrow()
    }

    /// Receiver that always sees the current address.
    pub fn subscribe(&self) -> watch::Receiver<ServerAddress> {
        self.current.subscribe()
    }

    /// Persist `address`, then publish it.
    ///
    /// On failure neither the file nor [`current`](Self::current) changes.
    pub fn save(&self, address: ServerAddress) -> Result<()> {
        let _guard = self
            .save_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        write_config(&self.path, &ServerConfig { server_ip: address })?;
        self.current.send_replace(address);

        info!("Saved server address {} to {:?}", address.padded(), self.path);
        Ok(())
    }

    /// [`save`](Self::save) on the blocking thread pool.
    pub async fn persist(self: Arc<Self>, address: ServerAddress) -> Result<()> {
        tokio::task::spawn_blocking(move || self.save(address))
            .await
            .map_err(|e| Error::config(format!("Save task failed: {}", e)))?
    }
}
