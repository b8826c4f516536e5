//! Test utilities for daemon seams
//!
//! In-memory stand-ins for the kiosk browser and the stream directory, for
//! tests in this crate and (via the `test-helpers` feature) downstream crates.

use std::sync::{Arc, Mutex};

use url::Url;

use pikiosk_core::prelude::*;
use pikiosk_core::{ServerAddress, StreamEntry};

use crate::directory::StreamDirectory;
use crate::kiosk::KioskControl;

/// A call observed by [`RecordingKiosk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KioskCall {
    Launch(Url),
    Terminate,
}

/// Kiosk that records calls instead of spawning a browser.
///
/// Clones share the call log, so a test can keep one clone and hand the
/// other to the engine.
#[derive(Debug, Clone, Default)]
pub struct RecordingKiosk {
    calls: Arc<Mutex<Vec<KioskCall>>>,
    running: bool,
    fail_launch: bool,
}

impl RecordingKiosk {
    pub fn new() -> Self {
        Self::default()
    }

    /// A kiosk whose every launch fails as if the browser were missing.
    pub fn failing() -> Self {
        Self {
            fail_launch: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<KioskCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn launches(&self) -> Vec<Url> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                KioskCall::Launch(url) => Some(url),
                KioskCall::Terminate => None,
            })
            .collect()
    }

    pub fn terminate_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, KioskCall::Terminate))
            .count()
    }
}

impl KioskControl for RecordingKiosk {
    fn launch(&mut self, url: &Url) -> Result<()> {
        self.calls.lock().unwrap().push(KioskCall::Launch(url.clone()));
        if self.fail_launch {
            return Err(Error::kiosk_spawn("scripted launch failure"));
        }
        self.running = true;
        Ok(())
    }

    fn terminate(&mut self) {
        self.calls.lock().unwrap().push(KioskCall::Terminate);
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

/// Stream directory serving a scripted list.
///
/// `None` makes every request fail with an HTTP error.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    streams: Arc<Mutex<Option<Vec<StreamEntry>>>>,
    requests: Arc<Mutex<Vec<ServerAddress>>>,
}

impl StaticDirectory {
    pub fn with_names(names: &[&str]) -> Self {
        let directory = Self::default();
        directory.set_names(names);
        directory
    }

    pub fn set_names(&self, names: &[&str]) {
        let streams = names.iter().map(|n| StreamEntry::named(*n)).collect();
        *self.streams.lock().unwrap() = Some(streams);
    }

    pub fn set_failing(&self) {
        *self.streams.lock().unwrap() = None;
    }

    /// Server addresses requested so far, in order.
    pub fn requests(&self) -> Vec<ServerAddress> {
        self.requests.lock().unwrap().clone()
    }
}

impl StreamDirectory for StaticDirectory {
    async fn list_streams(&self, server: ServerAddress) -> Result<Vec<StreamEntry>> {
        self.requests.lock().unwrap().push(server);
        self.streams
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::http(format!("{}: connection refused", server)))
    }
}
