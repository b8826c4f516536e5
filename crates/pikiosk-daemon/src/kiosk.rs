//! Kiosk browser process management

use std::path::PathBuf;
use std::process::Stdio;

use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tokio::process::{Child, Command};
use url::Url;

use pikiosk_core::prelude::*;

/// Control over the full-screen browser that plays a stream.
///
/// Launch and terminate are fire-and-forget: neither waits for the browser
/// to start or exit.
pub trait KioskControl: Send {
    /// Start the browser on `url`, terminating any browser already running.
    fn launch(&mut self, url: &Url) -> Result<()>;

    /// Stop the running browser. Does nothing when none is running.
    fn terminate(&mut self);

    /// Whether a browser started by this controller is believed to be running.
    fn is_running(&self) -> bool;
}

/// How to start the browser.
#[derive(Debug, Clone)]
pub struct KioskOptions {
    /// Browser executable (resolved path or bare command name)
    pub command: PathBuf,
    /// Arguments placed before the URL
    pub args: Vec<String>,
    /// Extra environment (e.g. `DISPLAY`, `XAUTHORITY`)
    pub env: Vec<(String, String)>,
}

/// Spawns the browser as a child process and keeps its handle.
///
/// The browser leads its own process group so that terminating it also
/// takes down the helper processes it forks. Only one browser is owned at
/// a time. A crashed browser is not noticed
/// until the next `launch`/`terminate`; restarting the appliance is the
/// supervisor's job.
pub struct KioskLauncher {
    options: KioskOptions,
    child: Option<Child>,
}

impl KioskLauncher {
    pub fn new(options: KioskOptions) -> Self {
        Self {
            options,
            child: None,
        }
    }

    pub fn options(&self) -> &KioskOptions {
        &self.options
    }

    /// Find the first browser candidate present on `PATH`.
    pub fn resolve_browser(candidates: &[String]) -> Result<PathBuf> {
        for candidate in candidates {
            match which::which(candidate) {
                Ok(path) => {
                    debug!("Resolved kiosk browser {} -> {}", candidate, path.display());
                    return Ok(path);
                }
                Err(e) => trace!("Browser candidate {} not found: {}", candidate, e),
            }
        }
        Err(Error::BrowserNotFound {
            candidates: candidates.join(", "),
        })
    }

    /// Kill browser instances left behind by a previous run of the appliance.
    ///
    /// Best effort: a missing `pkill` or no matching process is not an error.
    pub fn kill_stray(&self) {
        let pattern = self
            .options
            .command
            .file_name()
            .unwrap_or(self.options.command.as_os_str())
            .to_string_lossy()
            .into_owned();
        match std::process::Command::new("pkill")
            .arg("-f")
            .arg(&pattern)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) => debug!("pkill -f {} exited with {}", pattern, status),
            Err(e) => debug!("pkill unavailable: {}", e),
        }
    }
}

impl KioskControl for KioskLauncher {
    fn launch(&mut self, url: &Url) -> Result<()> {
        self.terminate();

        info!(
            "Launching kiosk: {} {} {}",
            self.options.command.display(),
            self.options.args.join(" "),
            url
        );

        let child = Command::new(&self.options.command)
            .args(&self.options.args)
            .arg(url.as_str())
            .envs(self.options.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0)
            .spawn()
            .map_err(|e| {
                Error::kiosk_spawn(format!("{}: {}", self.options.command.display(), e))
            })?;

        info!("Kiosk browser started with PID: {:?}", child.id());
        self.child = Some(child);
        Ok(())
    }

    fn terminate(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        match child.try_wait() {
            Ok(Some(status)) => {
                info!("Kiosk browser had already exited: {}", status);
                return;
            }
            Ok(None) => {}
            Err(e) => warn!("Could not poll kiosk browser state: {}", e),
        }

        let Some(pid) = child.id() else {
            return;
        };
        match killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            Ok(()) => info!("Kiosk browser group {} terminated", pid),
            Err(e) => {
                warn!("Failed to kill kiosk process group {}: {}", pid, e);
                if let Err(e) = child.start_kill() {
                    warn!("Failed to kill kiosk browser {}: {}", pid, e);
                }
            }
        }
        // Dropping the handle hands reaping to tokio's orphan queue.
    }

    fn is_running(&self) -> bool {
        self.child.is_some()
    }
}

impl Drop for KioskLauncher {
    fn drop(&mut self) {
        self.terminate();
    }
}
