//! Appliance runner - hardware bring-up and the main event loop
//!
//! Contains the application lifecycle:
//! - `run`: open the panel and encoder, build the engine, run a session
//! - `run_session`: the event loop followed by kiosk, poller and panel shutdown
//! - `event_loop`: process messages one at a time, redrawing when asked

use std::future::Future;
use std::path::{Path, PathBuf};

use pikiosk_app::config::KioskSettings;
use pikiosk_app::{ConfigStore, Engine, Message, Settings};
use pikiosk_core::prelude::*;
use pikiosk_daemon::{EncoderInput, HttpStreamDirectory, KioskLauncher, StreamDirectory};

use crate::frame::DisplayCapability;
use crate::oled::OledDisplay;
use crate::render::Renderer;

/// Run the appliance until SIGINT/SIGTERM or a fatal hardware error.
pub async fn run(settings: Settings, config_path: &Path) -> Result<()> {
    let delay = settings.behavior.startup_delay();
    if !delay.is_zero() {
        info!("Waiting {:?} before touching hardware", delay);
        tokio::time::sleep(delay).await;
    }

    let bus = &settings.display.i2c_bus;
    let mut display = OledDisplay::open(bus, settings.display.address)
        .with_context(|| format!("Display unavailable on {}", bus.display()))?;
    let encoder_config = settings.encoder.to_config();
    let encoder = EncoderInput::open(&encoder_config)
        .with_context(|| format!("Encoder unavailable on {}", encoder_config.chip.display()))?;

    let config = ConfigStore::open(config_path);
    info!(
        "Config: {} (server {})",
        config.path().display(),
        config.current()
    );

    let kiosk = kiosk_launcher(&settings.kiosk);
    let directory =
        HttpStreamDirectory::new(settings.server.api_port, settings.server.request_timeout())
            .context("HTTP client unavailable")?;

    let mut engine = Engine::new(&settings, config, directory, Box::new(kiosk));
    let _encoder_thread = encoder.spawn(engine.input_sender())?;

    let mut renderer = Renderer::new();
    let result = run_session(&mut engine, &mut display, &mut renderer, shutdown_signal()).await;

    info!("pikiosk exiting");
    result
}

/// Run the event loop, then stop the kiosk and polling and blank the panel.
///
/// `shutdown` resolving ends the loop as if `Message::Quit` had arrived.
pub async fn run_session<S, D, F>(
    engine: &mut Engine<S>,
    display: &mut D,
    renderer: &mut Renderer,
    shutdown: F,
) -> Result<()>
where
    S: StreamDirectory + Sync + 'static,
    D: DisplayCapability + ?Sized,
    F: Future<Output = ()>,
{
    let result = event_loop(engine, display, renderer, shutdown).await;

    engine.shutdown();
    blank(display);
    result
}

/// Main event loop
///
/// Draws the initial screen, then handles messages in arrival order until
/// the engine asks to quit or `shutdown` resolves. A failed redraw is logged
/// and retried on the next one.
pub async fn event_loop<S, D, F>(
    engine: &mut Engine<S>,
    display: &mut D,
    renderer: &mut Renderer,
    shutdown: F,
) -> Result<()>
where
    S: StreamDirectory + Sync + 'static,
    D: DisplayCapability + ?Sized,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut signalled = false;

    redraw(engine, display, renderer);

    while !engine.should_quit() {
        let next = tokio::select! {
            msg = engine.next_message() => msg,
            () = &mut shutdown, if !signalled => {
                signalled = true;
                Some(Message::Quit)
            }
        };
        let Some(msg) = next else {
            info!("Message channel closed");
            break;
        };

        if engine.process_message(msg) {
            redraw(engine, display, renderer);
        }
    }

    match engine.fatal_error() {
        Some(e) => {
            error!("Fatal: {}", e);
            Err(e)
        }
        None => Ok(()),
    }
}

/// Resolves on SIGINT or SIGTERM. Never resolves if the handlers cannot be
/// installed.
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut sigint, mut sigterm) =
        match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
            (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
            (Err(e), _) | (_, Err(e)) => {
                error!("Cannot listen for shutdown signals: {}", e);
                return std::future::pending().await;
            }
        };

    tokio::select! {
        _ = sigint.recv() => info!("Received SIGINT"),
        _ = sigterm.recv() => info!("Received SIGTERM"),
    }
}

fn redraw<S, D>(engine: &Engine<S>, display: &mut D, renderer: &mut Renderer)
where
    S: StreamDirectory + Sync + 'static,
    D: DisplayCapability + ?Sized,
{
    if let Err(e) = renderer.render(&engine.view(), display) {
        warn!("Redraw failed: {}", e);
    }
}

fn blank<D: DisplayCapability + ?Sized>(display: &mut D) {
    if let Err(e) = display.clear().and_then(|_| display.flush()) {
        warn!("Failed to clear display on exit: {}", e);
    }
}

/// Launcher for the first installed browser.
///
/// A missing browser is not fatal: the menu keeps working and each launch
/// reports a failure on the panel.
fn kiosk_launcher(settings: &KioskSettings) -> KioskLauncher {
    let command = match KioskLauncher::resolve_browser(&settings.browsers) {
        Ok(path) => path,
        Err(e) => {
            warn!("{}", e);
            PathBuf::from(
                settings
                    .browsers
                    .first()
                    .map(String::as_str)
                    .unwrap_or("chromium"),
            )
        }
    };

    let launcher = KioskLauncher::new(settings.to_options(command));
    if settings.kill_stray_on_start {
        launcher.kill_stray();
    }
    launcher
}

#[cfg(test)]
mod tests {
    use super::*;
    use pikiosk_core::{EncoderEvent, InputEvent};
    use pikiosk_daemon::test_utils::{RecordingKiosk, StaticDirectory};
    use std::time::Duration;
    use tempfile::TempDir;

    use crate::test_utils::{DisplayCall, RecordingDisplay};

    fn engine(kiosk: RecordingKiosk) -> (Engine<StaticDirectory>, TempDir) {
        let temp = TempDir::new().unwrap();
        let config = ConfigStore::open(temp.path().join("config.json"));
        let engine = Engine::new(
            &Settings::default(),
            config,
            StaticDirectory::with_names(&["cam1"]),
            Box::new(kiosk),
        );
        (engine, temp)
    }

    #[tokio::test]
    async fn test_loop_draws_initial_screen_and_quits() {
        let (mut engine, _temp) = engine(RecordingKiosk::new());
        let mut display = RecordingDisplay::new();
        let mut renderer = Renderer::new();
        engine.msg_sender().send(Message::Quit).await.unwrap();

        let result =
            event_loop(&mut engine, &mut display, &mut renderer, std::future::pending()).await;

        assert!(result.is_ok());
        assert_eq!(display.flush_count(), 1);
        assert!(display.drawn_text().contains(&"Main Menu".to_string()));
    }

    #[tokio::test]
    async fn test_loop_redraws_once_per_visible_change() {
        let (mut engine, _temp) = engine(RecordingKiosk::new());
        let mut display = RecordingDisplay::new();
        let mut renderer = Renderer::new();
        let tx = engine.msg_sender();
        tx.send(EncoderEvent::RotateCw.into()).await.unwrap();
        tx.send(EncoderEvent::RotateCw.into()).await.unwrap(); // clamped, no redraw
        tx.send(Message::Quit).await.unwrap();

        event_loop(&mut engine, &mut display, &mut renderer, std::future::pending())
            .await
            .unwrap();

        assert_eq!(display.flush_count(), 2);
        assert!(display.drawn_text().contains(&"> Settings".to_string()));
    }

    #[tokio::test]
    async fn test_loop_returns_fatal_error_on_hardware_loss() {
        let (mut engine, _temp) = engine(RecordingKiosk::new());
        let mut display = RecordingDisplay::new();
        let mut renderer = Renderer::new();
        engine
            .msg_sender()
            .send(Message::Input(InputEvent::HardwareLost {
                reason: "CLK line read failed".to_string(),
            }))
            .await
            .unwrap();

        let result =
            event_loop(&mut engine, &mut display, &mut renderer, std::future::pending()).await;

        match result {
            Err(e) => {
                assert!(e.is_fatal());
                assert!(e.to_string().contains("CLK line read failed"));
            }
            Ok(()) => panic!("expected a fatal error"),
        }
    }

    #[tokio::test]
    async fn test_loop_survives_failed_redraw() {
        let (mut engine, _temp) = engine(RecordingKiosk::new());
        let mut display = RecordingDisplay::new();
        display.fail_next_flush = true;
        let mut renderer = Renderer::new();
        let tx = engine.msg_sender();
        tx.send(EncoderEvent::RotateCw.into()).await.unwrap();
        tx.send(Message::Quit).await.unwrap();

        let result =
            event_loop(&mut engine, &mut display, &mut renderer, std::future::pending()).await;

        assert!(result.is_ok());
        assert_eq!(display.flush_count(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_ends_session_and_stops_kiosk() {
        let kiosk = RecordingKiosk::new();
        let (mut engine, _temp) = engine(kiosk.clone());
        let mut display = RecordingDisplay::new();
        let mut renderer = Renderer::new();
        engine.process_message(EncoderEvent::PressShort.into());
        assert!(engine.is_polling());
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        stop_tx.send(()).unwrap();

        let result = run_session(&mut engine, &mut display, &mut renderer, async {
            let _ = stop_rx.await;
        })
        .await;

        assert!(result.is_ok());
        assert!(engine.should_quit());
        assert!(!engine.is_polling());
        assert_eq!(kiosk.terminate_count(), 1);
        assert_eq!(
            &display.calls[display.calls.len() - 2..],
            &[DisplayCall::Clear, DisplayCall::Flush]
        );
    }

    #[tokio::test]
    async fn test_shutdown_signal_resolves_on_sigint() {
        let signal = shutdown_signal();
        tokio::pin!(signal);

        // First poll installs the handlers.
        assert!(tokio::time::timeout(Duration::from_millis(50), &mut signal)
            .await
            .is_err());

        let status = std::process::Command::new("sh")
            .arg("-c")
            .arg(format!("kill -INT {}", std::process::id()))
            .status()
            .unwrap();
        assert!(status.success());

        assert!(tokio::time::timeout(Duration::from_secs(5), &mut signal)
            .await
            .is_ok());
    }

    #[test]
    fn test_blank_clears_and_flushes() {
        let mut display = RecordingDisplay::new();

        blank(&mut display);

        assert_eq!(display.flush_count(), 1);
        assert!(display.drawn_text().is_empty());
    }

    #[test]
    fn test_kiosk_launcher_falls_back_to_first_candidate() {
        let settings = KioskSettings {
            browsers: vec!["no-such-browser-pikiosk".to_string()],
            kill_stray_on_start: false,
            ..KioskSettings::default()
        };

        let launcher = kiosk_launcher(&settings);

        assert_eq!(
            launcher.options().command,
            PathBuf::from("no-such-browser-pikiosk")
        );
    }
}
