//! Logging configuration using tracing

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Environment variable controlling the log filter.
pub const LOG_ENV: &str = "PIKIOSK_LOG";

const DEFAULT_FILTER: &str = "pikiosk=info,warn";

/// Initialize the logging subsystem
///
/// Logs always go to stderr (captured by the service manager's journal).
/// When `log_dir` is given, a daily-rolling `pikiosk.log` is written there too.
/// Log level is controlled by the `PIKIOSK_LOG` environment variable.
///
/// # Examples
/// ```bash
/// PIKIOSK_LOG=debug pikiosk
/// PIKIOSK_LOG=pikiosk_daemon=trace pikiosk --log-dir /var/log/pikiosk
/// ```
pub fn init(log_dir: Option<&Path>) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .compact();

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "pikiosk.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(true)
                    .with_line_number(true)
                    .with_timer(fmt::time::ChronoLocal::new(
                        "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                    )),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("pikiosk {} starting", env!("CARGO_PKG_VERSION"));
    if let Some(dir) = log_dir {
        tracing::info!("Log directory: {}", dir.display());
    }
    tracing::info!("═══════════════════════════════════════════════════════");

    Ok(())
}
