//! pikiosk - rotary-encoder stream kiosk for Raspberry Pi
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use pikiosk_app::config::{load_settings, DEFAULT_SETTINGS_PATH};
use tracing::info;

/// pikiosk - pick a stream with a rotary encoder and play it full screen
#[derive(Parser, Debug)]
#[command(name = "pikiosk", version)]
#[command(about = "Rotary-encoder driven stream kiosk for Raspberry Pi", long_about = None)]
struct Args {
    /// Appliance settings (TOML); defaults apply if missing
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SETTINGS_PATH)]
    settings: PathBuf,

    /// Server address file, overrides `behavior.config_path`
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Also write logs to a daily-rolling file in this directory
    #[arg(long, value_name = "PATH")]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    pikiosk_core::logging::init(args.log_dir.as_deref())?;

    let settings = load_settings(&args.settings);
    info!("Settings: {}", args.settings.display());
    let config_path = args
        .config
        .unwrap_or_else(|| settings.behavior.config_path.clone());

    pikiosk_display::run(settings, &config_path).await?;
    Ok(())
}
