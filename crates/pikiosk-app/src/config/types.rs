//! Configuration type definitions

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use pikiosk_core::ServerAddress;
use pikiosk_daemon::{EncoderConfig, KioskOptions, DEFAULT_API_PORT, DEFAULT_WEBRTC_PORT};

/// Persisted server configuration (`config.json`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub server_ip: ServerAddress,
}

/// Appliance settings (`settings.toml`)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub encoder: EncoderSettings,

    #[serde(default)]
    pub display: DisplaySettings,

    #[serde(default)]
    pub kiosk: KioskSettings,

    #[serde(default)]
    pub behavior: BehaviorSettings,
}

/// Stream server settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    /// MediaMTX control API port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// MediaMTX WebRTC player port
    #[serde(default = "default_webrtc_port")]
    pub webrtc_port: u16,

    /// Seconds between stream list refreshes
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            webrtc_port: default_webrtc_port(),
            refresh_interval_secs: default_refresh_interval_secs(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Rotary encoder wiring and timing
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EncoderSettings {
    #[serde(default = "default_gpio_chip")]
    pub chip: PathBuf,

    #[serde(default = "default_clk_pin")]
    pub clk_pin: u32,

    #[serde(default = "default_dt_pin")]
    pub dt_pin: u32,

    #[serde(default = "default_sw_pin")]
    pub sw_pin: u32,

    /// Swap rotation direction
    #[serde(default)]
    pub reverse: bool,

    #[serde(default = "default_sample_interval_us")]
    pub sample_interval_us: u64,

    #[serde(default = "default_rotation_debounce_ms")]
    pub rotation_debounce_ms: u64,

    #[serde(default = "default_button_debounce_ms")]
    pub button_debounce_ms: u64,

    /// Hold time for a long press
    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: u64,

    #[serde(default = "default_true")]
    pub button_active_low: bool,
}

impl EncoderSettings {
    pub fn to_config(&self) -> EncoderConfig {
        EncoderConfig {
            chip: self.chip.clone(),
            clk_pin: self.clk_pin,
            dt_pin: self.dt_pin,
            sw_pin: self.sw_pin,
            reverse: self.reverse,
            sample_interval: Duration::from_micros(self.sample_interval_us.max(100)),
            rotation_debounce: Duration::from_millis(self.rotation_debounce_ms),
            button_debounce: Duration::from_millis(self.button_debounce_ms),
            long_press: Duration::from_millis(self.long_press_ms),
            button_active_low: self.button_active_low,
        }
    }
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            chip: default_gpio_chip(),
            clk_pin: default_clk_pin(),
            dt_pin: default_dt_pin(),
            sw_pin: default_sw_pin(),
            reverse: false,
            sample_interval_us: default_sample_interval_us(),
            rotation_debounce_ms: default_rotation_debounce_ms(),
            button_debounce_ms: default_button_debounce_ms(),
            long_press_ms: default_long_press_ms(),
            button_active_low: true,
        }
    }
}

/// OLED display settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplaySettings {
    #[serde(default = "default_i2c_bus")]
    pub i2c_bus: PathBuf,

    /// 7-bit I2C address
    #[serde(default = "default_i2c_address")]
    pub address: u8,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            i2c_bus: default_i2c_bus(),
            address: default_i2c_address(),
        }
    }
}

/// Kiosk browser settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KioskSettings {
    /// Browser executables to try, in order
    #[serde(default = "default_browsers")]
    pub browsers: Vec<String>,

    /// Arguments placed before the stream URL
    #[serde(default = "default_browser_args")]
    pub args: Vec<String>,

    /// X display for the browser
    #[serde(default = "default_x_display")]
    pub display: String,

    #[serde(default = "default_xauthority")]
    pub xauthority: String,

    /// Kill browsers left from a previous run at startup
    #[serde(default = "default_true")]
    pub kill_stray_on_start: bool,
}

impl KioskSettings {
    /// Launcher options for a resolved browser executable.
    pub fn to_options(&self, command: PathBuf) -> KioskOptions {
        KioskOptions {
            command,
            args: self.args.clone(),
            env: vec![
                ("DISPLAY".to_string(), self.display.clone()),
                ("XAUTHORITY".to_string(), self.xauthority.clone()),
            ],
        }
    }
}

impl Default for KioskSettings {
    fn default() -> Self {
        Self {
            browsers: default_browsers(),
            args: default_browser_args(),
            display: default_x_display(),
            xauthority: default_xauthority(),
            kill_stray_on_start: true,
        }
    }
}

/// Startup behavior
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BehaviorSettings {
    /// Delay before touching hardware, so the desktop session can come up
    #[serde(default = "default_startup_delay_ms")]
    pub startup_delay_ms: u64,

    /// Location of `config.json`
    #[serde(default = "default_config_path")]
    pub config_path: PathBuf,
}

impl BehaviorSettings {
    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            startup_delay_ms: default_startup_delay_ms(),
            config_path: default_config_path(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_api_port() -> u16 {
    DEFAULT_API_PORT
}

fn default_webrtc_port() -> u16 {
    DEFAULT_WEBRTC_PORT
}

fn default_refresh_interval_secs() -> u64 {
    5
}

fn default_request_timeout_ms() -> u64 {
    2000
}

fn default_gpio_chip() -> PathBuf {
    PathBuf::from("/dev/gpiochip0")
}

fn default_clk_pin() -> u32 {
    17
}

fn default_dt_pin() -> u32 {
    27
}

fn default_sw_pin() -> u32 {
    22
}

fn default_sample_interval_us() -> u64 {
    1000
}

fn default_rotation_debounce_ms() -> u64 {
    2
}

fn default_button_debounce_ms() -> u64 {
    30
}

fn default_long_press_ms() -> u64 {
    1000
}

fn default_i2c_bus() -> PathBuf {
    PathBuf::from("/dev/i2c-1")
}

fn default_i2c_address() -> u8 {
    0x3C
}

fn default_browsers() -> Vec<String> {
    vec!["chromium".to_string(), "chromium-browser".to_string()]
}

fn default_browser_args() -> Vec<String> {
    [
        "--no-sandbox",
        "--kiosk",
        "--autoplay-policy=no-user-gesture-required",
        "--start-fullscreen",
        "--noerrdialogs",
        "--disable-session-crashed-bubble",
        "--disable-infobars",
        "--disable-pinch",
        "--use-gl=egl",
        "--password-store=basic",
        "--use-mock-keychain",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_x_display() -> String {
    ":0".to_string()
}

fn default_xauthority() -> String {
    "/home/pi/.Xauthority".to_string()
}

fn default_startup_delay_ms() -> u64 {
    2000
}

fn default_config_path() -> PathBuf {
    PathBuf::from("/opt/video-client/config.json")
}
