//! pikiosk-display - OLED front end for pikiosk
//!
//! This crate draws the menu on the SSD1306 panel. It creates an Engine from
//! pikiosk-app and adds frame composition, the I2C display driver, and the
//! main event loop.

pub mod frame;
pub mod oled;
pub mod render;
pub mod runner;

#[cfg(test)]
pub mod test_utils;

// Re-export main entry points
pub use frame::{DisplayCapability, Frame, TextOp};
pub use oled::OledDisplay;
pub use render::{compose, Renderer};
pub use runner::{event_loop, run};
