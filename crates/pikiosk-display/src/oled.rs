//! SSD1306 OLED over Linux I2C

use std::path::Path;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use linux_embedded_hal::I2cdev;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};

use pikiosk_core::prelude::*;

use crate::frame::DisplayCapability;

const CHAR_WIDTH: i32 = 6;
const LINE_HEIGHT: i32 = 10;

type Driver =
    Ssd1306<I2CInterface<I2cdev>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// 128x64 panel addressed as a 21x6 text grid in the 6x10 font.
pub struct OledDisplay {
    driver: Driver,
    normal: MonoTextStyle<'static, BinaryColor>,
    inverted: MonoTextStyle<'static, BinaryColor>,
}

impl OledDisplay {
    /// Open the I2C bus and initialise the panel with a blank screen.
    pub fn open(bus: &Path, address: u8) -> Result<Self> {
        let i2c = I2cdev::new(bus)
            .map_err(|e| Error::display(format!("{}: {}", bus.display(), e)))?;
        let interface = I2CDisplayInterface::new_custom_address(i2c, address);
        let mut driver = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        driver.init().map_err(|e| {
            Error::display(format!(
                "SSD1306 at {:#04x} on {}: {:?}",
                address,
                bus.display(),
                e
            ))
        })?;

        let mut display = Self {
            driver,
            normal: MonoTextStyleBuilder::new()
                .font(&FONT_6X10)
                .text_color(BinaryColor::On)
                .build(),
            inverted: MonoTextStyleBuilder::new()
                .font(&FONT_6X10)
                .text_color(BinaryColor::Off)
                .background_color(BinaryColor::On)
                .build(),
        };
        display.clear()?;
        display.flush()?;

        info!("OLED ready at {:#04x} on {}", address, bus.display());
        Ok(display)
    }
}

impl DisplayCapability for OledDisplay {
    fn clear(&mut self) -> Result<()> {
        self.driver.clear_buffer();
        Ok(())
    }

    fn draw_text(&mut self, col: u8, row: u8, text: &str, highlight: bool) -> Result<()> {
        let style = if highlight { self.inverted } else { self.normal };
        let origin = Point::new(i32::from(col) * CHAR_WIDTH, i32::from(row) * LINE_HEIGHT);
        Text::with_baseline(text, origin, style, Baseline::Top)
            .draw(&mut self.driver)
            .map_err(|e| Error::display(format!("draw failed: {:?}", e)))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.driver
            .flush()
            .map_err(|e| Error::display(format!("flush failed: {:?}", e)))
    }
}
