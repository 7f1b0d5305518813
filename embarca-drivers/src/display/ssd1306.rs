//! SSD1306 OLED display driver
//!
//! Driver for 128x64 SSD1306 panels via I2C. The frame buffer is kept in
//! RAM and pushed with [`Ssd1306::flush`]; drawing goes through the
//! `embedded-graphics` [`DrawTarget`] implementation.

use core::convert::Infallible;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use embedded_hal_async::i2c::I2c;

/// SSD1306 I2C address (0x3C, or 0x3D with SA0 high)
pub const SSD1306_ADDR: u8 = 0x3C;

/// Display dimensions
pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 64;
const PAGES: usize = HEIGHT / 8;

/// Control bytes
const CONTROL_CMD: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const RESUME_RAM: u8 = 0xA4;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_COLUMN_ADDR: u8 = 0x21;
    pub const SET_PAGE_ADDR: u8 = 0x22;
}

/// SSD1306 OLED driver
pub struct Ssd1306<I2C> {
    i2c: I2C,
    /// Frame buffer (1 bit per pixel, 8-row pages, LSB on top)
    buffer: [[u8; WIDTH]; PAGES],
}

impl<I2C: I2c> Ssd1306<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            buffer: [[0; WIDTH]; PAGES],
        }
    }

    /// Initialize the panel and turn it on
    pub async fn init(&mut self) -> Result<(), I2C::Error> {
        let init_cmds: &[u8] = &[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80,
            cmd::SET_MUX_RATIO,
            (HEIGHT - 1) as u8,
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
            0x14, // Internal charge pump
            cmd::SET_MEMORY_MODE,
            0x00, // Horizontal addressing
            cmd::SET_SEG_REMAP,
            cmd::SET_COM_SCAN_DEC,
            cmd::SET_COM_PINS,
            0x12,
            cmd::SET_CONTRAST,
            0xCF,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::RESUME_RAM,
            cmd::SET_NORMAL,
            cmd::DISPLAY_ON,
        ];

        for &c in init_cmds {
            self.command(c).await?;
        }

        Ok(())
    }

    async fn command(&mut self, cmd: u8) -> Result<(), I2C::Error> {
        self.i2c.write(SSD1306_ADDR, &[CONTROL_CMD, cmd]).await
    }

    /// Blank the frame buffer
    pub fn clear(&mut self) {
        for page in self.buffer.iter_mut() {
            page.fill(0);
        }
    }

    /// Draw text with its top-left corner at (x, y) in the 6x10 font
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str) {
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        // Drawing into RAM cannot fail
        let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(self);
    }

    /// Pixel state in the frame buffer
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.buffer[y / 8][x] & (1 << (y % 8)) != 0
    }

    /// Push the frame buffer to the panel
    pub async fn flush(&mut self) -> Result<(), I2C::Error> {
        for c in [
            cmd::SET_COLUMN_ADDR,
            0,
            (WIDTH - 1) as u8,
            cmd::SET_PAGE_ADDR,
            0,
            (PAGES - 1) as u8,
        ] {
            self.command(c).await?;
        }

        for page in 0..PAGES {
            let mut data = [0u8; WIDTH + 1];
            data[0] = CONTROL_DATA;
            data[1..].copy_from_slice(&self.buffer[page]);
            self.i2c.write(SSD1306_ADDR, &data).await?;
        }

        Ok(())
    }
}

impl<I2C> OriginDimensions for Ssd1306<I2C> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl<I2C> DrawTarget for Ssd1306<I2C> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as usize, point.y as usize);
            if x >= WIDTH || y >= HEIGHT {
                continue;
            }

            let bit = 1 << (y % 8);
            match color {
                BinaryColor::On => self.buffer[y / 8][x] |= bit,
                BinaryColor::Off => self.buffer[y / 8][x] &= !bit,
            }
        }
        Ok(())
    }
}
