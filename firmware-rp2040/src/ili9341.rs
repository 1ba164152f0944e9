//! ILI9341 TFT Display Driver
//!
//! Driver for 320x240 ILI9341 panels over a write-only 4-wire SPI link,
//! driven in landscape with 16-bit RGB565 pixels. There is no frame
//! buffer: every draw call goes straight to panel RAM, which is what the
//! renderer's erase-and-redraw scheme expects.

use embedded_graphics::pixelcolor::raw::{RawData, RawU16};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

/// Display dimensions in landscape orientation
pub const WIDTH: u32 = 320;
pub const HEIGHT: u32 = 240;

/// Pixels sent per SPI transfer when filling.
const FILL_CHUNK: usize = 64;

/// ILI9341 commands
#[allow(dead_code)]
mod cmd {
    pub const SOFT_RESET: u8 = 0x01;
    pub const SLEEP_OUT: u8 = 0x11;
    pub const DISPLAY_OFF: u8 = 0x28;
    pub const DISPLAY_ON: u8 = 0x29;
    pub const COLUMN_ADDR: u8 = 0x2A;
    pub const PAGE_ADDR: u8 = 0x2B;
    pub const MEMORY_WRITE: u8 = 0x2C;
    pub const MEMORY_ACCESS_CONTROL: u8 = 0x36;
    pub const PIXEL_FORMAT: u8 = 0x3A;
}

/// MADCTL: row/column exchange (landscape) with BGR panel order.
const MADCTL_LANDSCAPE: u8 = 0x20 | 0x08;

/// COLMOD: 16 bits per pixel on the MCU interface.
const PIXEL_FORMAT_16BIT: u8 = 0x55;

/// Panel communication failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum PanelError {
    /// SPI transfer failed.
    Spi,
    /// Driving the D/C or reset line failed.
    Pin,
}

/// ILI9341 driver
pub struct Ili9341<SPI, DC, RST> {
    spi: SPI,
    dc: DC,
    rst: RST,
}

impl<SPI, DC, RST> Ili9341<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Create a new ILI9341 driver
    pub fn new(spi: SPI, dc: DC, rst: RST) -> Self {
        Self { spi, dc, rst }
    }

    /// Reset the panel and bring it up in landscape RGB565 mode.
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), PanelError> {
        self.rst.set_low().map_err(|_| PanelError::Pin)?;
        delay.delay_ms(10);
        self.rst.set_high().map_err(|_| PanelError::Pin)?;
        delay.delay_ms(120);

        self.command(cmd::SOFT_RESET, &[])?;
        delay.delay_ms(150);
        self.command(cmd::SLEEP_OUT, &[])?;
        delay.delay_ms(120);

        self.command(cmd::PIXEL_FORMAT, &[PIXEL_FORMAT_16BIT])?;
        self.command(cmd::MEMORY_ACCESS_CONTROL, &[MADCTL_LANDSCAPE])?;
        self.command(cmd::DISPLAY_ON, &[])?;
        delay.delay_ms(20);

        Ok(())
    }

    /// Send a command byte followed by its parameters
    fn command(&mut self, command: u8, params: &[u8]) -> Result<(), PanelError> {
        self.dc.set_low().map_err(|_| PanelError::Pin)?;
        self.spi.write(&[command]).map_err(|_| PanelError::Spi)?;
        if !params.is_empty() {
            self.data(params)?;
        }
        Ok(())
    }

    fn data(&mut self, bytes: &[u8]) -> Result<(), PanelError> {
        self.dc.set_high().map_err(|_| PanelError::Pin)?;
        self.spi.write(bytes).map_err(|_| PanelError::Spi)
    }

    /// Restrict memory writes to the inclusive window and start writing.
    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), PanelError> {
        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();
        self.command(cmd::COLUMN_ADDR, &[x0h, x0l, x1h, x1l])?;
        self.command(cmd::PAGE_ADDR, &[y0h, y0l, y1h, y1l])?;
        self.command(cmd::MEMORY_WRITE, &[])
    }

    /// Fill `area` (already clipped to the panel) with one color.
    fn fill_area(&mut self, area: &Rectangle, color: Rgb565) -> Result<(), PanelError> {
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        self.set_window(
            area.top_left.x as u16,
            area.top_left.y as u16,
            bottom_right.x as u16,
            bottom_right.y as u16,
        )?;

        let [hi, lo] = RawU16::from(color).into_inner().to_be_bytes();
        let mut chunk = [0u8; FILL_CHUNK * 2];
        for pair in chunk.chunks_exact_mut(2) {
            pair[0] = hi;
            pair[1] = lo;
        }

        let mut remaining = area.size.width as usize * area.size.height as usize;
        self.dc.set_high().map_err(|_| PanelError::Pin)?;
        while remaining > 0 {
            let n = remaining.min(FILL_CHUNK);
            self.spi.write(&chunk[..n * 2]).map_err(|_| PanelError::Spi)?;
            remaining -= n;
        }
        Ok(())
    }
}

impl<SPI, DC, RST> OriginDimensions for Ili9341<SPI, DC, RST> {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

impl<SPI, DC, RST> DrawTarget for Ili9341<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    type Color = Rgb565;
    type Error = PanelError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        for Pixel(point, color) in pixels {
            if !bounds.contains(point) {
                continue;
            }
            let (x, y) = (point.x as u16, point.y as u16);
            self.set_window(x, y, x, y)?;
            self.data(&RawU16::from(color).into_inner().to_be_bytes())?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        self.fill_area(&area, color)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_area(&self.bounding_box(), color)
    }
}
