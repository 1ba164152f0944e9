//! MAVLink telemetry HUD for the Raspberry Pi Pico W.
//!
//! This crate provides the embedded side of the HUD: the Wi-Fi link that
//! carries MAVLink telemetry, the three screen buttons, and the ILI9341
//! panel the renderer draws on.
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico W (RP2040 + CYW43439) and:
//! 1. Joins a Wi-Fi network and listens for MAVLink on UDP (port 14550)
//! 2. Turns VFR_HUD messages from the flight controller into telemetry commands
//! 3. Draws the active screen (general, heading or speed) on a 320x240 TFT
//!
//! # Hardware Configuration
//!
//! | Function        | GPIO | Description |
//! |-----------------|------|-------------|
//! | Button left     | 13   | General screen (active low, pull-up) |
//! | Button middle   | 14   | Heading screen (active low, pull-up) |
//! | Button right    | 15   | Speed screen (active low, pull-up) |
//! | SPI1 SCK        | 10   | ILI9341 clock |
//! | SPI1 TX         | 11   | ILI9341 MOSI |
//! | LCD CS          | 9    | ILI9341 chip select |
//! | LCD DC          | 8    | ILI9341 data/command |
//! | LCD RESET       | 12   | ILI9341 reset |
//! | LCD backlight   | 7    | Backlight enable |
//! | CYW43 PWR/CS    | 23/25| Wi-Fi chip (fixed on the Pico W) |
//! | CYW43 DIO/CLK   | 24/29| Wi-Fi chip PIO SPI (fixed on the Pico W) |
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime. Four producer tasks share
//! one bounded [`HudQueue`](hud_core::HudQueue) with the render task:
//!
//! - **Button Tasks** (x3): Poll one button each, queue screen selections
//! - **Telemetry Task**: Receives UDP datagrams, queues VFR_HUD telemetry
//! - **Render Task**: Sole consumer, draws on the panel
//! - **Wi-Fi / Net Tasks**: Run the CYW43 driver and the embassy-net stack
//!
//! Producers never wait on the queue: when it is full the new command is
//! dropped.
//!
//! # Modules
//!
//! - [`display`]: `DisplaySurface` adapter ([`GraphicsSurface`])
//! - [`ili9341`]: Panel driver ([`Ili9341`])
//! - [`input`]: Buttons ([`ButtonWatcher`]) and UDP ([`UdpTelemetrySource`])
//! - [`net`]: Wi-Fi credentials and bring-up
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`log-bad-crc`**: Log MAVLink frames that fail their checksum

#![no_std]

pub mod display;
pub mod ili9341;
pub mod input;
pub mod net;

pub use display::{panel_layout, GraphicsSurface, FONT};
pub use ili9341::{Ili9341, PanelError};
pub use input::{button_watcher, ButtonWatcher, UdpBuffers, UdpTelemetrySource};
pub use net::NetError;

use embassy_embedded_hal::shared_bus::blocking::spi::SpiDevice;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI1;
use embassy_rp::spi::{Blocking, Spi};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;

/// SPI bus owned by the panel.
pub type PanelBus = Spi<'static, SPI1, Blocking>;

/// The ILI9341 as wired on the HUD board.
pub type HudPanel = Ili9341<
    SpiDevice<'static, NoopRawMutex, PanelBus, Output<'static>>,
    Output<'static>,
    Output<'static>,
>;

/// Stop the calling task for good.
///
/// Used after a fatal init failure so the other tasks keep running.
pub async fn park() -> ! {
    loop {
        core::future::pending::<()>().await;
    }
}
