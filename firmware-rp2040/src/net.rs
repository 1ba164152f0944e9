//! Wi-Fi bring-up and build-time network settings.
//!
//! Credentials and the UDP port are baked in at build time:
//!
//! ```text
//! HUD_WIFI_SSID=field HUD_WIFI_PASSWORD=secret HUD_UDP_PORT=14550 cargo build --release
//! ```

use cyw43::{Control, JoinOptions};
use defmt::warn;
use hud_core::config::DEFAULT_UDP_PORT;

/// Network joined on boot.
pub const WIFI_SSID: &str = match option_env!("HUD_WIFI_SSID") {
    Some(ssid) => ssid,
    None => "px4-hud",
};

/// Empty means an open network.
pub const WIFI_PASSWORD: &str = match option_env!("HUD_WIFI_PASSWORD") {
    Some(password) => password,
    None => "",
};

/// Seed for the network stack's port and sequence randomization.
pub const NET_SEED: u64 = 0x5eed_4875_6420_0001;

// The CYW43439 blobs are flashed once, next to the program:
//     probe-rs download 43439A0.bin --binary-format bin --chip RP2040 --base-address 0x10100000
//     probe-rs download 43439A0_clm.bin --binary-format bin --chip RP2040 --base-address 0x10140000
const FIRMWARE_ADDR: usize = 0x1010_0000;
const FIRMWARE_LEN: usize = 230_321;
const CLM_ADDR: usize = 0x1014_0000;
const CLM_LEN: usize = 4_752;

/// Network failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum NetError {
    /// Joining the access point failed with this firmware status.
    Join(u32),
    /// The UDP port could not be bound.
    Bind,
    /// Receiving a datagram failed.
    Recv,
}

/// CYW43439 firmware image.
pub fn wifi_firmware() -> &'static [u8] {
    // SAFETY: XIP flash is mapped read-only for the lifetime of the program
    // and memory.x keeps the program below FIRMWARE_ADDR.
    unsafe { core::slice::from_raw_parts(FIRMWARE_ADDR as *const u8, FIRMWARE_LEN) }
}

/// CYW43439 country locale matrix.
pub fn wifi_clm() -> &'static [u8] {
    // SAFETY: as for `wifi_firmware`.
    unsafe { core::slice::from_raw_parts(CLM_ADDR as *const u8, CLM_LEN) }
}

/// UDP port from `HUD_UDP_PORT`, or the MAVLink default.
pub fn udp_port() -> u16 {
    let Some(raw) = option_env!("HUD_UDP_PORT") else {
        return DEFAULT_UDP_PORT;
    };
    match raw.parse() {
        Ok(port) => port,
        Err(_) => {
            warn!("HUD_UDP_PORT={} is not a port number, using {}", raw, DEFAULT_UDP_PORT);
            DEFAULT_UDP_PORT
        }
    }
}

/// Join the configured access point once.
pub async fn join(control: &mut Control<'_>) -> Result<(), NetError> {
    let options = if WIFI_PASSWORD.is_empty() {
        JoinOptions::new_open()
    } else {
        JoinOptions::new(WIFI_PASSWORD.as_bytes())
    };
    control
        .join(WIFI_SSID, options)
        .await
        .map_err(|e| NetError::Join(e.status))
}
