//! MAVLink telemetry decoding for the HUD.
//!
//! This crate provides chip-agnostic MAVLink frame parsing and turns
//! VFR_HUD messages from the flight controller into HUD telemetry
//! commands. It is designed to be fed from any byte source: UDP
//! datagrams on the device, byte slices in tests.
//!
//! # Features
//!
//! - Minimal MAVLink v1/v2 parser for VFR_HUD (ID 74) and HEARTBEAT (ID 0)
//! - Sender filtering by component id
//! - No chip-specific dependencies - works on any platform
//! - Fully testable on host
//!
//! # Example
//!
//! ```ignore
//! use mavlink_proto::{ReceiveEvent, TelemetryReceiver};
//!
//! let mut receiver = TelemetryReceiver::new(1);
//!
//! // Feed every datagram from the socket
//! receiver.feed_datagram(&datagram, &queue, |event| {
//!     if let ReceiveEvent::Queued(t) = event {
//!         // Renderer will pick it up
//!     }
//! });
//! ```
//!
//! # MAVLink Message Types
//!
//! This crate handles:
//! - **VFR_HUD** (ID 74): airspeed, groundspeed, altitude, climb, heading, throttle
//! - **HEARTBEAT** (ID 0): recognized and checked, then ignored by the receiver

#![cfg_attr(not(test), no_std)]

pub mod mapping;
pub mod parser;
pub mod receiver;

// Re-export main types from parser
pub use parser::{
    encode_frame, MavFrame, MavMessage, MavVersion, MavlinkParser, ParseError, VfrHud,
    MAVLINK_STX_V1, MAVLINK_STX_V2, MAX_FRAME_SIZE, MSG_ID_HEARTBEAT, MSG_ID_VFR_HUD,
};

pub use mapping::vfr_hud_to_telemetry;
pub use receiver::{ReceiveEvent, TelemetryReceiver};
