//! Command producers: push buttons and the MAVLink UDP link.

pub mod button;
pub mod udp;

pub use button::{button_watcher, ButtonWatcher};
pub use udp::{UdpBuffers, UdpTelemetrySource, DATAGRAM_LEN};
