//! MAVLink telemetry over UDP.
//!
//! A ground station (or the autopilot itself) sends MAVLink frames to the
//! HUD's UDP port. Each datagram is fed to a [`TelemetryReceiver`], which
//! queues VFR_HUD telemetry from the flight controller.

use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::Stack;
use embassy_sync::blocking_mutex::raw::RawMutex;
use hud_core::{CommandQueue, HudConfig};
use mavlink_proto::{ReceiveEvent, TelemetryReceiver};

use crate::net::NetError;

const RX_BUFFER_LEN: usize = 1024;

/// Read buffer for one datagram. It matches the socket's receive ring, so
/// anything the socket accepted fits and is never truncated.
pub const DATAGRAM_LEN: usize = RX_BUFFER_LEN;
const TX_BUFFER_LEN: usize = 64;
const RX_PACKETS: usize = 4;

/// Socket storage; must outlive the socket.
pub struct UdpBuffers {
    rx_meta: [PacketMetadata; RX_PACKETS],
    rx: [u8; RX_BUFFER_LEN],
    tx_meta: [PacketMetadata; 1],
    tx: [u8; TX_BUFFER_LEN],
}

impl UdpBuffers {
    pub const fn new() -> Self {
        Self {
            rx_meta: [PacketMetadata::EMPTY; RX_PACKETS],
            rx: [0; RX_BUFFER_LEN],
            tx_meta: [PacketMetadata::EMPTY; 1],
            tx: [0; TX_BUFFER_LEN],
        }
    }
}

impl Default for UdpBuffers {
    fn default() -> Self {
        Self::new()
    }
}

/// Listening UDP socket feeding a telemetry receiver.
pub struct UdpTelemetrySource<'a> {
    socket: UdpSocket<'a>,
    receiver: TelemetryReceiver,
    datagram: [u8; DATAGRAM_LEN],
}

impl<'a> UdpTelemetrySource<'a> {
    /// Bind to the configured port on all addresses.
    pub fn bind(
        stack: Stack<'a>,
        buffers: &'a mut UdpBuffers,
        config: &HudConfig,
    ) -> Result<Self, NetError> {
        let UdpBuffers {
            rx_meta,
            rx,
            tx_meta,
            tx,
        } = buffers;
        let mut socket = UdpSocket::new(stack, rx_meta, rx, tx_meta, tx);
        socket.bind(config.udp_port).map_err(|_| NetError::Bind)?;

        Ok(Self {
            socket,
            receiver: TelemetryReceiver::from_config(config),
            datagram: [0; DATAGRAM_LEN],
        })
    }

    /// Wait for one datagram and feed it through the receiver.
    ///
    /// Returns the datagram length. On error the datagram is lost, so any
    /// frame it was continuing is dropped too.
    pub async fn receive<M: RawMutex, const N: usize>(
        &mut self,
        queue: &CommandQueue<M, N>,
        on_event: impl FnMut(ReceiveEvent),
    ) -> Result<usize, NetError> {
        let (len, _from) = match self.socket.recv_from(&mut self.datagram).await {
            Ok(received) => received,
            Err(_) => {
                self.receiver.reset();
                return Err(NetError::Recv);
            }
        };
        self.receiver
            .feed_datagram(&self.datagram[..len], queue, on_event);
        Ok(len)
    }
}
