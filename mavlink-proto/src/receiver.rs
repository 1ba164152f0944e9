//! Telemetry receiver: MAVLink bytes in, telemetry commands out.
//!
//! The receiver owns a [`MavlinkParser`] and applies the HUD's filter to
//! every decoded frame: only VFR_HUD messages sent by the flight
//! controller component become [`Command::Telemetry`]. It never waits on
//! the queue; a full queue drops the new command.
//!
//! The receiver does not log. Each byte that completes something yields a
//! [`ReceiveEvent`] for the caller to report.

use embassy_sync::blocking_mutex::raw::RawMutex;
use hud_core::{Command, CommandQueue, HudConfig, Telemetry};

use crate::mapping::vfr_hud_to_telemetry;
use crate::parser::{MavFrame, MavMessage, MavlinkParser, ParseError};

/// What a fed byte completed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReceiveEvent {
    /// Telemetry from the flight controller was queued.
    Queued(Telemetry),
    /// Telemetry from the flight controller was dropped: queue full.
    Dropped(Telemetry),
    /// Frame from another component, discarded.
    ForeignComponent { system_id: u8, component_id: u8 },
    /// Flight controller frame of another message type, discarded.
    Ignored { message_id: u32 },
    /// Frame failed to decode.
    Corrupt(ParseError),
}

/// Filters decoded frames into telemetry commands.
pub struct TelemetryReceiver {
    parser: MavlinkParser,
    flight_controller_component: u8,
}

impl TelemetryReceiver {
    /// Receiver accepting frames from `flight_controller_component` only.
    #[must_use]
    pub fn new(flight_controller_component: u8) -> Self {
        Self {
            parser: MavlinkParser::new(),
            flight_controller_component,
        }
    }

    #[must_use]
    pub fn from_config(config: &HudConfig) -> Self {
        Self::new(config.flight_controller_component)
    }

    /// Component id frames must come from.
    #[inline]
    #[must_use]
    pub fn flight_controller_component(&self) -> u8 {
        self.flight_controller_component
    }

    /// Drop any partly received frame, e.g. after a lost datagram.
    pub fn reset(&mut self) {
        self.parser.reset();
    }

    /// Feed one byte.
    ///
    /// Returns `None` while a frame is incomplete.
    pub fn feed<M: RawMutex, const N: usize>(
        &mut self,
        byte: u8,
        queue: &CommandQueue<M, N>,
    ) -> Option<ReceiveEvent> {
        match self.parser.push_byte(byte) {
            Ok(None) => None,
            Ok(Some(frame)) => Some(self.dispatch(&frame, queue)),
            Err(e) => Some(ReceiveEvent::Corrupt(e)),
        }
    }

    /// Feed a whole datagram, reporting every event to `on_event`.
    ///
    /// Returns the number of telemetry commands queued. A frame may span
    /// datagrams; parser state carries over between calls.
    pub fn feed_datagram<M: RawMutex, const N: usize>(
        &mut self,
        bytes: &[u8],
        queue: &CommandQueue<M, N>,
        mut on_event: impl FnMut(ReceiveEvent),
    ) -> usize {
        let mut queued = 0;
        for &byte in bytes {
            if let Some(event) = self.feed(byte, queue) {
                if matches!(event, ReceiveEvent::Queued(_)) {
                    queued += 1;
                }
                on_event(event);
            }
        }
        queued
    }

    fn dispatch<M: RawMutex, const N: usize>(
        &self,
        frame: &MavFrame,
        queue: &CommandQueue<M, N>,
    ) -> ReceiveEvent {
        if frame.component_id != self.flight_controller_component {
            return ReceiveEvent::ForeignComponent {
                system_id: frame.system_id,
                component_id: frame.component_id,
            };
        }

        let MavMessage::VfrHud(hud) = frame.message else {
            return ReceiveEvent::Ignored {
                message_id: frame.message.id(),
            };
        };

        let telemetry = vfr_hud_to_telemetry(&hud);
        match queue.enqueue(Command::Telemetry(telemetry)) {
            Ok(()) => ReceiveEvent::Queued(telemetry),
            Err(_) => ReceiveEvent::Dropped(telemetry),
        }
    }
}

impl Default for TelemetryReceiver {
    fn default() -> Self {
        Self::from_config(&HudConfig::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{encode_frame, MavVersion, VfrHud};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use std::vec::Vec;

    fn hud(airspeed: f32) -> VfrHud {
        VfrHud {
            airspeed,
            groundspeed: 9.0,
            alt: 100.0,
            climb: 0.5,
            heading: 180,
            throttle: 40,
        }
    }

    fn wire(component_id: u8, message: MavMessage) -> heapless::Vec<u8, 280> {
        encode_frame(&MavFrame {
            version: MavVersion::V2,
            seq: 0,
            system_id: 1,
            component_id,
            message,
        })
        .unwrap()
    }

    fn collect<M: RawMutex, const N: usize>(
        receiver: &mut TelemetryReceiver,
        bytes: &[u8],
        queue: &CommandQueue<M, N>,
    ) -> Vec<ReceiveEvent> {
        let mut events = Vec::new();
        receiver.feed_datagram(bytes, queue, |e| events.push(e));
        events
    }

    #[test]
    fn test_flight_controller_vfr_hud_is_queued() {
        let queue: CommandQueue<NoopRawMutex, 4> = CommandQueue::new();
        let mut receiver = TelemetryReceiver::default();

        let bytes = wire(1, MavMessage::VfrHud(hud(12.0)));
        let events = collect(&mut receiver, &bytes, &queue);

        let expected = vfr_hud_to_telemetry(&hud(12.0));
        assert_eq!(events, [ReceiveEvent::Queued(expected)]);
        assert_eq!(queue.try_dequeue(), Some(Command::Telemetry(expected)));
    }

    #[test]
    fn test_other_components_never_queue_telemetry() {
        let queue: CommandQueue<NoopRawMutex, 4> = CommandQueue::new();
        let mut receiver = TelemetryReceiver::new(1);

        // Companion computer and gimbal report the same message type.
        for component in [191, 154, 0, 2] {
            let bytes = wire(component, MavMessage::VfrHud(hud(3.0)));
            let events = collect(&mut receiver, &bytes, &queue);
            assert_eq!(
                events,
                [ReceiveEvent::ForeignComponent {
                    system_id: 1,
                    component_id: component
                }]
            );
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_other_message_types_are_ignored() {
        let queue: CommandQueue<NoopRawMutex, 4> = CommandQueue::new();
        let mut receiver = TelemetryReceiver::default();

        let mut bytes: Vec<u8> = wire(1, MavMessage::Heartbeat).to_vec();
        // ATTITUDE (30), checksum not verified for unknown ids
        bytes.extend_from_slice(&[0xFD, 1, 0, 0, 0, 1, 1, 30, 0, 0, 0x42, 0, 0]);
        let events = collect(&mut receiver, &bytes, &queue);

        assert_eq!(
            events,
            [
                ReceiveEvent::Ignored { message_id: 0 },
                ReceiveEvent::Ignored { message_id: 30 },
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_checksum_error_has_no_side_effects() {
        let queue: CommandQueue<NoopRawMutex, 4> = CommandQueue::new();
        let mut receiver = TelemetryReceiver::default();

        let mut bytes: Vec<u8> = wire(1, MavMessage::VfrHud(hud(5.0))).to_vec();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        bytes.extend_from_slice(&wire(1, MavMessage::VfrHud(hud(6.0))));

        let events = collect(&mut receiver, &bytes, &queue);
        assert_eq!(events[0], ReceiveEvent::Corrupt(ParseError::CrcError));
        assert_eq!(events.len(), 2);
        assert_eq!(queue.len(), 1);
        assert_eq!(
            queue.try_dequeue(),
            Some(Command::Telemetry(vfr_hud_to_telemetry(&hud(6.0))))
        );
    }

    #[test]
    fn test_full_queue_drops_telemetry() {
        let queue: CommandQueue<NoopRawMutex, 2> = CommandQueue::new();
        let mut receiver = TelemetryReceiver::default();

        let mut bytes: Vec<u8> = Vec::new();
        for airspeed in [1.0, 2.0, 3.0] {
            bytes.extend_from_slice(&wire(1, MavMessage::VfrHud(hud(airspeed))));
        }
        let mut events = Vec::new();
        let queued = receiver.feed_datagram(&bytes, &queue, |e| events.push(e));

        assert_eq!(queued, 2);
        assert!(matches!(events[2], ReceiveEvent::Dropped(t) if t.airspeed == 3.0));
        assert_eq!(
            queue.try_dequeue(),
            Some(Command::Telemetry(vfr_hud_to_telemetry(&hud(1.0))))
        );
    }

    #[test]
    fn test_frame_split_across_datagrams() {
        let queue: CommandQueue<NoopRawMutex, 4> = CommandQueue::new();
        let mut receiver = TelemetryReceiver::default();
        let bytes = wire(1, MavMessage::VfrHud(hud(7.5)));
        let (head, tail) = bytes.split_at(11);

        assert!(collect(&mut receiver, head, &queue).is_empty());
        assert_eq!(collect(&mut receiver, tail, &queue).len(), 1);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_reset_discards_partial_frame() {
        let queue: CommandQueue<NoopRawMutex, 4> = CommandQueue::new();
        let mut receiver = TelemetryReceiver::default();
        let bytes = wire(1, MavMessage::VfrHud(hud(7.5)));
        let (head, tail) = bytes.split_at(11);

        assert!(collect(&mut receiver, head, &queue).is_empty());
        receiver.reset();
        // The orphaned tail holds no start byte of its own.
        collect(&mut receiver, tail, &queue);
        assert!(queue.is_empty());

        // The next whole frame still gets through.
        assert_eq!(receiver.feed_datagram(&bytes, &queue, |_| {}), 1);
        assert_eq!(queue.len(), 1);
    }
}
