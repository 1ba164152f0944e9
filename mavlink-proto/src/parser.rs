//! Minimal MAVLink parser for VFR_HUD messages.
//!
//! This is a byte-at-a-time MAVLink v1/v2 frame decoder that only decodes
//! VFR_HUD (ID 74) and recognizes HEARTBEAT (ID 0). Every other message is
//! reported by id without checksum verification, since its CRC_EXTRA is
//! unknown here. It does not depend on external MAVLink crates to avoid
//! atomic limitations on Cortex-M0 targets.

use crc::{Crc, CRC_16_MCRF4XX};
use heapless::Vec;

/// MAVLink 1 start byte.
pub const MAVLINK_STX_V1: u8 = 0xFE;

/// MAVLink 2 start byte.
pub const MAVLINK_STX_V2: u8 = 0xFD;

/// HEARTBEAT message ID.
pub const MSG_ID_HEARTBEAT: u32 = 0;

/// VFR_HUD message ID.
pub const MSG_ID_VFR_HUD: u32 = 74;

/// Maximum MAVLink frame size (v2 with full payload and signature).
pub const MAX_FRAME_SIZE: usize = 280;

/// Minimum frame size (MAVLink 1 with empty payload).
pub const MIN_FRAME_V1: usize = 8;

const HEADER_LEN_V1: usize = 6;
const HEADER_LEN_V2: usize = 10;
const CHECKSUM_LEN: usize = 2;
const SIGNATURE_LEN: usize = 13;

/// Incompatibility flag: a signature block follows the checksum.
const IFLAG_SIGNED: u8 = 0x01;

/// CRC-16/MCRF4XX (the MAVLink X.25 checksum).
const MAVLINK_CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_MCRF4XX);

/// HEARTBEAT CRC_EXTRA value.
const CRC_EXTRA_HEARTBEAT: u8 = 50;

/// VFR_HUD CRC_EXTRA value.
const CRC_EXTRA_VFR_HUD: u8 = 20;

/// HEARTBEAT payload length.
const HEARTBEAT_LEN: usize = 9;

/// VFR_HUD payload length.
pub const VFR_HUD_LEN: usize = 20;

/// Parsed VFR_HUD message, fields in wire order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VfrHud {
    /// Indicated airspeed (m/s).
    pub airspeed: f32,
    /// Ground speed (m/s).
    pub groundspeed: f32,
    /// Altitude MSL (m).
    pub alt: f32,
    /// Climb rate (m/s).
    pub climb: f32,
    /// Heading in compass degrees (0..360, 0 = north).
    pub heading: i16,
    /// Throttle setting (0 to 100 %).
    pub throttle: u16,
}

impl VfrHud {
    fn from_payload(payload: &[u8; VFR_HUD_LEN]) -> Self {
        let f32_at = |i: usize| {
            f32::from_le_bytes([payload[i], payload[i + 1], payload[i + 2], payload[i + 3]])
        };
        Self {
            airspeed: f32_at(0),
            groundspeed: f32_at(4),
            alt: f32_at(8),
            climb: f32_at(12),
            heading: i16::from_le_bytes([payload[16], payload[17]]),
            throttle: u16::from_le_bytes([payload[18], payload[19]]),
        }
    }

    fn to_payload(self) -> [u8; VFR_HUD_LEN] {
        let mut payload = [0u8; VFR_HUD_LEN];
        payload[0..4].copy_from_slice(&self.airspeed.to_le_bytes());
        payload[4..8].copy_from_slice(&self.groundspeed.to_le_bytes());
        payload[8..12].copy_from_slice(&self.alt.to_le_bytes());
        payload[12..16].copy_from_slice(&self.climb.to_le_bytes());
        payload[16..18].copy_from_slice(&self.heading.to_le_bytes());
        payload[18..20].copy_from_slice(&self.throttle.to_le_bytes());
        payload
    }
}

/// Parsed MAVLink message.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MavMessage {
    VfrHud(VfrHud),
    Heartbeat,
    Unknown(u32),
}

impl MavMessage {
    /// MAVLink message id.
    #[must_use]
    pub fn id(&self) -> u32 {
        match self {
            MavMessage::VfrHud(_) => MSG_ID_VFR_HUD,
            MavMessage::Heartbeat => MSG_ID_HEARTBEAT,
            MavMessage::Unknown(id) => *id,
        }
    }
}

/// Wire protocol version of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MavVersion {
    V1,
    V2,
}

/// A decoded frame with its sender identity.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MavFrame {
    pub version: MavVersion,
    pub seq: u8,
    pub system_id: u8,
    pub component_id: u8,
    pub message: MavMessage,
}

/// Parser error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// MAVLink 1 payload shorter than the message definition.
    Incomplete,
    /// CRC mismatch.
    CrcError,
}

/// MAVLink frame parser.
pub struct MavlinkParser {
    buffer: [u8; MAX_FRAME_SIZE],
    pos: usize,
    state: ParserState,
}

#[derive(Clone, Copy)]
enum ParserState {
    WaitingForStart,
    ReadingHeader { header_len: usize },
    ReadingBody { expected_len: usize },
}

impl MavlinkParser {
    /// Create a new parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: [0u8; MAX_FRAME_SIZE],
            pos: 0,
            state: ParserState::WaitingForStart,
        }
    }

    /// Reset parser state.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.state = ParserState::WaitingForStart;
    }

    /// Feed a byte to the parser.
    ///
    /// Returns `Ok(Some(frame))` when the byte completes a valid frame,
    /// `Ok(None)` while a frame is still being collected and
    /// `Err(CrcError)` when a completed frame fails its checksum.
    pub fn push_byte(&mut self, byte: u8) -> Result<Option<MavFrame>, ParseError> {
        match self.state {
            ParserState::WaitingForStart => {
                let header_len = match byte {
                    MAVLINK_STX_V1 => HEADER_LEN_V1,
                    MAVLINK_STX_V2 => HEADER_LEN_V2,
                    _ => return Ok(None),
                };
                self.buffer[0] = byte;
                self.pos = 1;
                self.state = ParserState::ReadingHeader { header_len };
                Ok(None)
            }
            ParserState::ReadingHeader { header_len } => {
                self.buffer[self.pos] = byte;
                self.pos += 1;

                if self.pos >= header_len {
                    // Got full header, extract payload length
                    let payload_len = self.buffer[1] as usize;
                    let mut expected_len = header_len + payload_len + CHECKSUM_LEN;
                    if header_len == HEADER_LEN_V2 && self.buffer[2] & IFLAG_SIGNED != 0 {
                        expected_len += SIGNATURE_LEN;
                    }
                    self.state = ParserState::ReadingBody { expected_len };
                }
                Ok(None)
            }
            ParserState::ReadingBody { expected_len } => {
                self.buffer[self.pos] = byte;
                self.pos += 1;

                if self.pos >= expected_len {
                    // Complete frame received
                    let result = self.parse_frame();
                    self.reset();
                    result.map(Some)
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Parse a complete frame.
    fn parse_frame(&self) -> Result<MavFrame, ParseError> {
        let version = if self.buffer[0] == MAVLINK_STX_V2 {
            MavVersion::V2
        } else {
            MavVersion::V1
        };
        let payload_len = self.buffer[1] as usize;

        let (seq, system_id, component_id, msg_id, header_len) = match version {
            // MAVLink 2: len, incompat, compat, seq, sysid, compid, msgid[3]
            MavVersion::V2 => {
                let id = (self.buffer[7] as u32)
                    | ((self.buffer[8] as u32) << 8)
                    | ((self.buffer[9] as u32) << 16);
                (self.buffer[4], self.buffer[5], self.buffer[6], id, HEADER_LEN_V2)
            }
            // MAVLink 1: len, seq, sysid, compid, msgid
            MavVersion::V1 => (
                self.buffer[2],
                self.buffer[3],
                self.buffer[4],
                self.buffer[5] as u32,
                HEADER_LEN_V1,
            ),
        };
        let frame = |message| MavFrame {
            version,
            seq,
            system_id,
            component_id,
            message,
        };

        let crc_extra = match msg_id {
            MSG_ID_VFR_HUD => CRC_EXTRA_VFR_HUD,
            MSG_ID_HEARTBEAT => CRC_EXTRA_HEARTBEAT,
            _ => return Ok(frame(MavMessage::Unknown(msg_id))),
        };

        // CRC covers header (excluding STX) + payload + CRC_EXTRA
        let crc_start = header_len + payload_len;
        let calculated_crc = frame_crc(&self.buffer[1..crc_start], crc_extra);
        let received_crc =
            u16::from_le_bytes([self.buffer[crc_start], self.buffer[crc_start + 1]]);
        if calculated_crc != received_crc {
            return Err(ParseError::CrcError);
        }

        let payload = &self.buffer[header_len..crc_start];
        match msg_id {
            MSG_ID_VFR_HUD => {
                if version == MavVersion::V1 && payload_len < VFR_HUD_LEN {
                    return Err(ParseError::Incomplete);
                }
                // MAVLink 2 strips trailing zero bytes; restore them.
                let mut full = [0u8; VFR_HUD_LEN];
                let len = payload.len().min(VFR_HUD_LEN);
                full[..len].copy_from_slice(&payload[..len]);
                Ok(frame(MavMessage::VfrHud(VfrHud::from_payload(&full))))
            }
            _ => Ok(frame(MavMessage::Heartbeat)),
        }
    }
}

impl Default for MavlinkParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a frame.
///
/// MAVLink 2 frames are written unsigned with trailing zero payload bytes
/// stripped. Returns `None` for [`MavMessage::Unknown`], whose layout is
/// not known here.
#[must_use]
pub fn encode_frame(frame: &MavFrame) -> Option<Vec<u8, MAX_FRAME_SIZE>> {
    let mut payload: Vec<u8, VFR_HUD_LEN> = Vec::new();
    let crc_extra = match frame.message {
        MavMessage::VfrHud(hud) => {
            payload.extend_from_slice(&hud.to_payload()).ok()?;
            CRC_EXTRA_VFR_HUD
        }
        MavMessage::Heartbeat => {
            // custom_mode, type, autopilot, base_mode, system_status, mavlink_version
            let mut heartbeat = [0u8; HEARTBEAT_LEN];
            heartbeat[HEARTBEAT_LEN - 1] = 3;
            payload.extend_from_slice(&heartbeat).ok()?;
            CRC_EXTRA_HEARTBEAT
        }
        MavMessage::Unknown(_) => return None,
    };

    let msg_id = frame.message.id();
    let mut out: Vec<u8, MAX_FRAME_SIZE> = Vec::new();
    match frame.version {
        MavVersion::V1 => {
            out.extend_from_slice(&[
                MAVLINK_STX_V1,
                payload.len() as u8,
                frame.seq,
                frame.system_id,
                frame.component_id,
                msg_id as u8,
            ])
            .ok()?;
        }
        MavVersion::V2 => {
            // At least one payload byte is always kept.
            while payload.len() > 1 && payload.last() == Some(&0) {
                payload.pop();
            }
            let id = msg_id.to_le_bytes();
            out.extend_from_slice(&[
                MAVLINK_STX_V2,
                payload.len() as u8,
                0,
                0,
                frame.seq,
                frame.system_id,
                frame.component_id,
                id[0],
                id[1],
                id[2],
            ])
            .ok()?;
        }
    }
    out.extend_from_slice(&payload).ok()?;
    let crc = frame_crc(&out[1..], crc_extra);
    out.extend_from_slice(&crc.to_le_bytes()).ok()?;
    Some(out)
}

/// Frame checksum: `data` (header without STX, then payload) followed by `crc_extra`.
fn frame_crc(data: &[u8], crc_extra: u8) -> u16 {
    let mut digest = MAVLINK_CRC.digest();
    digest.update(data);
    digest.update(&[crc_extra]);
    digest.finalize()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use proptest::prelude::*;
    use std::vec::Vec as StdVec;

    fn hud() -> VfrHud {
        VfrHud {
            airspeed: 14.5,
            groundspeed: 13.25,
            alt: 488.0,
            climb: -1.5,
            heading: 271,
            throttle: 62,
        }
    }

    fn frame(version: MavVersion, component_id: u8, message: MavMessage) -> MavFrame {
        MavFrame {
            version,
            seq: 7,
            system_id: 1,
            component_id,
            message,
        }
    }

    fn parse_all(parser: &mut MavlinkParser, bytes: &[u8]) -> StdVec<Result<MavFrame, ParseError>> {
        bytes
            .iter()
            .filter_map(|&b| parser.push_byte(b).transpose())
            .collect()
    }

    #[test]
    fn test_crc_check_value() {
        assert_eq!(MAVLINK_CRC.checksum(b"123456789"), 0x6F91);
    }

    #[test]
    fn test_known_heartbeat_frame() {
        // v1 HEARTBEAT, seq 0, 1:1, mavlink_version 3, as emitted by a flight stack.
        let wire = [
            0xFE, 0x09, 0x00, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x03, 0x2B, 0x62,
        ];
        let expected = MavFrame {
            version: MavVersion::V1,
            seq: 0,
            system_id: 1,
            component_id: 1,
            message: MavMessage::Heartbeat,
        };

        let mut parser = MavlinkParser::new();
        assert_eq!(parse_all(&mut parser, &wire), [Ok(expected)]);
        assert_eq!(encode_frame(&expected).unwrap().as_slice(), &wire[..]);
    }

    #[test]
    fn test_parser_rejects_invalid_start() {
        let mut parser = MavlinkParser::new();
        // Random byte should be ignored
        assert!(parser.push_byte(0x00).unwrap().is_none());
        assert!(parser.push_byte(0x42).unwrap().is_none());
    }

    #[test]
    fn test_v1_vfr_hud_decodes() {
        let sent = frame(MavVersion::V1, 1, MavMessage::VfrHud(hud()));
        let bytes = encode_frame(&sent).unwrap();
        assert_eq!(bytes.len(), MIN_FRAME_V1 + VFR_HUD_LEN);

        let mut parser = MavlinkParser::new();
        assert_eq!(parse_all(&mut parser, &bytes), [Ok(sent)]);
    }

    #[test]
    fn test_v2_restores_truncated_payload() {
        let zero_tail = VfrHud {
            throttle: 0,
            heading: 0,
            ..hud()
        };
        let sent = frame(MavVersion::V2, 1, MavMessage::VfrHud(zero_tail));
        let bytes = encode_frame(&sent).unwrap();
        // heading and throttle were stripped on the wire
        assert_eq!(bytes[1] as usize, VFR_HUD_LEN - 4);

        let mut parser = MavlinkParser::new();
        assert_eq!(parse_all(&mut parser, &bytes), [Ok(sent)]);
    }

    #[test]
    fn test_v2_signature_is_skipped() {
        let sent = frame(MavVersion::V2, 1, MavMessage::VfrHud(hud()));
        let mut bytes = encode_frame(&sent).unwrap();
        // Set the signed flag and recompute the checksum.
        bytes[2] = IFLAG_SIGNED;
        let crc_at = bytes.len() - CHECKSUM_LEN;
        let crc = frame_crc(&bytes[1..crc_at], CRC_EXTRA_VFR_HUD);
        bytes[crc_at..].copy_from_slice(&crc.to_le_bytes());
        bytes.extend_from_slice(&[0xAA; SIGNATURE_LEN]).unwrap();

        let next = frame(MavVersion::V2, 1, MavMessage::Heartbeat);
        bytes.extend_from_slice(&encode_frame(&next).unwrap()).unwrap();

        let mut parser = MavlinkParser::new();
        assert_eq!(parse_all(&mut parser, &bytes), [Ok(sent), Ok(next)]);
    }

    #[test]
    fn test_corrupt_frame_reports_crc_error() {
        let mut bytes = encode_frame(&frame(MavVersion::V2, 1, MavMessage::VfrHud(hud()))).unwrap();
        bytes[12] ^= 0x01;

        let mut parser = MavlinkParser::new();
        assert_eq!(parse_all(&mut parser, &bytes), [Err(ParseError::CrcError)]);
    }

    #[test]
    fn test_short_v1_vfr_hud_is_incomplete() {
        let payload = [0x11u8; 8];
        let mut bytes: StdVec<u8> = std::vec![MAVLINK_STX_V1, payload.len() as u8, 0, 1, 1, 74];
        bytes.extend_from_slice(&payload);
        let crc = frame_crc(&bytes[1..], CRC_EXTRA_VFR_HUD);
        bytes.extend_from_slice(&crc.to_le_bytes());

        let mut parser = MavlinkParser::new();
        assert_eq!(parse_all(&mut parser, &bytes), [Err(ParseError::Incomplete)]);
    }

    #[test]
    fn test_unknown_message_reported_by_id() {
        // ATTITUDE (30) with an arbitrary checksum
        let mut bytes: StdVec<u8> = std::vec![MAVLINK_STX_V2, 2, 0, 0, 3, 1, 1, 30, 0, 0];
        bytes.extend_from_slice(&[0xAB, 0xCD, 0x00, 0x00]);

        let mut parser = MavlinkParser::new();
        let frames = parse_all(&mut parser, &bytes);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].unwrap().message, MavMessage::Unknown(30));
    }

    #[test]
    fn test_resyncs_after_garbage() {
        let sent = frame(MavVersion::V1, 1, MavMessage::Heartbeat);
        let mut bytes: StdVec<u8> = std::vec![0x00, 0x13, 0x37];
        bytes.extend_from_slice(&encode_frame(&sent).unwrap());

        let mut parser = MavlinkParser::new();
        assert_eq!(parse_all(&mut parser, &bytes), [Ok(sent)]);
    }

    #[test]
    fn test_unknown_messages_cannot_be_encoded() {
        assert!(encode_frame(&frame(MavVersion::V2, 1, MavMessage::Unknown(30))).is_none());
    }

    proptest! {
        #[test]
        fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..1024)) {
            let mut parser = MavlinkParser::new();
            for byte in bytes {
                let _ = parser.push_byte(byte);
            }
        }

        #[test]
        fn vfr_hud_survives_the_wire(
            airspeed in -100.0f32..100.0,
            alt in -500.0f32..10_000.0,
            heading in 0i16..360,
            throttle in 0u16..=100,
            v2 in any::<bool>(),
        ) {
            let message = MavMessage::VfrHud(VfrHud { airspeed, alt, heading, throttle, ..hud() });
            let version = if v2 { MavVersion::V2 } else { MavVersion::V1 };
            let sent = frame(version, 1, message);
            let bytes = encode_frame(&sent).unwrap();

            let mut parser = MavlinkParser::new();
            prop_assert_eq!(parse_all(&mut parser, &bytes), std::vec![Ok(sent)]);
        }
    }
}
