//! Adjustment and self-test map payloads (AJ, PA-special, TT).

use crate::{
    ascii,
    errors::Result,
    parse::ParsedFrame,
    payloads::{Payload, malformed},
};

/// Hex bytes in the group-of-8 receiver map.
pub const RECV_GROUP8: usize = 64;
/// Hex bytes in the group-of-3 receiver map.
pub const RECV_GROUP3: usize = 24;
/// Hex bytes in the emitter self-test map.
pub const EMITTER_MAP: usize = 16;
/// Hex bytes in the receiver self-test map.
pub const RECEIVER_MAP: usize = 8;

/// Receiver adjustment maps carried by AJ requests and the envelope-less
/// PA-special frame.
///
/// Each byte encodes the reception state of four emitters as one uppercase
/// hex digit: `'F'` all four good, `'0'` all four bad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarrierAdjust {
    /// Group-of-8 reception map. CF-24P uses only the first 48 bytes; the
    /// last 16 are reserved there.
    pub rcv_map8: [u8; RECV_GROUP8],
    /// Group-of-3 reception map.
    pub rcv_map3: [u8; RECV_GROUP3],
}

/// Emitter/receiver self-test maps (TT response).
///
/// On the wire the emitter map is introduced by a literal `'M'` and the
/// receiver map by a literal `'R'`; the decoder checks both markers and the
/// builder re-emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarrierTest {
    /// Emitter status map, uppercase hex. CF-24P uses only the first 12
    /// bytes.
    pub emitters: [u8; EMITTER_MAP],
    /// Receiver status map, uppercase hex. CF-24P uses only the first 6
    /// bytes.
    pub receivers: [u8; RECEIVER_MAP],
}

/// AJ request payload: 95-byte frame, both maps back to back at byte 4.
pub(crate) fn decode_adjust(frame: &[u8], parsed: &mut ParsedFrame) -> Result<()> {
    if frame.len() != 95 {
        return Err(malformed("adjustment request must be 95 bytes"));
    }
    parsed.payload = Some(Payload::BarrierAdjust(split_maps(&frame[4..4 + 88])));
    Ok(())
}

/// PA-special payload: the same 88 map bytes with no envelope, checked for
/// length and CR by the parser before dispatch.
pub(crate) fn decode_adjust_special(frame: &[u8], parsed: &mut ParsedFrame) -> Result<()> {
    if frame.len() != 89 {
        return Err(malformed("special adjustment frame must be 89 bytes"));
    }
    parsed.payload = Some(Payload::BarrierAdjust(split_maps(&frame[..88])));
    Ok(())
}

fn split_maps(bytes: &[u8]) -> BarrierAdjust {
    let mut data = BarrierAdjust { rcv_map8: [0; RECV_GROUP8], rcv_map3: [0; RECV_GROUP3] };
    data.rcv_map8.copy_from_slice(&bytes[..RECV_GROUP8]);
    data.rcv_map3.copy_from_slice(&bytes[RECV_GROUP8..]);
    data
}

/// TT response payload: 35-byte frame, `'M'` marker at byte 6, `'R'`
/// marker at byte 23, hex maps in between.
pub(crate) fn decode_test(frame: &[u8], parsed: &mut ParsedFrame) -> Result<()> {
    if frame.len() != 35 {
        return Err(malformed("barrier-test response must be 35 bytes"));
    }
    if frame[6] != b'M' || frame[23] != b'R' {
        return Err(malformed("missing M or R map marker"));
    }
    if !ascii::is_hex_map(&frame[7..23]) || !ascii::is_hex_map(&frame[24..32]) {
        return Err(malformed("self-test map is not ASCII hex"));
    }
    let mut data = BarrierTest { emitters: [0; EMITTER_MAP], receivers: [0; RECEIVER_MAP] };
    data.emitters.copy_from_slice(&frame[7..23]);
    data.receivers.copy_from_slice(&frame[24..32]);
    parsed.payload = Some(Payload::BarrierTest(data));
    Ok(())
}
