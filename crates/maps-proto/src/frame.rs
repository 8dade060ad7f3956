//! Wire envelope framing and the raw frame type.
//!
//! The normal envelope is `SOH | N | CC | payload | L1 L2 | CR` for
//! requests; responses insert `RS` between the sequence byte and the
//! command, unknown replies insert `NE` and carry no payload. Sizes are
//! therefore 7 + payload for requests and 9 + payload for the other two.
//!
//! Three spontaneous forms (PA-special, SC-special modes D/E/H/I) skip the
//! envelope entirely: raw ASCII-hex bytes terminated by `CR` (plus `LF` for
//! the H/I scanner modes), with no SOH, sequence byte or checksum.

use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    command,
    errors::{ProtocolError, Result},
};

/// Start-of-header byte opening every enveloped frame.
pub const SOH: u8 = 0x01;
/// Line feed; terminates SC-special H/I reception maps after the CR.
pub const LF: u8 = 0x0A;
/// Carriage return; the final byte of every frame.
pub const CR: u8 = 0x0D;

/// Message direction on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Road controller to barrier, or a spontaneous barrier message.
    Request,
    /// `RS`-tagged reply to a request.
    Response,
    /// `NE`-tagged reply: the command is unknown or was not executed.
    Unknown,
}

/// An owned, byte-exact MAPS frame ready for the transport.
///
/// Produced by the builders in [`crate::request`] and [`crate::response`];
/// consumed by whatever writes the serial port. Holds its bytes exactly as
/// they go on the wire, checksum included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    bytes: Bytes,
}

impl RawFrame {
    /// The wire bytes, SOH through CR (or the raw special form).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Wire length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; every frame has at least its delimiters.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consume the frame, keeping the underlying buffer.
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl AsRef<[u8]> for RawFrame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// XOR of `bytes`, serialized as two uppercase ASCII hex digits.
///
/// On the wire the checksum covers everything after SOH and before the
/// checksum slot itself, i.e. `frame[1..len - 3]`.
pub(crate) fn lrc(bytes: &[u8]) -> [u8; 2] {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let xor = bytes.iter().fold(0u8, |acc, byte| acc ^ byte);
    [HEX[usize::from(xor >> 4)], HEX[usize::from(xor & 0x0F)]]
}

/// Assemble a normal enveloped frame.
///
/// `cmd` is the full command mnemonic; only its first two bytes go on the
/// wire (the synthetic three-letter tags exist in the descriptor table but
/// are framed by their two-letter prefix). Unknown replies skip the table
/// lookup so corrupted tags can still be bounced back; the other two
/// directions require a known command and, when `payload` is empty, a
/// descriptor that permits the empty form.
pub(crate) fn build(direction: Direction, num: u8, cmd: &str, payload: &[u8]) -> Result<RawFrame> {
    if num > 9 {
        return Err(ProtocolError::InvalidArgument { reason: "frame number out of range 0..=9" });
    }
    let Some(wire_tag) = cmd.as_bytes().get(..2) else {
        return Err(ProtocolError::InvalidArgument { reason: "command tag shorter than two bytes" });
    };

    match direction {
        Direction::Unknown => debug_assert!(payload.is_empty()),
        Direction::Request | Direction::Response => {
            let Some(spec) = command::lookup(cmd) else {
                return Err(ProtocolError::UnknownCommand { tag: cmd.to_string() });
            };
            if payload.is_empty() && !spec.supports.allows_empty(direction) {
                return Err(ProtocolError::InvalidArgument {
                    reason: "command does not take an empty payload in this direction",
                });
            }
        },
    }

    let direction_tag: &[u8] = match direction {
        Direction::Request => b"",
        Direction::Response => b"RS",
        Direction::Unknown => b"NE",
    };

    let mut buf = BytesMut::with_capacity(7 + direction_tag.len() + payload.len());
    buf.put_u8(SOH);
    buf.put_u8(b'0' + num);
    buf.put_slice(direction_tag);
    buf.put_slice(wire_tag);
    buf.put_slice(payload);

    let checksum = lrc(&buf[1..]);
    buf.put_slice(&checksum);
    buf.put_u8(CR);

    Ok(RawFrame { bytes: buf.freeze() })
}

/// Assemble an envelope-less special frame: `payload`, CR, and LF for the
/// SC-special H/I modes.
pub(crate) fn build_raw(payload: &[u8], with_lf: bool) -> RawFrame {
    let mut buf = BytesMut::with_capacity(payload.len() + 2);
    buf.put_slice(payload);
    buf.put_u8(CR);
    if with_lf {
        buf.put_u8(LF);
    }
    RawFrame { bytes: buf.freeze() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lrc_is_uppercase_hex_of_xor() {
        // XOR of '0', 'B', 'R', '3' is 0x13.
        assert_eq!(lrc(b"0BR3"), *b"13");
        // XOR folding into the A-F range.
        assert_eq!(lrc(&[0xA5]), *b"A5");
        assert_eq!(lrc(&[]), *b"00");
    }

    #[test]
    fn request_envelope_shape() {
        let raw = build(Direction::Request, 0, "BR", b"3").unwrap();
        assert_eq!(raw.as_bytes(), [0x01, b'0', b'B', b'R', b'3', b'1', b'3', 0x0D]);
        assert_eq!(raw.len(), 8);
    }

    #[test]
    fn response_and_unknown_insert_direction_tag() {
        let raw = build(Direction::Response, 4, "MV", &[]).unwrap();
        assert_eq!(&raw.as_bytes()[..6], [0x01, b'4', b'R', b'S', b'M', b'V']);
        assert_eq!(raw.len(), 9);

        let raw = build(Direction::Unknown, 4, "XX", &[]).unwrap();
        assert_eq!(&raw.as_bytes()[..6], [0x01, b'4', b'N', b'E', b'X', b'X']);
        assert_eq!(raw.len(), 9);
    }

    #[test]
    fn rejects_bad_builder_input() {
        assert_eq!(
            build(Direction::Request, 10, "MV", &[]),
            Err(ProtocolError::InvalidArgument { reason: "frame number out of range 0..=9" })
        );
        assert!(matches!(
            build(Direction::Request, 0, "QQ", &[]),
            Err(ProtocolError::UnknownCommand { .. })
        ));
        assert!(matches!(
            build(Direction::Request, 0, "X", &[]),
            Err(ProtocolError::InvalidArgument { .. })
        ));
        // BR takes a payload byte on request; the empty form is reserved
        // for its response.
        assert!(matches!(
            build(Direction::Request, 0, "BR", &[]),
            Err(ProtocolError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn raw_special_frames_skip_the_envelope() {
        let raw = build_raw(b"AAAAAAAAAAAA", false);
        assert_eq!(raw.len(), 13);
        assert_eq!(raw.as_bytes()[12], CR);

        let raw = build_raw(b"AAAAAAAAAAAA", true);
        assert_eq!(raw.len(), 14);
        assert_eq!(&raw.as_bytes()[12..], [CR, LF]);
    }
}
