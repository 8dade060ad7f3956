//! Frame parsing and dispatch.

use crate::{
    command::{self, Tag},
    errors::{ProtocolError, Result},
    frame::{CR, Direction, LF, SOH},
    payloads::Payload,
};

/// A validated, decoded MAPS frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFrame {
    /// Frame sequence number, 0..=9. The envelope-less special forms carry
    /// no sequence byte and decode as 0.
    pub num: u8,
    /// Wire direction.
    pub direction: Direction,
    /// Command tag, with the spontaneous special forms rewritten to the
    /// synthetic `PAS`/`SCS`/`FAS` tags.
    pub command: Tag,
    /// Decoded payload; `None` for commands whose wire form carries none.
    pub payload: Option<Payload>,
}

impl ParsedFrame {
    /// Validate and decode one wire frame.
    ///
    /// Recognizes the three envelope-less special forms first (PA-special
    /// by its 89-byte length, SC-special by 13/14 bytes and terminator),
    /// then applies the envelope rules: checksum, SOH/CR delimiters,
    /// sequence range, direction tag, and finally the per-command payload
    /// grammar from the descriptor table.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::BadFrame`] for a broken envelope
    /// - [`ProtocolError::ChecksumMismatch`] when the LRC does not match
    /// - [`ProtocolError::UnknownCommand`] for tags outside the catalog
    /// - [`ProtocolError::MalformedUnknownReply`] for an `NE` reply that is
    ///   not exactly 9 bytes
    /// - [`ProtocolError::MalformedPayload`] when the payload violates the
    ///   command's field grammar
    pub fn parse(wire: &[u8]) -> Result<Self> {
        if wire.len() < 7 {
            return Err(ProtocolError::BadFrame { reason: "frame shorter than the 7-byte minimum" });
        }

        // Special forms carry ASCII-hex maps and can never start with SOH,
        // so the length/terminator match stays unambiguous against normal
        // envelopes of the same size (an EJ request is also 13 bytes).
        if wire[0] != SOH {
            if wire.len() == 89 && wire[88] == CR {
                return Self::decode_special("PAS", wire);
            }
            if (wire.len() == 13 && wire[12] == CR)
                || (wire.len() == 14 && wire[12] == CR && wire[13] == LF)
            {
                return Self::decode_special("SCS", wire);
            }
        }

        let len = wire.len();
        let num = wire[1].wrapping_sub(b'0');
        let computed = crate::frame::lrc(&wire[1..len - 3]);
        let found = [wire[len - 3], wire[len - 2]];
        if found != computed {
            return Err(ProtocolError::ChecksumMismatch { found, computed });
        }
        if wire[0] != SOH || wire[len - 1] != CR {
            return Err(ProtocolError::BadFrame { reason: "missing SOH or CR delimiter" });
        }
        if num > 9 {
            return Err(ProtocolError::BadFrame { reason: "sequence byte outside 0..=9" });
        }

        match [wire[2], wire[3]] {
            [b'N', b'E'] => {
                // Unknown or not-executed reply; the echoed tag is taken
                // as-is, corrupted commands included.
                if len != 9 {
                    return Err(ProtocolError::MalformedUnknownReply { len });
                }
                Ok(Self {
                    num,
                    direction: Direction::Unknown,
                    command: Tag::from_wire([wire[4], wire[5]]),
                    payload: None,
                })
            },
            [b'R', b'S'] => {
                let tag = Tag::from_wire([wire[4], wire[5]]);
                let Some(spec) = command::lookup_bytes(tag.as_bytes()) else {
                    return Err(ProtocolError::UnknownCommand { tag: tag.to_string() });
                };
                let mut parsed =
                    Self { num, direction: Direction::Response, command: tag, payload: None };
                (spec.response)(wire, &mut parsed)?;
                Ok(parsed)
            },
            _ => {
                let mut tag = Tag::from_wire([wire[2], wire[3]]);
                // A plain FA request is the bare 7-byte envelope; with a
                // payload it is the spontaneous end-of-vehicle message.
                if tag == "FA" && len > 7 {
                    tag = Tag::new("FAS");
                }
                let Some(spec) = command::lookup_bytes(tag.as_bytes()) else {
                    return Err(ProtocolError::UnknownCommand { tag: tag.to_string() });
                };
                let mut parsed =
                    Self { num, direction: Direction::Request, command: tag, payload: None };
                (spec.request)(wire, &mut parsed)?;
                Ok(parsed)
            },
        }
    }

    fn decode_special(tag: &'static str, wire: &[u8]) -> Result<Self> {
        let Some(spec) = command::lookup(tag) else {
            return Err(ProtocolError::UnknownCommand { tag: tag.to_string() });
        };
        let mut parsed = Self {
            num: 0,
            direction: Direction::Request,
            command: Tag::new(tag),
            payload: None,
        };
        (spec.request)(wire, &mut parsed)?;
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(num: u8, middle: &[u8]) -> Vec<u8> {
        let mut wire = vec![SOH, b'0' + num];
        wire.extend_from_slice(middle);
        let checksum = crate::frame::lrc(&wire[1..]);
        wire.extend_from_slice(&checksum);
        wire.push(CR);
        wire
    }

    #[test]
    fn rejects_short_input() {
        assert_eq!(
            ParsedFrame::parse(&[SOH, b'0', b'M', b'V', CR]),
            Err(ProtocolError::BadFrame { reason: "frame shorter than the 7-byte minimum" })
        );
    }

    #[test]
    fn rejects_checksum_before_delimiters() {
        // Corrupt both the SOH and the checksum: the checksum error wins
        // because it is checked first.
        let mut wire = envelope(0, b"MV");
        wire[0] = 0x02;
        wire[2] = b'X';
        assert!(matches!(
            ParsedFrame::parse(&wire),
            Err(ProtocolError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn rejects_missing_delimiters_and_bad_sequence() {
        let mut wire = envelope(0, b"MV");
        let last = wire.len() - 1;
        wire[last] = b'!';
        // Keep the checksum valid: CR sits outside the checksummed range.
        assert_eq!(
            ParsedFrame::parse(&wire),
            Err(ProtocolError::BadFrame { reason: "missing SOH or CR delimiter" })
        );

        let mut wire = vec![SOH, b':'];
        wire.extend_from_slice(b"MV");
        let checksum = crate::frame::lrc(&wire[1..]);
        wire.extend_from_slice(&checksum);
        wire.push(CR);
        assert_eq!(
            ParsedFrame::parse(&wire),
            Err(ProtocolError::BadFrame { reason: "sequence byte outside 0..=9" })
        );
    }

    #[test]
    fn unknown_reply_must_be_nine_bytes() {
        let wire = envelope(3, b"NEXX");
        let parsed = ParsedFrame::parse(&wire).expect("should parse");
        assert_eq!(parsed.direction, Direction::Unknown);
        assert_eq!(parsed.command, "XX");
        assert!(parsed.payload.is_none());

        let wire = envelope(3, b"NEXX0");
        assert_eq!(
            ParsedFrame::parse(&wire),
            Err(ProtocolError::MalformedUnknownReply { len: 10 })
        );
    }

    #[test]
    fn unknown_request_tag_is_reported() {
        let wire = envelope(0, b"QQ");
        assert_eq!(
            ParsedFrame::parse(&wire),
            Err(ProtocolError::UnknownCommand { tag: "QQ".to_string() })
        );
    }

    #[test]
    fn thirteen_byte_envelope_is_not_a_reception_map() {
        // An EJ request is exactly 13 bytes and ends with CR, the same
        // pattern as an SC-special D map; SOH keeps it on the normal path.
        let wire = envelope(1, b"EJ010203");
        assert_eq!(wire.len(), 13);
        let parsed = ParsedFrame::parse(&wire).expect("should parse");
        assert_eq!(parsed.command, "EJ");
    }
}
