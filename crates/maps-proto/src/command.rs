//! Command catalog: tags, family/support masks, and the descriptor table.
//!
//! The table is the shared heart of both surfaces. Builders consult it to
//! enforce which commands accept empty payloads; the parser dispatches on
//! it to pick the request or response payload decoder. The family mask is
//! informational: the codec never rejects a command because of the barrier
//! model it is addressed to, but callers that track the attached hardware
//! can consult it.

use std::fmt;

use crate::{
    errors::Result,
    frame::Direction,
    parse::ParsedFrame,
    payloads::{self, adjust, heights, reset, scanner, status, vehicle},
};

/// A command tag as it appears in a parsed frame.
///
/// Normal tags are the two wire letters. The synthetic tags `PAS`, `SCS`
/// and `FAS` are three letters and never appear on the wire: the parser
/// substitutes them so callers can tell the special spontaneous forms from
/// the plain `PA`, `SC` and `FA` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    bytes: [u8; 3],
    len: u8,
}

impl Tag {
    pub(crate) fn new(tag: &'static str) -> Self {
        let src = tag.as_bytes();
        debug_assert!(src.len() == 2 || src.len() == 3);
        let mut bytes = [0u8; 3];
        bytes[..src.len()].copy_from_slice(src);
        Self { bytes, len: src.len() as u8 }
    }

    pub(crate) fn from_wire(two: [u8; 2]) -> Self {
        Self { bytes: [two[0], two[1], 0], len: 2 }
    }

    /// Tag bytes: two for wire tags, three for the synthetic tags.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Unknown replies can echo arbitrary bytes; render them lossily.
        write!(f, "{}", String::from_utf8_lossy(self.as_bytes()))
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

/// Barrier family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// CF-24P: horizontal barrier with 24 photocells.
    Cf24P,
    /// CF-150: low-cost vertical barrier.
    Cf150,
    /// CF-220/M: full vertical barrier with axle counting and
    /// classification.
    Cf220,
}

/// Set of barrier families that speak a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyMask(u8);

impl FamilyMask {
    const CF24P: u8 = 0b001;
    const CF150: u8 = 0b010;
    const CF220: u8 = 0b100;

    const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// True when the command is understood by `family`.
    pub fn contains(self, family: Family) -> bool {
        let bit = match family {
            Family::Cf24P => Self::CF24P,
            Family::Cf150 => Self::CF150,
            Family::Cf220 => Self::CF220,
        };
        self.0 & bit != 0
    }
}

/// Which envelope shapes a command legally takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportMask(u8);

impl SupportMask {
    const EMPTY_RESPONSE: u8 = 0b001;
    const EMPTY_REQUEST: u8 = 0b010;
    const UNKNOWN_REPLY: u8 = 0b100;

    const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// True when a request may carry no payload.
    pub fn empty_request(self) -> bool {
        self.0 & Self::EMPTY_REQUEST != 0
    }

    /// True when a response may carry no payload.
    pub fn empty_response(self) -> bool {
        self.0 & Self::EMPTY_RESPONSE != 0
    }

    /// True when the barrier may bounce this command with an `NE` reply.
    /// Informational; the framer does not enforce it.
    pub fn unknown_reply(self) -> bool {
        self.0 & Self::UNKNOWN_REPLY != 0
    }

    pub(crate) fn allows_empty(self, direction: Direction) -> bool {
        match direction {
            Direction::Request => self.empty_request(),
            Direction::Response => self.empty_response(),
            Direction::Unknown => true,
        }
    }
}

/// Per-command payload decoder. Receives the whole wire frame and fills in
/// the parsed payload; the embedded special forms also rewrite the tag.
pub(crate) type PayloadDecoder = fn(&[u8], &mut ParsedFrame) -> Result<()>;

/// Descriptor-table entry for one command.
#[derive(Debug)]
pub struct CommandSpec {
    /// Command mnemonic: two letters, or a synthetic `PAS`/`SCS`/`FAS`.
    pub tag: &'static str,
    /// Families that speak this command. Informational; not enforced.
    pub families: FamilyMask,
    /// Envelope shapes the framer enforces for empty payloads.
    pub supports: SupportMask,
    pub(crate) request: PayloadDecoder,
    pub(crate) response: PayloadDecoder,
}

macro_rules! spec {
    ($tag:literal, $families:literal, $supports:literal, $request:path, $response:path) => {
        CommandSpec {
            tag: $tag,
            families: FamilyMask::from_bits($families),
            supports: SupportMask::from_bits($supports),
            request: $request,
            response: $response,
        }
    };
}

/// The command catalog. Family bits are CF-220 | CF-150 | CF-24P, support
/// bits are unknown-reply | empty-request | empty-response, matching the
/// protocol manual's tables. `PAS`, `SCS` and `FAS` are the synthetic
/// entries the parser dispatches to after recognizing a special frame.
static COMMANDS: &[CommandSpec] = &[
    spec!("BR", 0b101, 0b101, payloads::decode_one_byte, payloads::decode_no_data),
    spec!("CA", 0b100, 0b101, reset::decode_anomaly_limits, payloads::decode_no_data),
    spec!("DE", 0b111, 0b110, payloads::decode_no_data, status::decode_status),
    spec!("EA", 0b101, 0b110, payloads::decode_no_data, heights::decode_heights),
    spec!("ER", 0b101, 0b100, payloads::decode_two_digit, payloads::decode_one_byte),
    spec!("FA", 0b111, 0b111, payloads::decode_no_data, payloads::decode_no_data),
    spec!("MV", 0b111, 0b111, payloads::decode_no_data, payloads::decode_no_data),
    spec!("PA", 0b111, 0b111, payloads::decode_no_data, payloads::decode_no_data),
    spec!("AC", 0b111, 0b111, payloads::decode_no_data, payloads::decode_no_data),
    spec!("PR", 0b100, 0b101, payloads::decode_two_digit, payloads::decode_no_data),
    spec!("RF", 0b111, 0b111, payloads::decode_no_data, payloads::decode_no_data),
    spec!("SC", 0b101, 0b101, scanner::decode_scanner, payloads::decode_no_data),
    spec!("SM", 0b111, 0b101, status::decode_work_mode, payloads::decode_no_data),
    spec!("SR", 0b100, 0b101, payloads::decode_two_digit, payloads::decode_two_digit),
    spec!("TT", 0b111, 0b110, payloads::decode_no_data, adjust::decode_test),
    spec!("RH", 0b001, 0b100, heights::decode_height_relay, heights::decode_height_relay),
    spec!("CB", 0b010, 0b110, payloads::decode_no_data, payloads::decode_one_byte),
    // Special spontaneous forms; reached only through the parser's
    // special-frame and FA-rewrite paths.
    spec!("PAS", 0b111, 0b001, adjust::decode_adjust_special, payloads::decode_no_data),
    spec!("SCS", 0b101, 0b001, scanner::decode_reception, payloads::decode_no_data),
    spec!("FAS", 0b110, 0b001, vehicle::decode_end_vehicle, payloads::decode_no_data),
    spec!("AJ", 0b111, 0b001, adjust::decode_adjust, payloads::decode_no_data),
    spec!("AP", 0b111, 0b001, heights::decode_axis_first_height, payloads::decode_no_data),
    spec!("EJ", 0b100, 0b001, vehicle::decode_axis_speed, payloads::decode_no_data),
    spec!("EM", 0b111, 0b001, status::decode_malfunction, payloads::decode_no_data),
    spec!("FP", 0b001, 0b011, payloads::decode_no_data, payloads::decode_no_data),
    spec!("FR", 0b110, 0b001, vehicle::decode_end_vehicle, payloads::decode_no_data),
    spec!("FX", 0b111, 0b001, vehicle::decode_failure, payloads::decode_no_data),
    spec!("IP", 0b001, 0b011, payloads::decode_no_data, payloads::decode_no_data),
    spec!("IA", 0b110, 0b011, vehicle::decode_optional_speed, payloads::decode_no_data),
    spec!("IR", 0b110, 0b011, payloads::decode_no_data, payloads::decode_no_data),
    spec!("PX", 0b111, 0b001, vehicle::decode_failure, payloads::decode_no_data),
    spec!("RE", 0b111, 0b011, reset::decode_reset, payloads::decode_no_data),
    spec!("RM", 0b110, 0b011, vehicle::decode_optional_speed, payloads::decode_no_data),
];

/// Look up a command descriptor by its mnemonic.
///
/// A linear scan; the table has about thirty entries and lookups sit on a
/// per-frame path, not a per-byte one.
pub fn lookup(tag: &str) -> Option<&'static CommandSpec> {
    lookup_bytes(tag.as_bytes())
}

pub(crate) fn lookup_bytes(tag: &[u8]) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.tag.as_bytes() == tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_wire_and_synthetic_tags() {
        assert_eq!(lookup("DE").map(|spec| spec.tag), Some("DE"));
        assert_eq!(lookup("FAS").map(|spec| spec.tag), Some("FAS"));
        assert!(lookup("XX").is_none());
        // The table matches whole mnemonics, not prefixes.
        assert!(lookup("DEX").is_none());
    }

    #[test]
    fn family_masks_match_the_catalog() {
        let rh = lookup("RH").map(|spec| spec.families).unwrap_or(FamilyMask::from_bits(0));
        assert!(rh.contains(Family::Cf24P));
        assert!(!rh.contains(Family::Cf150));
        assert!(!rh.contains(Family::Cf220));

        let ej = lookup("EJ").map(|spec| spec.families).unwrap_or(FamilyMask::from_bits(0));
        assert!(ej.contains(Family::Cf220));
        assert!(!ej.contains(Family::Cf24P));
    }

    #[test]
    fn support_masks_match_the_catalog() {
        let br = lookup("BR").map(|spec| spec.supports).unwrap_or(SupportMask::from_bits(0));
        assert!(br.unknown_reply());
        assert!(!br.empty_request());
        assert!(br.empty_response());

        let mv = lookup("MV").map(|spec| spec.supports).unwrap_or(SupportMask::from_bits(0));
        assert!(mv.empty_request());
        assert!(mv.empty_response());
    }

    #[test]
    fn tag_display_is_lossy() {
        assert_eq!(Tag::new("SCS").to_string(), "SCS");
        assert_eq!(Tag::from_wire([b'B', b'R']).to_string(), "BR");
        assert_eq!(Tag::from_wire([0xFF, b'R']).to_string(), "\u{fffd}R");
    }
}
