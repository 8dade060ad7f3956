//! Typed payload variants, one per wire payload shape.
//!
//! The original protocol hands payloads around as untyped byte ranges and
//! leaves the interpretation to the reader. Here every command decodes into
//! exactly one variant of [`Payload`], and every builder accepts only the
//! matching typed record, so a frame can never be read through the wrong
//! lens.
//!
//! The generic decoders in this module cover the shapes shared by several
//! commands: the bare envelope, a single status byte, and a two-digit
//! value. Everything with real structure lives in the submodules.

pub mod adjust;
pub mod heights;
pub mod reset;
pub mod scanner;
pub mod status;
pub mod vehicle;

use crate::{
    ascii,
    errors::{ProtocolError, Result},
    frame::Direction,
    parse::ParsedFrame,
};

/// All possible frame payloads.
///
/// The live variant is determined by the command tag and, for the commands
/// whose shape varies across barrier families, by the wire length of the
/// frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// One numeric value: BR, PR, IA, RM requests; ER both directions;
    /// SR both directions; CB responses.
    Single(u8),
    /// Anomaly-alarm sensor limits (CA request).
    AnomalyLimits(reset::AnomalyLimits),
    /// Barrier status (DE response, spontaneous EM).
    BarrierStatus(status::BarrierStatus),
    /// Working-mode selection (SM request).
    WorkMode(status::WorkMode),
    /// Vehicle height summary (EA response).
    Heights(heights::Heights),
    /// Emitter/receiver self-test maps (TT response).
    BarrierTest(adjust::BarrierTest),
    /// Contact-output configuration (RH request and response).
    HeightRelay(heights::HeightRelay),
    /// Receiver adjustment maps (AJ request, PA-special).
    BarrierAdjust(adjust::BarrierAdjust),
    /// Scanner-mode selection (SC request).
    Scanner(scanner::Scanner),
    /// Spontaneous scanner data (SC-special forms).
    ScannerSpecial(scanner::ScannerSpecial),
    /// Height above the first positive axle (spontaneous AP).
    AxisFirstHeight(heights::AxisFirstHeight),
    /// Axle counts and instantaneous speed (spontaneous EJ).
    AxisSpeed(vehicle::AxisSpeed),
    /// End-of-vehicle report (spontaneous FA, FR).
    EndVehicle(vehicle::EndVehicle),
    /// Sensor failure report (FX, PX).
    Failure(vehicle::Failure),
    /// Reset identification block (39-byte RE form).
    Reset(reset::ResetInfo),
}

pub(crate) fn malformed(reason: &'static str) -> ProtocolError {
    ProtocolError::MalformedPayload { reason }
}

/// Payload start offset: requests carry data right after the command tag,
/// responses two bytes later because of the `RS` insert.
pub(crate) fn data_offset(direction: Direction) -> usize {
    match direction {
        Direction::Request => 4,
        Direction::Response | Direction::Unknown => 6,
    }
}

/// Accepts the bare envelope: 7-byte requests, 9-byte responses.
pub(crate) fn decode_no_data(frame: &[u8], parsed: &mut ParsedFrame) -> Result<()> {
    let want = match parsed.direction {
        Direction::Request => 7,
        Direction::Response | Direction::Unknown => 9,
    };
    if frame.len() != want {
        return Err(malformed("command carries no payload at this length"));
    }
    Ok(())
}

/// One status digit: BR requests, ER and CB responses. BR narrows the
/// digit to the five defined baud-rate selectors.
pub(crate) fn decode_one_byte(frame: &[u8], parsed: &mut ParsedFrame) -> Result<()> {
    let pos = data_offset(parsed.direction);
    if frame.len() != pos + 4 {
        return Err(malformed("single-byte payload has the wrong length"));
    }
    if parsed.command == "BR" && !(b'1'..=b'5').contains(&frame[pos]) {
        return Err(malformed("baud-rate selector outside 1..=5"));
    }
    let value = ascii::digit(frame[pos]).ok_or_else(|| malformed("status byte is not a digit"))?;
    parsed.payload = Some(Payload::Single(value));
    Ok(())
}

/// Two decimal digits: ER, PR and SR requests, SR responses. ER receivers
/// are numbered 1..=24; SR tow-sensor counts span 3..=10.
pub(crate) fn decode_two_digit(frame: &[u8], parsed: &mut ParsedFrame) -> Result<()> {
    let pos = data_offset(parsed.direction);
    if frame.len() != pos + 5 {
        return Err(malformed("two-digit payload has the wrong length"));
    }
    let value = ascii::two_digits(frame[pos], frame[pos + 1])
        .ok_or_else(|| malformed("expected two decimal digits"))?;
    if parsed.command == "ER" && !(1..=24).contains(&value) {
        return Err(malformed("receiver number outside 1..=24"));
    }
    if parsed.command == "SR" && !(3..=10).contains(&value) {
        return Err(malformed("tow-sensor count outside 3..=10"));
    }
    parsed.payload = Some(Payload::Single(value));
    Ok(())
}
