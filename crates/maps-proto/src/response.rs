//! Response builders, one constructor per command.
//!
//! Responses insert the `RS` direction tag after the sequence byte; the
//! unknown reply inserts `NE` instead and never carries data. These exist
//! mostly for the barrier side of the conversation and for test benches
//! that impersonate one.

use crate::{
    ascii,
    errors::{ProtocolError, Result},
    frame::{self, Direction, RawFrame},
    payloads::{
        adjust::BarrierTest,
        heights::Heights,
        status::BarrierStatus,
    },
};

/// Reply that a command is unknown or was not executed (`NE`).
///
/// Unlike every other builder this one accepts tags outside the catalog,
/// so a receiver can bounce commands mangled in transit straight back.
pub fn unknown(num: u8, cmd: &str) -> Result<RawFrame> {
    frame::build(Direction::Unknown, num, cmd, &[])
}

/// Build a response with no payload.
///
/// Covers the plain acknowledgements (BR, CA, FA, MV, PA, AC, PR, RF, SC,
/// SM, SR) and the empty replies to the spontaneous commands.
pub fn empty(num: u8, cmd: &str) -> Result<RawFrame> {
    frame::build(Direction::Response, num, cmd, &[])
}

/// DE: barrier status response.
pub fn barrier_status(num: u8, data: &BarrierStatus) -> Result<RawFrame> {
    data.validate()?;
    let firmware = ascii::encode_two_digits(data.firmware_ver);
    let payload = [
        b'0' + data.work_mode,
        ascii::hex_digit(data.axis_ispeed),
        b'0' + data.axis_height,
        data.tow_byte(),
        b'0' + data.hw_failure,
        b'0' + data.se_cleaning,
        firmware[0],
        firmware[1],
        if data.rcvr_direction == 0 { b'0' } else { data.rcvr_direction },
        if data.barrier_model < 10 { b'0' + data.barrier_model } else { data.barrier_model },
    ];
    frame::build(Direction::Response, num, "DE", &payload)
}

/// EA: vehicle-heights response (CF-220, CF-24P). Heights above 99 clamp
/// to 99.
pub fn heights(num: u8, data: &Heights) -> Result<RawFrame> {
    let mut payload = [0u8; 8];
    payload[..2].copy_from_slice(&ascii::encode_two_digits(data.imax_height.min(99)));
    payload[2..4].copy_from_slice(&ascii::encode_two_digits(data.umax_height.min(99)));
    payload[4..6].copy_from_slice(&ascii::encode_two_digits(data.umin_height.min(99)));
    payload[6..].copy_from_slice(&ascii::encode_two_digits(data.lmax_height.min(99)));
    frame::build(Direction::Response, num, "EA", &payload)
}

/// ER: receiver concealment state (CF-220, CF-24P).
pub fn receiver_status(num: u8, hidden: bool) -> Result<RawFrame> {
    frame::build(Direction::Response, num, "ER", &[if hidden { b'1' } else { b'0' }])
}

/// TT: barrier self-test response with the emitter and receiver maps.
pub fn barrier_test(num: u8, data: &BarrierTest) -> Result<RawFrame> {
    if !ascii::is_hex_map(&data.emitters) || !ascii::is_hex_map(&data.receivers) {
        return Err(ProtocolError::InvalidArgument {
            reason: "self-test map is not ASCII hex",
        });
    }
    let mut payload = [0u8; 26];
    payload[0] = b'M';
    payload[1..17].copy_from_slice(&data.emitters);
    payload[17] = b'R';
    payload[18..].copy_from_slice(&data.receivers);
    frame::build(Direction::Response, num, "TT", &payload)
}

/// RH: contact-output configuration response (CF-24P). A nonzero `wmode`
/// emits the photocell mode.
pub fn height_relay(num: u8, wmode: u8, receiver: u8) -> Result<RawFrame> {
    if !(1..=24).contains(&receiver) {
        return Err(ProtocolError::InvalidArgument {
            reason: "receiver number out of range 1..=24",
        });
    }
    let mut payload = [0u8; 3];
    payload[0] = if wmode != 0 { b'1' } else { b'0' };
    payload[1..].copy_from_slice(&ascii::encode_two_digits(receiver));
    frame::build(Direction::Response, num, "RH", &payload)
}

/// CB: state of the vehicle-detection loop, answered by the road
/// controller (CF-150).
pub fn loop_state(num: u8, enabled: bool) -> Result<RawFrame> {
    frame::build(Direction::Response, num, "CB", &[if enabled { b'1' } else { b'0' }])
}
