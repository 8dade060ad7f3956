//! Vehicle movement and failure payloads (FA/FR, EJ, FX/PX, IA/RM).

use crate::{
    ascii,
    errors::Result,
    parse::ParsedFrame,
    payloads::{Payload, malformed},
};

/// End-of-vehicle report, sent spontaneously when a vehicle leaves the
/// barrier (FA moving forward, FR backing out).
///
/// The wire length selects the shape: CF-150 sends only the axle counts,
/// CF-220 adds the classification byte, and with the second SM byte set to
/// 2 it also breaks the counts down by height above the barrier base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndVehicle {
    /// CF-150 form: axle counts only.
    AxesOnly {
        /// Positive (forward) axles, 0..=99.
        paxes: u8,
        /// Negative (reversing) axles, 0..=99.
        naxes: u8,
    },
    /// CF-220 form with the second SM byte 0 or 1: counts plus class.
    Classified {
        /// Positive axles, 0..=99.
        paxes: u8,
        /// Negative axles, 0..=99.
        naxes: u8,
        /// Classification byte: `'M'` motorcycle, `'X'` unclassified, or
        /// `'A'`..`'F'` by axle count and first-axle height.
        vclass: u8,
    },
    /// CF-220 form with the second SM byte 2: counts at three heights.
    Detailed {
        /// Positive axles, 0..=99.
        paxes: u8,
        /// Negative axles, 0..=99.
        naxes: u8,
        /// Positive axles 10 cm above the barrier base, 0..=99.
        paxes10: u8,
        /// Negative axles 10 cm above the barrier base, 0..=99.
        naxes10: u8,
        /// Positive axles 16 cm above the barrier base, 0..=99.
        paxes16: u8,
        /// Negative axles 16 cm above the barrier base, 0..=99.
        naxes16: u8,
        /// Positive axles 22 cm above the barrier base, 0..=99.
        paxes22: u8,
        /// Negative axles 22 cm above the barrier base, 0..=99.
        naxes22: u8,
        /// Classification byte, same alphabet as the classified form.
        vclass: u8,
    },
}

impl EndVehicle {
    /// The SM-byte selector the wire form implies: 3 for the bare counts,
    /// 1 for counts plus class, 2 for the detailed breakdown.
    pub fn smb(&self) -> u8 {
        match self {
            Self::AxesOnly { .. } => 3,
            Self::Classified { .. } => 1,
            Self::Detailed { .. } => 2,
        }
    }
}

/// Axle count and speed on axle detection (spontaneous EJ, CF-220 only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSpeed {
    /// Positive axles so far, 0..=99.
    pub paxes: u8,
    /// Negative axles so far, 0..=99.
    pub naxes: u8,
    /// Instantaneous speed on this axle in km/h, 0..=99.
    pub ispeed: u8,
}

/// Sensor failure report (FX failure start, PX failure end).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Failure {
    /// Affected sensor kind: `'R'` receiver or `'E'` emitter.
    pub kind: u8,
    /// Failing group number, 0..=8 (CF-24P tops out at 6).
    pub ngroup: u8,
    /// Failing sensor within the group, 0..=8.
    pub nsensor: u8,
}

/// True for the classification alphabet `'M'`, `'X'`, `'A'`..`'F'`.
pub(crate) fn is_class(byte: u8) -> bool {
    matches!(byte, b'M' | b'X' | b'A'..=b'F')
}

/// End-of-vehicle payload: 11 bytes for bare counts, 12 with the class
/// byte, 24 for the CF-220 detailed form.
pub(crate) fn decode_end_vehicle(frame: &[u8], parsed: &mut ParsedFrame) -> Result<()> {
    let count = |pos: usize| {
        ascii::two_digits(frame[pos], frame[pos + 1])
            .ok_or_else(|| malformed("axle count is not two digits"))
    };
    let class = |pos: usize| {
        if is_class(frame[pos]) {
            Ok(frame[pos])
        } else {
            Err(malformed("classification byte outside M, X, A-F"))
        }
    };
    let data = match frame.len() {
        11 => EndVehicle::AxesOnly { paxes: count(4)?, naxes: count(6)? },
        12 => EndVehicle::Classified { paxes: count(4)?, naxes: count(6)?, vclass: class(8)? },
        24 => EndVehicle::Detailed {
            paxes: count(4)?,
            naxes: count(6)?,
            paxes10: count(8)?,
            naxes10: count(10)?,
            paxes16: count(12)?,
            naxes16: count(14)?,
            paxes22: count(16)?,
            naxes22: count(18)?,
            vclass: class(20)?,
        },
        _ => return Err(malformed("end-of-vehicle report must be 11, 12 or 24 bytes")),
    };
    parsed.payload = Some(Payload::EndVehicle(data));
    Ok(())
}

/// EJ payload: 13-byte frame, three two-digit values.
pub(crate) fn decode_axis_speed(frame: &[u8], parsed: &mut ParsedFrame) -> Result<()> {
    if frame.len() != 13 {
        return Err(malformed("axle-speed report must be 13 bytes"));
    }
    let count = |pos: usize| {
        ascii::two_digits(frame[pos], frame[pos + 1])
            .ok_or_else(|| malformed("axle-speed field is not two digits"))
    };
    parsed.payload = Some(Payload::AxisSpeed(AxisSpeed {
        paxes: count(4)?,
        naxes: count(6)?,
        ispeed: count(8)?,
    }));
    Ok(())
}

/// FX/PX payload: 10-byte frame, kind byte plus group and sensor digits.
pub(crate) fn decode_failure(frame: &[u8], parsed: &mut ParsedFrame) -> Result<()> {
    if frame.len() != 10 {
        return Err(malformed("failure report must be 10 bytes"));
    }
    if frame[4] != b'R' && frame[4] != b'E' {
        return Err(malformed("failed sensor kind outside R, E"));
    }
    let ngroup = ascii::digit(frame[5])
        .filter(|group| *group <= 8)
        .ok_or_else(|| malformed("group number outside 0..=8"))?;
    let nsensor = ascii::digit(frame[6])
        .filter(|sensor| *sensor <= 8)
        .ok_or_else(|| malformed("sensor number outside 0..=8"))?;
    parsed.payload = Some(Payload::Failure(Failure { kind: frame[4], ngroup, nsensor }));
    Ok(())
}

/// IA/RM payload: the empty 7-byte form when the optional value is off,
/// or two digits (speed for IA, axle count for RM).
pub(crate) fn decode_optional_speed(frame: &[u8], parsed: &mut ParsedFrame) -> Result<()> {
    match frame.len() {
        7 => Ok(()),
        9 => {
            let value = ascii::two_digits(frame[4], frame[5])
                .ok_or_else(|| malformed("expected two decimal digits"))?;
            parsed.payload = Some(Payload::Single(value));
            Ok(())
        },
        _ => Err(malformed("optional-value report must be 7 or 9 bytes")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smb_selector_follows_the_wire_form() {
        assert_eq!(EndVehicle::AxesOnly { paxes: 1, naxes: 0 }.smb(), 3);
        assert_eq!(EndVehicle::Classified { paxes: 1, naxes: 0, vclass: b'A' }.smb(), 1);
        let detailed = EndVehicle::Detailed {
            paxes: 1,
            naxes: 0,
            paxes10: 0,
            naxes10: 0,
            paxes16: 0,
            naxes16: 0,
            paxes22: 0,
            naxes22: 0,
            vclass: b'M',
        };
        assert_eq!(detailed.smb(), 2);
    }

    #[test]
    fn class_alphabet() {
        for byte in [b'M', b'X', b'A', b'F'] {
            assert!(is_class(byte));
        }
        assert!(!is_class(b'G'));
        assert!(!is_class(b'0'));
    }
}
