//! Barrier status and working-mode payloads (DE, EM, SM).
//!
//! The same status record travels in two shapes: a DE response carries the
//! full block including the CF-220 direction and model bytes, while the
//! spontaneous EM (status on malfunction) message comes in a short
//! CF-150/CF-24P form and a longer CF-220 form told apart by wire length.

use crate::{
    ascii,
    errors::{ProtocolError, Result},
    parse::ParsedFrame,
    payloads::{Payload, malformed},
};

/// Barrier status block carried by DE responses and spontaneous EM frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarrierStatus {
    /// Working mode: 0 cleaning, 1 inactive, 2 active, 3 active with
    /// classification messages (CF-220 only).
    pub work_mode: u8,
    /// Axle/instant-speed reporting level, 0..=15. On CF-220 the value is
    /// a bit sum (1 axles, 2 low-sensor transitions, 4 speed, 8 EJ
    /// messages); on CF-150 it is the axle counter on/off switch.
    pub axis_ispeed: u8,
    /// First-axle height reporting mode, 0..=2.
    pub axis_height: u8,
    /// Tow/motorcycle detection byte: `'0'`, `'R'`, `'M'`, `'N'`, `'E'` or
    /// `'T'`. Zero is accepted on input and normalized to `'0'`.
    pub tow_detection: u8,
    /// Hardware state: 1 sensors ok, 2 degraded but operational,
    /// 3 out of service.
    pub hw_failure: u8,
    /// Sensor contamination: 1 clean, 2 cleaning required.
    pub se_cleaning: u8,
    /// Firmware version as two digits; `11` reads as v1.1.
    pub firmware_ver: u8,
    /// Receiver column side, CF-220 only: `'P'` left, `'N'` right, 0 when
    /// absent. Carried through the DE decoder unvalidated; callers that
    /// care must check the byte themselves.
    pub rcvr_direction: u8,
    /// Barrier model byte, CF-220 only (`'4'` is a CF-220/CF-220M).
    /// Carried through unvalidated, zero when absent.
    pub barrier_model: u8,
}

impl BarrierStatus {
    /// Tow byte with the zero default normalized to ASCII `'0'`.
    pub(crate) fn tow_byte(&self) -> u8 {
        if self.tow_detection == 0 { b'0' } else { self.tow_detection }
    }

    /// Range checks shared by the DE response and EM request builders.
    pub(crate) fn validate(&self) -> Result<()> {
        let reason = if self.work_mode > 3 {
            "work mode out of range 0..=3"
        } else if self.axis_ispeed > 15 {
            "axle/speed reporting level out of range 0..=15"
        } else if self.axis_height > 2 {
            "axle height mode out of range 0..=2"
        } else if !is_tow(self.tow_byte()) {
            "tow detection byte outside 0, R, M, N, E, T"
        } else if self.hw_failure == 0 || self.hw_failure > 3 {
            "hardware state out of range 1..=3"
        } else if self.se_cleaning == 0 || self.se_cleaning > 2 {
            "cleaning state out of range 1..=2"
        } else if self.firmware_ver > 99 {
            "firmware version out of range 0..=99"
        } else if self.rcvr_direction != 0 && self.rcvr_direction != b'P' && self.rcvr_direction != b'N'
        {
            "receiver direction outside 0, P, N"
        } else {
            return Ok(());
        };
        Err(ProtocolError::InvalidArgument { reason })
    }
}

/// Working-mode selection sent in SM requests. A subset of
/// [`BarrierStatus`]: how much of it goes on the wire depends on the
/// barrier family (3 fields for CF-24P, 4 for CF-150, 5 for CF-220).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkMode {
    /// Working mode: 0 cleaning, 1 inactive, 2 active, 3 active with
    /// classification messages (CF-220 only).
    pub work_mode: u8,
    /// Axle/instant-speed reporting level, 0..=15.
    pub axis_ispeed: u8,
    /// First-axle height reporting mode, 0..=2.
    pub axis_height: u8,
    /// Tow/motorcycle byte: `'0'`, `'R'`, `'M'`, `'N'`, `'E'` or `'T'`.
    /// Zero normalizes to `'0'`; decodes as `'0'` when not on the wire.
    pub tow_detection: u8,
    /// Receiver column side `'P'`/`'N'`, used only when all five fields are
    /// sent (CF-220); decodes as `'0'` when not on the wire.
    pub rcvr_direction: u8,
}

impl WorkMode {
    /// Tow byte with the zero default normalized to ASCII `'0'`.
    pub(crate) fn tow_byte(&self) -> u8 {
        if self.tow_detection == 0 { b'0' } else { self.tow_detection }
    }
}

/// True for the tow-detection alphabet `'0'`, `'R'`, `'M'`, `'N'`, `'E'`,
/// `'T'`.
pub(crate) fn is_tow(byte: u8) -> bool {
    matches!(byte, b'0' | b'R' | b'M' | b'N' | b'E' | b'T')
}

/// DE response payload: 19-byte frame, fields at bytes 6..=15.
pub(crate) fn decode_status(frame: &[u8], parsed: &mut ParsedFrame) -> Result<()> {
    if frame.len() != 19 {
        return Err(malformed("barrier status response must be 19 bytes"));
    }
    let work_mode = ascii::digit(frame[6])
        .filter(|mode| *mode <= 3)
        .ok_or_else(|| malformed("work mode outside 0..=3"))?;
    let axis_ispeed =
        ascii::hex_value(frame[7]).ok_or_else(|| malformed("axle/speed level is not hex"))?;
    let axis_height = ascii::digit(frame[8])
        .filter(|height| *height <= 2)
        .ok_or_else(|| malformed("axle height mode outside 0..=2"))?;
    if !is_tow(frame[9]) {
        return Err(malformed("tow detection byte outside 0, R, M, N, E, T"));
    }
    let hw_failure = ascii::digit(frame[10])
        .filter(|state| (1..=3).contains(state))
        .ok_or_else(|| malformed("hardware state outside 1..=3"))?;
    let se_cleaning = ascii::digit(frame[11])
        .filter(|state| (1..=2).contains(state))
        .ok_or_else(|| malformed("cleaning state outside 1..=2"))?;
    let firmware_ver = ascii::two_digits(frame[12], frame[13])
        .ok_or_else(|| malformed("firmware version is not two digits"))?;

    parsed.payload = Some(Payload::BarrierStatus(BarrierStatus {
        work_mode,
        axis_ispeed,
        axis_height,
        tow_detection: frame[9],
        hw_failure,
        se_cleaning,
        firmware_ver,
        // Bytes 14 and 15 pass through as observed on real hardware.
        rcvr_direction: frame[14],
        barrier_model: frame[15],
    }));
    Ok(())
}

/// Spontaneous EM payload. 16 bytes on CF-150/CF-24P (no tow or direction
/// fields), 17 bytes on CF-220.
pub(crate) fn decode_malfunction(frame: &[u8], parsed: &mut ParsedFrame) -> Result<()> {
    if frame.len() != 16 && frame.len() != 17 {
        return Err(malformed("malfunction status must be 16 or 17 bytes"));
    }
    let work_mode = ascii::digit(frame[4])
        .filter(|mode| *mode <= 3)
        .ok_or_else(|| malformed("work mode outside 0..=3"))?;
    let axis_ispeed =
        ascii::hex_value(frame[5]).ok_or_else(|| malformed("axle/speed level is not hex"))?;
    let axis_height = ascii::digit(frame[6])
        .filter(|height| *height <= 2)
        .ok_or_else(|| malformed("axle height mode outside 0..=2"))?;

    let mut data = BarrierStatus {
        work_mode,
        axis_ispeed,
        axis_height,
        tow_detection: 0,
        hw_failure: 0,
        se_cleaning: 0,
        firmware_ver: 0,
        rcvr_direction: 0,
        barrier_model: 0,
    };

    if frame.len() == 16 {
        // CF-150 and CF-24P
        data.hw_failure = ascii::digit(frame[7])
            .filter(|state| (1..=3).contains(state))
            .ok_or_else(|| malformed("hardware state outside 1..=3"))?;
        data.se_cleaning = ascii::digit(frame[8])
            .filter(|state| (1..=2).contains(state))
            .ok_or_else(|| malformed("cleaning state outside 1..=2"))?;
        data.firmware_ver = ascii::two_digits(frame[9], frame[10])
            .ok_or_else(|| malformed("firmware version is not two digits"))?;
    } else {
        // CF-220
        if !is_tow(frame[7]) {
            return Err(malformed("tow detection byte outside 0, R, M, N, E, T"));
        }
        data.tow_detection = frame[7];
        data.hw_failure = ascii::digit(frame[8])
            .filter(|state| (1..=3).contains(state))
            .ok_or_else(|| malformed("hardware state outside 1..=3"))?;
        data.se_cleaning = ascii::digit(frame[9])
            .filter(|state| (1..=2).contains(state))
            .ok_or_else(|| malformed("cleaning state outside 1..=2"))?;
        data.firmware_ver = ascii::two_digits(frame[10], frame[11])
            .ok_or_else(|| malformed("firmware version is not two digits"))?;
        if frame[12] != b'P' && frame[12] != b'N' {
            return Err(malformed("receiver direction outside P, N"));
        }
        data.rcvr_direction = frame[12];
    }

    parsed.payload = Some(Payload::BarrierStatus(data));
    Ok(())
}

/// SM request payload, 10..=12 bytes depending on how many fields the
/// controller sent. Fields not on the wire decode as `'0'`.
pub(crate) fn decode_work_mode(frame: &[u8], parsed: &mut ParsedFrame) -> Result<()> {
    if !(10..=12).contains(&frame.len()) {
        return Err(malformed("working-mode request must be 10 to 12 bytes"));
    }
    let work_mode = ascii::digit(frame[4])
        .filter(|mode| *mode <= 3)
        .ok_or_else(|| malformed("work mode outside 0..=3"))?;
    let axis_ispeed =
        ascii::hex_value(frame[5]).ok_or_else(|| malformed("axle/speed level is not hex"))?;
    let axis_height = ascii::digit(frame[6])
        .filter(|height| *height <= 2)
        .ok_or_else(|| malformed("axle height mode outside 0..=2"))?;
    if frame.len() >= 11 && !is_tow(frame[7]) {
        return Err(malformed("tow detection byte outside 0, R, M, N, E, T"));
    }
    if frame.len() == 12 && frame[8] != b'P' && frame[8] != b'N' {
        return Err(malformed("receiver direction outside P, N"));
    }

    parsed.payload = Some(Payload::WorkMode(WorkMode {
        work_mode,
        axis_ispeed,
        axis_height,
        tow_detection: if frame.len() >= 11 { frame[7] } else { b'0' },
        rcvr_direction: if frame.len() == 12 { frame[8] } else { b'0' },
    }));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tow_alphabet() {
        for byte in [b'0', b'R', b'M', b'N', b'E', b'T'] {
            assert!(is_tow(byte));
        }
        assert!(!is_tow(b'A'));
        assert!(!is_tow(0));
    }

    #[test]
    fn validate_rejects_each_field() {
        let good = BarrierStatus {
            work_mode: 2,
            axis_ispeed: 5,
            axis_height: 1,
            tow_detection: b'R',
            hw_failure: 1,
            se_cleaning: 1,
            firmware_ver: 30,
            rcvr_direction: b'P',
            barrier_model: b'4',
        };
        assert!(good.validate().is_ok());

        for bad in [
            BarrierStatus { work_mode: 4, ..good },
            BarrierStatus { axis_ispeed: 16, ..good },
            BarrierStatus { axis_height: 3, ..good },
            BarrierStatus { tow_detection: b'Z', ..good },
            BarrierStatus { hw_failure: 0, ..good },
            BarrierStatus { hw_failure: 4, ..good },
            BarrierStatus { se_cleaning: 3, ..good },
            BarrierStatus { firmware_ver: 100, ..good },
            BarrierStatus { rcvr_direction: b'X', ..good },
        ] {
            assert!(bad.validate().is_err());
        }
    }
}
