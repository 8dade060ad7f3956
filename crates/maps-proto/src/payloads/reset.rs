//! Reset identification and anomaly-limit payloads (RE, CA).

use crate::{
    ascii,
    errors::Result,
    parse::ParsedFrame,
    payloads::{Payload, malformed},
};

/// Bytes in the barrier-model substring of a 39-byte RE frame.
pub const BMODEL_LEN: usize = 9;
/// Bytes in the firmware-version substring.
pub const FVERSION_LEN: usize = 4;
/// Bytes in the firmware-revision substring.
pub const FNUM_REV_LEN: usize = 4;
/// Bytes in the revision-date substring.
pub const VER_DATE_LEN: usize = 8;

/// Identification block in a CF-220 RE frame.
///
/// The four substrings are cut at fixed wire offsets for compatibility
/// with deployed firmware; against the stock CF-220 identification string
/// they read e.g. `32CF-220M`, `V-30`, `R-01`, `03-02-21`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetInfo {
    /// Barrier model substring, 9 bytes.
    pub bmodel: String,
    /// Firmware version substring, 4 bytes.
    pub fversion: String,
    /// Firmware revision substring, 4 bytes.
    pub fnum_rev: String,
    /// Revision date substring, 8 bytes.
    pub ver_date: String,
}

/// Disabled-sensor limits for the spontaneous anomaly alarms
/// (CA request, CF-220 only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnomalyLimits {
    /// Disabled sensors tolerated before the cleaning alarm, 0..=99
    /// (factory default 1).
    pub cleaning_sensors: u8,
    /// Disabled sensors tolerated before the degradation alarm, 0..=99
    /// (factory default 2).
    pub degraded_sensors: u8,
}

/// RE payload: the empty 7-byte CF-150/CF-24P form, or the 39-byte CF-220
/// identification block sliced at fixed offsets.
pub(crate) fn decode_reset(frame: &[u8], parsed: &mut ParsedFrame) -> Result<()> {
    match frame.len() {
        7 => Ok(()),
        39 => {
            let substring = |start: usize, len: usize| {
                std::str::from_utf8(&frame[start..start + len])
                    .map(str::to_owned)
                    .map_err(|_| malformed("identification block is not ASCII"))
            };
            parsed.payload = Some(Payload::Reset(ResetInfo {
                bmodel: substring(5, BMODEL_LEN)?,
                fversion: substring(15, FVERSION_LEN)?,
                fnum_rev: substring(20, FNUM_REV_LEN)?,
                ver_date: substring(27, VER_DATE_LEN)?,
            }));
            Ok(())
        },
        _ => Err(malformed("reset message must be 7 or 39 bytes")),
    }
}

/// CA request payload: 11-byte frame, two two-digit limits.
pub(crate) fn decode_anomaly_limits(frame: &[u8], parsed: &mut ParsedFrame) -> Result<()> {
    if frame.len() != 11 {
        return Err(malformed("anomaly-limit request must be 11 bytes"));
    }
    let cleaning_sensors = ascii::two_digits(frame[4], frame[5])
        .ok_or_else(|| malformed("cleaning limit is not two digits"))?;
    let degraded_sensors = ascii::two_digits(frame[6], frame[7])
        .ok_or_else(|| malformed("degradation limit is not two digits"))?;
    parsed.payload =
        Some(Payload::AnomalyLimits(AnomalyLimits { cleaning_sensors, degraded_sensors }));
    Ok(())
}
