//! Height-related payloads (EA, AP, RH).

use crate::{
    ascii,
    errors::Result,
    frame::Direction,
    parse::ParsedFrame,
    payloads::{Payload, malformed},
};

/// Vehicle height summary in an EA response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heights {
    /// Instantaneous maximum height, decimetres, 0..=99.
    pub imax_height: u8,
    /// Maximum upper height since the previous AP or EA report,
    /// decimetres, 0..=99.
    pub umax_height: u8,
    /// Minimum upper height since the previous AP or EA report,
    /// decimetres, 0..=99.
    pub umin_height: u8,
    /// Maximum underbody height since the previous AP or EA report,
    /// centimetres, 0..=99.
    pub lmax_height: u8,
}

/// Height report above the first positive axle (spontaneous AP).
///
/// CF-150 barriers (and CF-24P/CF-220 with the plain height setting) send
/// only the vehicle height; the per-axle form appears when the third SM
/// byte selects detailed reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisFirstHeight {
    /// Height on the first axle only.
    First {
        /// Vehicle height, decimetres, 0..=99 (`14` reads as 1.4 m).
        vheight: u8,
    },
    /// Detailed per-axle report (CF-220 and CF-24P).
    PerAxle {
        /// Axle direction: `'P'` positive, `'N'` negative; always `'0'`
        /// on CF-24P.
        vaxis: u8,
        /// Height on this axle, decimetres, 0..=15.
        axis_height: u8,
        /// Maximum vehicle height from the start or the previous axle,
        /// decimetres, 0..=99.
        vmax_height: u8,
        /// Minimum upper height from the start or the previous axle,
        /// decimetres, 0..=99.
        hmin_height: u8,
        /// Maximum underbody height from the start or the previous axle,
        /// centimetres, 0..=99.
        lmax_height: u8,
    },
}

/// Contact-output configuration (RH, CF-24P only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightRelay {
    /// 0: the contact signals height on the first axle; 1: the chosen
    /// receiver acts as a photocell.
    pub wmode: u8,
    /// Receiver number driving the contact, 1..=24 counted from the
    /// bottom.
    pub recvn: u8,
}

/// EA response payload: 17-byte frame, four two-digit heights.
pub(crate) fn decode_heights(frame: &[u8], parsed: &mut ParsedFrame) -> Result<()> {
    if frame.len() != 17 {
        return Err(malformed("heights response must be 17 bytes"));
    }
    let value = |pos: usize| {
        ascii::two_digits(frame[pos], frame[pos + 1])
            .ok_or_else(|| malformed("height field is not two digits"))
    };
    parsed.payload = Some(Payload::Heights(Heights {
        imax_height: value(6)?,
        umax_height: value(8)?,
        umin_height: value(10)?,
        lmax_height: value(12)?,
    }));
    Ok(())
}

/// AP request payload: 9 bytes for the plain height form, 17 for the
/// per-axle form. The per-axle height is range-checked after parsing.
pub(crate) fn decode_axis_first_height(frame: &[u8], parsed: &mut ParsedFrame) -> Result<()> {
    match frame.len() {
        9 => {
            let vheight = ascii::two_digits(frame[4], frame[5])
                .ok_or_else(|| malformed("vehicle height is not two digits"))?;
            parsed.payload = Some(Payload::AxisFirstHeight(AxisFirstHeight::First { vheight }));
            Ok(())
        },
        17 => {
            if frame[4] != b'0' && frame[4] != b'N' && frame[4] != b'P' {
                return Err(malformed("axle direction outside 0, N, P"));
            }
            let value = |pos: usize| {
                ascii::two_digits(frame[pos], frame[pos + 1])
                    .ok_or_else(|| malformed("height field is not two digits"))
            };
            let axis_height = value(6)?;
            if axis_height > 15 {
                return Err(malformed("axle height above 15 decimetres"));
            }
            parsed.payload = Some(Payload::AxisFirstHeight(AxisFirstHeight::PerAxle {
                vaxis: frame[4],
                axis_height,
                vmax_height: value(8)?,
                hmin_height: value(10)?,
                lmax_height: value(12)?,
            }));
            Ok(())
        },
        _ => Err(malformed("axle-height report must be 9 or 17 bytes")),
    }
}

/// RH payload: 10-byte request or 12-byte response, mode byte plus a
/// two-digit receiver number.
pub(crate) fn decode_height_relay(frame: &[u8], parsed: &mut ParsedFrame) -> Result<()> {
    let (pos, want) = match parsed.direction {
        Direction::Request => (4, 10),
        Direction::Response | Direction::Unknown => (6, 12),
    };
    if frame.len() != want {
        return Err(malformed("contact-output frame has the wrong length"));
    }
    if frame[pos] != b'0' && frame[pos] != b'1' {
        return Err(malformed("contact mode outside 0, 1"));
    }
    let recvn = ascii::two_digits(frame[pos + 1], frame[pos + 2])
        .filter(|recvn| (1..=24).contains(recvn))
        .ok_or_else(|| malformed("receiver number outside 1..=24"))?;
    parsed.payload =
        Some(Payload::HeightRelay(HeightRelay { wmode: frame[pos] - b'0', recvn }));
    Ok(())
}
