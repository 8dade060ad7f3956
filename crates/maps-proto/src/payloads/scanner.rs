//! Scanner payloads (SC request, SC-special spontaneous data).
//!
//! The scanner has two personalities. Modes A/B/C exist only on the
//! CF-24P's 24 horizontal receivers and report sweeps inside a normal SC
//! envelope; modes D/E/H/I stream a raw 48-emitter reception map with no
//! envelope at all, terminated by CR (D/E) or CR+LF (H/I).

use crate::{
    ascii,
    command::Tag,
    errors::Result,
    parse::ParsedFrame,
    payloads::{Payload, malformed},
};

/// Number of hex bytes in the A/B/C sensor bitmap.
pub const SENSOR_MAP: usize = 6;
/// Number of hex bytes in the D/E/H/I reception map.
pub const RECEPTION_MAP: usize = 12;

/// Scanner-mode selection (SC request).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scanner {
    /// Mode letter: `'A'`..`'C'` (CF-24P only), `'D'`, `'E'`, `'H'`, `'I'`.
    pub mode: u8,
    /// Transmission period in milliseconds, 0..=999. The barrier floors
    /// this at 5 ms on 115200 bps links and 30 ms on 9600 bps links.
    pub send_time: u16,
}

/// Spontaneous scanner data (SC-special).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerSpecial {
    /// Modes A/B/C: sweep report inside a normal SC envelope (CF-24P).
    /// Decodes with the mode letter fixed to `'A'`; the wire form does not
    /// distinguish the three.
    Sweep {
        /// Mode letter `'A'`, `'B'` or `'C'`.
        mode: u8,
        /// 1 when a vehicle is present, 0 otherwise.
        presence: u8,
        /// Concealment bitmap for the 24 receivers, six uppercase hex
        /// bytes (`010000` hides receiver 1 from the bottom).
        sensors: [u8; SENSOR_MAP],
        /// Number of repeated sweeps, 0..=9.
        sweeps_num: u8,
    },
    /// Modes D/E/H/I: raw reception map for the 48 emitters, top sensors
    /// first. Decodes with the mode letter fixed to `'D'` (CR terminator)
    /// or `'H'` (CR+LF terminator).
    Reception {
        /// Mode letter `'D'`, `'E'`, `'H'` or `'I'`.
        mode: u8,
        /// Reception map, twelve uppercase hex bytes; `'F'` means four
        /// hidden emitters, `'0'` clean reception on all four.
        map: [u8; RECEPTION_MAP],
    },
}

/// True for the scanner mode alphabet.
pub(crate) fn is_mode(byte: u8) -> bool {
    matches!(byte, b'A'..=b'E' | b'H' | b'I')
}

/// SC request payload. 11 bytes is the ordinary mode/period request;
/// 15 bytes is the A/B/C sweep report, which retags the frame as `SCS`.
pub(crate) fn decode_scanner(frame: &[u8], parsed: &mut ParsedFrame) -> Result<()> {
    match frame.len() {
        11 => {
            if !is_mode(frame[4]) {
                return Err(malformed("scanner mode outside A-E, H, I"));
            }
            let hundreds = ascii::digit(frame[5]);
            let tens = ascii::digit(frame[6]);
            let units = ascii::digit(frame[7]);
            let (Some(hundreds), Some(tens), Some(units)) = (hundreds, tens, units) else {
                return Err(malformed("send time is not three digits"));
            };
            let send_time = u16::from(hundreds) * 100 + u16::from(tens) * 10 + u16::from(units);
            parsed.payload = Some(Payload::Scanner(Scanner { mode: frame[4], send_time }));
            Ok(())
        },
        15 => {
            if frame[4] != b'0' && frame[4] != b'1' {
                return Err(malformed("presence flag outside 0, 1"));
            }
            if !ascii::is_hex_map(&frame[5..11]) {
                return Err(malformed("sensor map is not ASCII hex"));
            }
            let sweeps_num =
                ascii::digit(frame[11]).ok_or_else(|| malformed("sweep count is not a digit"))?;
            let mut sensors = [0u8; SENSOR_MAP];
            sensors.copy_from_slice(&frame[5..11]);
            parsed.command = Tag::new("SCS");
            parsed.payload = Some(Payload::ScannerSpecial(ScannerSpecial::Sweep {
                mode: b'A',
                presence: frame[4] - b'0',
                sensors,
                sweeps_num,
            }));
            Ok(())
        },
        _ => Err(malformed("scanner request must be 11 or 15 bytes")),
    }
}

/// Raw SC-special reception map: 13 bytes for the CR-terminated D/E modes,
/// 14 for the CR+LF-terminated H/I modes. The parser has already matched
/// the terminator; the map bytes pass through as received.
pub(crate) fn decode_reception(frame: &[u8], parsed: &mut ParsedFrame) -> Result<()> {
    let mode = match frame.len() {
        13 => b'D',
        14 => b'H',
        _ => return Err(malformed("reception map must be 13 or 14 bytes")),
    };
    let mut map = [0u8; RECEPTION_MAP];
    map.copy_from_slice(&frame[..RECEPTION_MAP]);
    parsed.payload =
        Some(Payload::ScannerSpecial(ScannerSpecial::Reception { mode, map }));
    Ok(())
}
