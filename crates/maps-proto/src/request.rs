//! Request builders, one constructor per command.
//!
//! Every builder validates its typed inputs against the ranges in the
//! protocol manual and returns the byte-exact wire frame. Fields the
//! manual documents as self-correcting are clamped silently (baud rates
//! above 5 fall back to 1, most counters saturate at their printed width);
//! everything else out of range is an [`ProtocolError::InvalidArgument`].

use crate::{
    ascii,
    errors::{ProtocolError, Result},
    frame::{self, Direction, RawFrame},
    payloads::{
        adjust::{BarrierAdjust, RECV_GROUP3, RECV_GROUP8},
        heights::AxisFirstHeight,
        scanner::{self, ScannerSpecial},
        status::{self, BarrierStatus, WorkMode},
        vehicle::{self, AxisSpeed, EndVehicle, Failure},
    },
};

/// Build a request with no payload.
///
/// Covers every command whose request is the bare envelope: DE, EA, FA,
/// MV, PA, AC, RF, TT, CB, and the spontaneous FP, IP, IR and the short RE
/// form. Commands that require request data are rejected.
pub fn empty(num: u8, cmd: &str) -> Result<RawFrame> {
    frame::build(Direction::Request, num, cmd, &[])
}

/// BR: select the serial baud rate (CF-220, CF-24P).
///
/// Selectors 1..=5 map to 9600..=115200 bps; anything above 5 falls back
/// to selector 1.
pub fn baud_rate(num: u8, baud_rate: u8) -> Result<RawFrame> {
    let selector = if baud_rate > 5 { b'1' } else { b'0' + baud_rate };
    frame::build(Direction::Request, num, "BR", &[selector])
}

/// CA: set the disabled-sensor limits for the cleaning and degradation
/// alarms (CF-220).
pub fn anomaly_limits(num: u8, cleaning_sensors: u8, degraded_sensors: u8) -> Result<RawFrame> {
    if cleaning_sensors > 99 || degraded_sensors > 99 {
        return Err(ProtocolError::InvalidArgument {
            reason: "anomaly limits out of range 0..=99",
        });
    }
    let mut payload = [0u8; 4];
    payload[..2].copy_from_slice(&ascii::encode_two_digits(cleaning_sensors));
    payload[2..].copy_from_slice(&ascii::encode_two_digits(degraded_sensors));
    frame::build(Direction::Request, num, "CA", &payload)
}

/// ER: query one receiver's concealment state (CF-220, CF-24P).
pub fn receiver_status(num: u8, receiver: u8) -> Result<RawFrame> {
    if !(1..=24).contains(&receiver) {
        return Err(ProtocolError::InvalidArgument {
            reason: "receiver number out of range 1..=24",
        });
    }
    frame::build(Direction::Request, num, "ER", &ascii::encode_two_digits(receiver))
}

/// PR: delay between presence loss and the presence-relay drop, in
/// milliseconds (CF-220). Values above 99 clamp to 99.
pub fn presence_delay(num: u8, millis: u8) -> Result<RawFrame> {
    frame::build(Direction::Request, num, "PR", &ascii::encode_two_digits(millis.min(99)))
}

/// SC: select the scanner mode and transmission period (CF-220, CF-24P).
///
/// `send_time` is in milliseconds and clamps to 999; the barrier itself
/// floors it at 5 ms (115200 bps) or 30 ms (9600 bps).
pub fn scanner(num: u8, mode: u8, send_time: u16) -> Result<RawFrame> {
    if !scanner::is_mode(mode) {
        return Err(ProtocolError::InvalidArgument { reason: "scanner mode outside A-E, H, I" });
    }
    let send_time = send_time.min(999);
    let payload = [
        mode,
        b'0' + (send_time / 100) as u8,
        b'0' + (send_time / 10 % 10) as u8,
        b'0' + (send_time % 10) as u8,
    ];
    frame::build(Direction::Request, num, "SC", &payload)
}

/// SM: select the working mode.
///
/// `elements` picks how much of the record goes on the wire: 3 fields for
/// a CF-24P, 4 for a CF-150 (adds tow detection), 5 for a CF-220 (adds
/// the receiver direction).
pub fn work_mode(num: u8, elements: u8, data: &WorkMode) -> Result<RawFrame> {
    if !(3..=5).contains(&elements) {
        return Err(ProtocolError::InvalidArgument {
            reason: "working-mode element count out of range 3..=5",
        });
    }
    if data.work_mode > 3 {
        return Err(ProtocolError::InvalidArgument { reason: "work mode out of range 0..=3" });
    }
    if data.axis_ispeed > 15 {
        return Err(ProtocolError::InvalidArgument {
            reason: "axle/speed reporting level out of range 0..=15",
        });
    }
    if data.axis_height > 2 {
        return Err(ProtocolError::InvalidArgument {
            reason: "axle height mode out of range 0..=2",
        });
    }
    let tow = data.tow_byte();
    if !status::is_tow(tow) {
        return Err(ProtocolError::InvalidArgument {
            reason: "tow detection byte outside 0, R, M, N, E, T",
        });
    }
    if elements == 5 && data.rcvr_direction != b'P' && data.rcvr_direction != b'N' {
        return Err(ProtocolError::InvalidArgument {
            reason: "receiver direction outside P, N",
        });
    }
    let full = [
        b'0' + data.work_mode,
        ascii::hex_digit(data.axis_ispeed),
        b'0' + data.axis_height,
        tow,
        data.rcvr_direction,
    ];
    frame::build(Direction::Request, num, "SM", &full[..usize::from(elements)])
}

/// SR: number of sensors used to recognize a tow hitch (CF-220).
pub fn tow_sensors(num: u8, sensors: u8) -> Result<RawFrame> {
    if !(3..=10).contains(&sensors) {
        return Err(ProtocolError::InvalidArgument {
            reason: "tow-sensor count out of range 3..=10",
        });
    }
    frame::build(Direction::Request, num, "SR", &ascii::encode_two_digits(sensors))
}

/// RH: assign the contact-output receiver and mode (CF-24P).
pub fn height_relay(num: u8, mode: u8, receiver: u8) -> Result<RawFrame> {
    if mode > 1 {
        return Err(ProtocolError::InvalidArgument { reason: "contact mode out of range 0..=1" });
    }
    if !(1..=24).contains(&receiver) {
        return Err(ProtocolError::InvalidArgument {
            reason: "receiver number out of range 1..=24",
        });
    }
    let mut payload = [0u8; 3];
    payload[0] = b'0' + mode;
    payload[1..].copy_from_slice(&ascii::encode_two_digits(receiver));
    frame::build(Direction::Request, num, "RH", &payload)
}

fn adjust_payload(data: &BarrierAdjust) -> Result<[u8; RECV_GROUP8 + RECV_GROUP3]> {
    if !ascii::is_hex_map(&data.rcv_map8) || !ascii::is_hex_map(&data.rcv_map3) {
        return Err(ProtocolError::InvalidArgument {
            reason: "adjustment map is not ASCII hex",
        });
    }
    let mut payload = [0u8; RECV_GROUP8 + RECV_GROUP3];
    payload[..RECV_GROUP8].copy_from_slice(&data.rcv_map8);
    payload[RECV_GROUP8..].copy_from_slice(&data.rcv_map3);
    Ok(payload)
}

/// AJ: send the receiver adjustment maps inside a normal envelope.
pub fn barrier_adjust(num: u8, data: &BarrierAdjust) -> Result<RawFrame> {
    let payload = adjust_payload(data)?;
    frame::build(Direction::Request, num, "AJ", &payload)
}

/// PA-special: the same adjustment maps as a raw 88-byte frame with a
/// trailing CR and no envelope (parses back as the synthetic `PAS` tag).
pub fn barrier_adjust_special(data: &BarrierAdjust) -> Result<RawFrame> {
    let payload = adjust_payload(data)?;
    Ok(frame::build_raw(&payload, false))
}

/// SC-special: spontaneous scanner data.
///
/// The A/B/C sweep form travels inside a normal SC envelope (CF-24P); the
/// D/E/H/I reception form is a raw 12-byte map terminated by CR (D/E) or
/// CR+LF (H/I), where `num` never reaches the wire.
pub fn scanner_special(num: u8, data: &ScannerSpecial) -> Result<RawFrame> {
    match *data {
        ScannerSpecial::Sweep { mode, presence, sensors, sweeps_num } => {
            if !matches!(mode, b'A' | b'B' | b'C') {
                return Err(ProtocolError::InvalidArgument {
                    reason: "sweep form requires mode A, B or C",
                });
            }
            if !ascii::is_hex_map(&sensors) {
                return Err(ProtocolError::InvalidArgument {
                    reason: "sensor map is not ASCII hex",
                });
            }
            if sweeps_num > 9 {
                return Err(ProtocolError::InvalidArgument {
                    reason: "sweep count out of range 0..=9",
                });
            }
            let mut payload = [0u8; 8];
            payload[0] = if presence != 0 { b'1' } else { b'0' };
            payload[1..7].copy_from_slice(&sensors);
            payload[7] = b'0' + sweeps_num;
            frame::build(Direction::Request, num, "SC", &payload)
        },
        ScannerSpecial::Reception { mode, map } => {
            let with_lf = match mode {
                b'D' | b'E' => false,
                b'H' | b'I' => true,
                _ => {
                    return Err(ProtocolError::InvalidArgument {
                        reason: "reception form requires mode D, E, H or I",
                    });
                },
            };
            if !ascii::is_hex_map(&map) {
                return Err(ProtocolError::InvalidArgument {
                    reason: "reception map is not ASCII hex",
                });
            }
            Ok(frame::build_raw(&map, with_lf))
        },
    }
}

/// AP: height above the first positive axle.
///
/// Heights clamp to their printed widths: 15 decimetres for the per-axle
/// height, 99 for everything else.
pub fn axis_first_height(num: u8, data: &AxisFirstHeight) -> Result<RawFrame> {
    match *data {
        AxisFirstHeight::First { vheight } => frame::build(
            Direction::Request,
            num,
            "AP",
            &ascii::encode_two_digits(vheight.min(99)),
        ),
        AxisFirstHeight::PerAxle { vaxis, axis_height, vmax_height, hmin_height, lmax_height } => {
            if vaxis != 0 && vaxis != b'0' && vaxis != b'N' && vaxis != b'P' {
                return Err(ProtocolError::InvalidArgument {
                    reason: "axle direction outside 0, N, P",
                });
            }
            let mut payload = [0u8; 10];
            payload[0] = if vaxis == 0 { b'0' } else { vaxis };
            payload[1] = b'0';
            payload[2..4].copy_from_slice(&ascii::encode_two_digits(axis_height.min(15)));
            payload[4..6].copy_from_slice(&ascii::encode_two_digits(vmax_height.min(99)));
            payload[6..8].copy_from_slice(&ascii::encode_two_digits(hmin_height.min(99)));
            payload[8..].copy_from_slice(&ascii::encode_two_digits(lmax_height.min(99)));
            frame::build(Direction::Request, num, "AP", &payload)
        },
    }
}

/// EJ: axle count and instantaneous speed on axle detection (CF-220).
/// Values above 99 clamp to 99.
pub fn axis_speed(num: u8, data: &AxisSpeed) -> Result<RawFrame> {
    let mut payload = [0u8; 6];
    payload[..2].copy_from_slice(&ascii::encode_two_digits(data.paxes.min(99)));
    payload[2..4].copy_from_slice(&ascii::encode_two_digits(data.naxes.min(99)));
    payload[4..].copy_from_slice(&ascii::encode_two_digits(data.ispeed.min(99)));
    frame::build(Direction::Request, num, "EJ", &payload)
}

/// EM: spontaneous status-on-malfunction message.
///
/// A zero `rcvr_direction` selects the short CF-150/CF-24P form; `'P'` or
/// `'N'` selects the CF-220 form with the tow and direction bytes.
pub fn malfunction_status(num: u8, data: &BarrierStatus) -> Result<RawFrame> {
    data.validate()?;
    let firmware = ascii::encode_two_digits(data.firmware_ver);
    let mut payload = Vec::with_capacity(10);
    payload.push(b'0' + data.work_mode);
    payload.push(ascii::hex_digit(data.axis_ispeed));
    payload.push(b'0' + data.axis_height);
    if data.rcvr_direction == 0 {
        payload.push(b'0' + data.hw_failure);
        payload.push(b'0' + data.se_cleaning);
        payload.extend_from_slice(&firmware);
        payload.extend_from_slice(b"00");
    } else {
        payload.push(data.tow_byte());
        payload.push(b'0' + data.hw_failure);
        payload.push(b'0' + data.se_cleaning);
        payload.extend_from_slice(&firmware);
        payload.push(data.rcvr_direction);
        payload.push(b'0');
    }
    frame::build(Direction::Request, num, "EM", &payload)
}

fn end_vehicle(num: u8, cmd: &str, data: &EndVehicle) -> Result<RawFrame> {
    let mut payload = Vec::with_capacity(17);
    match *data {
        EndVehicle::AxesOnly { paxes, naxes } => {
            payload.extend_from_slice(&ascii::encode_two_digits(paxes.min(99)));
            payload.extend_from_slice(&ascii::encode_two_digits(naxes.min(99)));
        },
        EndVehicle::Classified { paxes, naxes, vclass } => {
            if !vehicle::is_class(vclass) {
                return Err(ProtocolError::InvalidArgument {
                    reason: "classification byte outside M, X, A-F",
                });
            }
            payload.extend_from_slice(&ascii::encode_two_digits(paxes.min(99)));
            payload.extend_from_slice(&ascii::encode_two_digits(naxes.min(99)));
            payload.push(vclass);
        },
        EndVehicle::Detailed {
            paxes,
            naxes,
            paxes10,
            naxes10,
            paxes16,
            naxes16,
            paxes22,
            naxes22,
            vclass,
        } => {
            if !vehicle::is_class(vclass) {
                return Err(ProtocolError::InvalidArgument {
                    reason: "classification byte outside M, X, A-F",
                });
            }
            for count in [paxes, naxes, paxes10, naxes10, paxes16, naxes16, paxes22, naxes22] {
                payload.extend_from_slice(&ascii::encode_two_digits(count.min(99)));
            }
            payload.push(vclass);
        },
    }
    frame::build(Direction::Request, num, cmd, &payload)
}

/// FA: spontaneous end-of-vehicle report, vehicle moving forward
/// (CF-220, CF-150). Parses back as the synthetic `FAS` tag.
pub fn vehicle_end(num: u8, data: &EndVehicle) -> Result<RawFrame> {
    end_vehicle(num, "FA", data)
}

/// FR: end-of-vehicle report for a vehicle backing out (CF-220, CF-150).
pub fn vehicle_end_reverse(num: u8, data: &EndVehicle) -> Result<RawFrame> {
    end_vehicle(num, "FR", data)
}

fn failure(num: u8, cmd: &str, data: &Failure) -> Result<RawFrame> {
    if data.kind != b'R' && data.kind != b'E' {
        return Err(ProtocolError::InvalidArgument {
            reason: "failed sensor kind outside R, E",
        });
    }
    if data.ngroup > 8 || data.nsensor > 8 {
        return Err(ProtocolError::InvalidArgument {
            reason: "failure group or sensor out of range 0..=8",
        });
    }
    let payload = [data.kind, b'0' + data.ngroup, b'0' + data.nsensor];
    frame::build(Direction::Request, num, cmd, &payload)
}

/// FX: spontaneous failure-start report.
pub fn failure_start(num: u8, data: &Failure) -> Result<RawFrame> {
    failure(num, "FX", data)
}

/// PX: failure-end report.
pub fn failure_end(num: u8, data: &Failure) -> Result<RawFrame> {
    failure(num, "PX", data)
}

/// IA: presence start, vehicle moving forward (CF-220, CF-150).
///
/// A zero speed sends the empty form (instantaneous speed disabled);
/// values above 99 clamp to 99.
pub fn presence_start(num: u8, ispeed: u8) -> Result<RawFrame> {
    let ispeed = ispeed.min(99);
    if ispeed == 0 {
        return empty(num, "IA");
    }
    frame::build(Direction::Request, num, "IA", &ascii::encode_two_digits(ispeed))
}

/// RM: tow detected, with the axle count seen up to the hitch (CF-220,
/// CF-150). Zero sends the empty form; values above 99 clamp to 99.
pub fn tow_axes(num: u8, naxes: u8) -> Result<RawFrame> {
    let naxes = naxes.min(99);
    if naxes == 0 {
        return empty(num, "RM");
    }
    frame::build(Direction::Request, num, "RM", &ascii::encode_two_digits(naxes))
}

/// RE: spontaneous reset identification.
///
/// Pass zero for any of the three values to get the empty CF-150/CF-24P
/// form. Otherwise the CF-220 identification block is emitted with
/// firmware and revision clamped to 99 and `date` validated as decimal
/// `ddmmaa`.
pub fn reset(num: u8, firmware: u8, revision: u8, date: u32) -> Result<RawFrame> {
    if firmware == 0 || revision == 0 || date == 0 {
        return empty(num, "RE");
    }
    const MONTH_DAYS: [u8; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let year = (date % 100) as u8;
    let month = (date / 100 % 100) as u8;
    let day = (date / 10_000 % 100) as u8;
    if month == 0 || month > 12 {
        return Err(ProtocolError::InvalidArgument { reason: "reset date month outside 1..=12" });
    }
    if day == 0 || day > MONTH_DAYS[usize::from(month) - 1] {
        return Err(ProtocolError::InvalidArgument {
            reason: "reset date day outside the month",
        });
    }
    let firmware = firmware.min(99);
    let revision = revision.min(99);
    let payload =
        format!("/32CF-220M/V-{firmware:02}/R-{revision:02}/D-{day:02}-{month:02}-{year:02}/");
    frame::build(Direction::Request, num, "RE", payload.as_bytes())
}
