//! Byte-exact wire fixtures and catalog behavior.
//!
//! These tests pin the codec to frames captured from the protocol manual:
//! exact checksum bytes, the fixed RE identification offsets, the special
//! envelope-less forms, and the per-command length dispatch.

use maps_proto::payloads::scanner::ScannerSpecial;
use maps_proto::payloads::vehicle::EndVehicle;
use maps_proto::{Direction, ParsedFrame, Payload, ProtocolError, request, response};

const SOH: u8 = 0x01;
const CR: u8 = 0x0D;

/// Assemble an envelope by hand, checksum included, for frames no builder
/// produces (barrier-side payloads, deliberately wrong lengths).
fn envelope(num: u8, middle: &[u8]) -> Vec<u8> {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut wire = vec![SOH, b'0' + num];
    wire.extend_from_slice(middle);
    let xor = wire[1..].iter().fold(0u8, |acc, byte| acc ^ byte);
    wire.extend_from_slice(&[HEX[usize::from(xor >> 4)], HEX[usize::from(xor & 0x0F)]]);
    wire.push(CR);
    wire
}

#[test]
fn baud_rate_request_exact_bytes() {
    // SOH '0' 'B' 'R' '3', LRC("0BR3") = 0x13 as ASCII "13", CR.
    let raw = request::baud_rate(0, 3).expect("should build");
    assert_eq!(raw.as_bytes(), hex::decode("013042523331330d").expect("valid hex"));
}

#[test]
fn sr_response_fixture_parses() {
    let wire = hex::decode("013652535352303433320d").expect("valid hex");
    let parsed = ParsedFrame::parse(&wire).expect("should parse");
    assert_eq!(parsed.num, 6);
    assert_eq!(parsed.direction, Direction::Response);
    assert_eq!(parsed.command, "SR");
    assert_eq!(parsed.payload, Some(Payload::Single(4)));
}

#[test]
fn reset_identification_fixture() {
    // The CF-220 identification block for firmware 30, revision 1,
    // date 03-02-21. The substring offsets are fixed on the wire.
    let wire =
        hex::decode("013052452f333243462d3232304d2f562d33302f522d30312f442d30332d30322d32312f33310d")
            .expect("valid hex");
    assert_eq!(wire.len(), 39);

    let raw = request::reset(0, 30, 1, 30221).expect("should build");
    assert_eq!(raw.as_bytes(), wire, "builder must reproduce the captured frame");

    let parsed = ParsedFrame::parse(&wire).expect("should parse");
    assert_eq!(parsed.num, 0);
    assert_eq!(parsed.command, "RE");
    match parsed.payload {
        Some(Payload::Reset(info)) => {
            assert_eq!(info.bmodel, "32CF-220M");
            assert_eq!(info.fversion, "V-30");
            assert_eq!(info.fnum_rev, "R-01");
            assert_eq!(info.ver_date, "03-02-21");
        },
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn reset_rejects_impossible_dates() {
    assert!(request::reset(0, 30, 1, 11_321).is_err(), "month 13");
    assert!(request::reset(0, 30, 1, 320_221).is_err(), "February 32nd");
    assert!(request::reset(0, 30, 1, 310_421).is_err(), "April 31st");
    assert!(request::reset(0, 30, 1, 300_421).is_ok(), "April 30th is valid");
    assert!(request::reset(0, 30, 1, 290_221).is_ok(), "February 29th is allowed");
}

#[test]
fn scanner_special_d_mode_round_trip() {
    let map = *b"0123456789AB";
    let raw = request::scanner_special(0, &ScannerSpecial::Reception { mode: b'D', map })
        .expect("should build");
    assert_eq!(raw.len(), 13);
    assert_eq!(raw.as_bytes()[12], CR);

    let parsed = ParsedFrame::parse(raw.as_bytes()).expect("should parse");
    assert_eq!(parsed.command, "SCS");
    assert_eq!(
        parsed.payload,
        Some(Payload::ScannerSpecial(ScannerSpecial::Reception { mode: b'D', map }))
    );
}

#[test]
fn end_vehicle_detailed_form_at_the_limits() {
    let data = EndVehicle::Detailed {
        paxes: 99,
        naxes: 99,
        paxes10: 99,
        naxes10: 99,
        paxes16: 99,
        naxes16: 99,
        paxes22: 99,
        naxes22: 99,
        vclass: b'F',
    };
    let raw = request::vehicle_end(5, &data).expect("should build");
    // 17 payload bytes inside the 7-byte request envelope.
    assert_eq!(raw.len(), 24);

    let parsed = ParsedFrame::parse(raw.as_bytes()).expect("should parse");
    assert_eq!(parsed.command, "FAS");
    assert_eq!(parsed.payload, Some(Payload::EndVehicle(data)));
}

#[test]
fn unknown_reply_round_trip_and_checksum_error() {
    let raw = response::unknown(8, "XX").expect("should build");
    assert_eq!(raw.as_bytes(), hex::decode("01384e45585833330d").expect("valid hex"));
    let parsed = ParsedFrame::parse(raw.as_bytes()).expect("should parse");
    assert_eq!(parsed.direction, Direction::Unknown);
    assert_eq!(parsed.command, "XX");
    assert_eq!(parsed.payload, None);

    // Same reply with a corrupted checksum byte.
    let mut wire = raw.as_bytes().to_vec();
    wire[7] = b'4';
    assert!(matches!(ParsedFrame::parse(&wire), Err(ProtocolError::ChecksumMismatch { .. })));
}

#[test]
fn pa_special_is_recognized_by_length_and_terminator() {
    let mut wire = vec![b'A'; 88];
    wire.push(CR);
    let parsed = ParsedFrame::parse(&wire).expect("should parse");
    assert_eq!(parsed.num, 0);
    assert_eq!(parsed.command, "PAS");
    match parsed.payload {
        Some(Payload::BarrierAdjust(maps)) => {
            assert_eq!(maps.rcv_map8, [b'A'; 64]);
            assert_eq!(maps.rcv_map3, [b'A'; 24]);
        },
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn sc_special_terminator_selects_the_mode() {
    let mut wire = vec![b'F'; 12];
    wire.push(CR);
    let parsed = ParsedFrame::parse(&wire).expect("should parse");
    assert_eq!(parsed.command, "SCS");
    assert!(matches!(
        parsed.payload,
        Some(Payload::ScannerSpecial(ScannerSpecial::Reception { mode: b'D', .. }))
    ));

    wire.push(0x0A);
    let parsed = ParsedFrame::parse(&wire).expect("should parse");
    assert!(matches!(
        parsed.payload,
        Some(Payload::ScannerSpecial(ScannerSpecial::Reception { mode: b'H', .. }))
    ));
}

#[test]
fn special_builder_rejects_non_hex_maps() {
    let mut maps = maps_proto::payloads::adjust::BarrierAdjust {
        rcv_map8: [b'0'; 64],
        rcv_map3: [b'0'; 24],
    };
    maps.rcv_map8[0] = b'G';
    assert!(matches!(
        request::barrier_adjust_special(&maps),
        Err(ProtocolError::InvalidArgument { .. })
    ));
}

#[test]
fn length_dispatch_accepts_each_declared_variant() {
    // (middle bytes after the sequence byte, expected command tag)
    let accepted: &[(&[u8], &str)] = &[
        (b"SM050", "SM"),
        (b"SM050R", "SM"),
        (b"SM050RP", "SM"),
        (b"EM050113000", "EM"),
        (b"EM05001130P0", "EM"),
        (b"AP12", "AP"),
        (b"APP005100820", "AP"),
        (b"RH005", "RH"),
        (b"RSRH005", "RH"),
        (b"FA0102", "FAS"),
        (b"FA0102A", "FAS"),
        // "FA", eight two-digit counts, class byte: the 24-byte form.
        (b"FA0102999999999999M", "FAS"),
        (b"SCA005", "SC"),
        (b"SC10A0B0C5", "SCS"),
        (b"IA", "IA"),
        (b"IA05", "IA"),
        (b"RE", "RE"),
        (b"EJ010203", "EJ"),
        (b"RSDE05001130P4", "DE"),
        (b"RSEA01020304", "EA"),
        (b"RSSR04", "SR"),
        (b"CA0102", "CA"),
        (b"FXR12", "FX"),
    ];
    for (middle, tag) in accepted {
        let wire = envelope(0, middle);
        let parsed = ParsedFrame::parse(&wire)
            .unwrap_or_else(|err| panic!("{} should decode: {err}", String::from_utf8_lossy(middle)));
        assert_eq!(parsed.command, *tag);
    }
}

#[test]
fn length_dispatch_rejects_off_by_one_frames() {
    let rejected: &[&[u8]] = &[
        b"SM05",
        b"SM050RP0",
        b"EM05011300",
        b"EM05001130P00",
        b"AP1",
        b"AP123",
        b"APP00510082",
        b"APP0051008201",
        b"RH00",
        b"RH0051",
        b"RSRH05",
        b"RSRH0051",
        b"FA010",
        b"FA0102AB",
        b"FA0102999999999999",
        b"FA0102999999999999XM",
        b"SCA05",
        b"SCA0055",
        b"IA0",
        b"IA050",
        b"RE0",
        b"EJ01020",
        b"EJ0102034",
        b"RSDE0500113P4",
        b"RSDE05001130P44",
        b"RSEA0102030",
        b"RSEA010203044",
        b"RSSR0",
        b"RSSR044",
        b"CA010",
        b"CA01022",
        b"FXR1",
        b"FXR123",
    ];
    for middle in rejected {
        let wire = envelope(0, middle);
        assert!(
            matches!(ParsedFrame::parse(&wire), Err(ProtocolError::MalformedPayload { .. })),
            "{} should be rejected",
            String::from_utf8_lossy(middle)
        );
    }
}

#[test]
fn barrier_test_length_dispatch() {
    let mut middle = Vec::from(&b"RSTT"[..]);
    middle.push(b'M');
    middle.extend_from_slice(&[b'F'; 16]);
    middle.push(b'R');
    middle.extend_from_slice(&[b'F'; 8]);
    let parsed = ParsedFrame::parse(&envelope(2, &middle)).expect("should parse");
    assert_eq!(parsed.command, "TT");

    middle.pop();
    assert!(matches!(
        ParsedFrame::parse(&envelope(2, &middle)),
        Err(ProtocolError::MalformedPayload { .. })
    ));
}

#[test]
fn adjustment_length_dispatch() {
    let mut middle = Vec::from(&b"AJ"[..]);
    middle.extend_from_slice(&[b'7'; 88]);
    let parsed = ParsedFrame::parse(&envelope(9, &middle)).expect("should parse");
    assert_eq!(parsed.command, "AJ");

    middle.push(b'7');
    assert!(matches!(
        ParsedFrame::parse(&envelope(9, &middle)),
        Err(ProtocolError::MalformedPayload { .. })
    ));
}

#[test]
fn empty_forms_follow_the_support_mask() {
    for cmd in ["DE", "EA", "FA", "MV", "PA", "AC", "RF", "TT", "CB", "FP", "IP", "IR"] {
        let raw = request::empty(0, cmd).expect("empty request should build");
        let parsed = ParsedFrame::parse(raw.as_bytes()).expect("should parse");
        assert_eq!(parsed.command, cmd);
        assert_eq!(parsed.direction, Direction::Request);
        assert_eq!(parsed.payload, None);
    }
    for cmd in ["BR", "CA", "ER", "PR", "SC", "SM", "SR", "RH", "AJ", "EM", "FX"] {
        assert!(
            matches!(request::empty(0, cmd), Err(ProtocolError::InvalidArgument { .. })),
            "{cmd} must not build an empty request"
        );
    }

    for cmd in ["BR", "CA", "FA", "MV", "PA", "AC", "PR", "RF", "SC", "SM", "SR", "AJ", "EM", "RE"]
    {
        let raw = response::empty(0, cmd).expect("empty response should build");
        let parsed = ParsedFrame::parse(raw.as_bytes()).expect("should parse");
        assert_eq!(parsed.command, cmd);
        assert_eq!(parsed.direction, Direction::Response);
        assert_eq!(parsed.payload, None);
    }
    for cmd in ["DE", "EA", "ER", "TT", "RH", "CB"] {
        assert!(
            matches!(response::empty(0, cmd), Err(ProtocolError::InvalidArgument { .. })),
            "{cmd} must not build an empty response"
        );
    }
}

#[test]
fn builders_reject_out_of_range_inputs() {
    assert!(request::receiver_status(0, 0).is_err());
    assert!(request::receiver_status(0, 25).is_err());
    assert!(request::tow_sensors(0, 2).is_err());
    assert!(request::tow_sensors(0, 11).is_err());
    assert!(request::height_relay(0, 2, 1).is_err());
    assert!(request::height_relay(0, 0, 0).is_err());
    assert!(request::anomaly_limits(0, 100, 1).is_err());
    assert!(request::scanner(0, b'G', 100).is_err());
    assert!(request::empty(10, "MV").is_err(), "sequence number above 9");
}
