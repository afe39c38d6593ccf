//! Message catalogue: header/template consistency and builder offsets.
use super::inbound::{heartbeat_serial, limit_value};
use super::outbound::{LimitTracker, Outbound, VoltageTarget};
use super::records::*;
use super::templates::*;
use super::*;
use crate::core::{IDX_LEN_HI, IDX_LEN_LO, IDX_TRACKER_HI, IDX_TRACKER_LO, IDX_TYPE};
use crate::infra::codec::traits::PayloadData;
use crate::protocol::session::state::BridgeState;

const ALL_OUTBOUND: [Outbound; 18] = [
    Outbound::SerialAnnounce,
    Outbound::VoltageReport(VoltageTarget::T02),
    Outbound::VoltageReport(VoltageTarget::T04),
    Outbound::VoltageReport(VoltageTarget::T05),
    Outbound::VoltageReport(VoltageTarget::T08),
    Outbound::VoltageReport(VoltageTarget::T50),
    Outbound::PowerFlow,
    Outbound::PackSummary,
    Outbound::BatteryStatus,
    Outbound::Limit(LimitTracker::T0321),
    Outbound::Limit(LimitTracker::T0141),
    Outbound::Limit(LimitTracker::T0150),
    Outbound::Limit(LimitTracker::UpperAck),
    Outbound::Limit(LimitTracker::LowerAck),
    Outbound::PackVoltage,
    Outbound::HeartbeatReply,
    Outbound::VersionInfo,
    Outbound::VersionDate,
];

fn build(msg: Outbound, state: &BridgeState) -> Vec<u8> {
    let mut buffer = [0u8; 256];
    let len = msg.build_payload(state, &mut buffer).unwrap();
    buffer[..len].to_vec()
}

fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

#[test]
/// Every built payload is exactly as long as its header declares.
fn test_payload_length_matches_header() {
    let state = BridgeState::default();
    for msg in ALL_OUTBOUND {
        let header = msg.header();
        let declared = u16::from_le_bytes([header[IDX_LEN_LO], header[IDX_LEN_HI]]) as usize;
        assert_eq!(build(msg, &state).len(), declared, "{:?}", msg);
    }
}

#[test]
/// Header type byte matches the message class.
fn test_header_type_matches_class() {
    for msg in ALL_OUTBOUND {
        assert_eq!(msg.header()[IDX_TYPE], msg.class().msg_type(), "{:?}", msg);
    }
}

#[test]
/// Limit acknowledgements carry the tracker they acknowledge.
fn test_limit_ack_trackers() {
    let tracker = |h: &[u8; 18]| u16::from_be_bytes([h[IDX_TRACKER_HI], h[IDX_TRACKER_LO]]);
    assert_eq!(tracker(Outbound::Limit(LimitTracker::UpperAck).header()), TRACKER_UPPER_LIMIT);
    assert_eq!(tracker(Outbound::Limit(LimitTracker::LowerAck).header()), TRACKER_LOWER_LIMIT);
    assert_eq!(tracker(Outbound::VersionInfo.header()), TRACKER_VERSION_INFO);
    assert_eq!(tracker(Outbound::VersionDate.header()), TRACKER_VERSION_DATE);
}

#[test]
/// Battery status: cells, extremes, power and serial land at their offsets.
fn test_battery_status_offsets() {
    let mut state = BridgeState::default();
    state.telemetry.cell_voltages = [3.25; 16];
    state.telemetry.cell_voltages[5] = 3.0;
    state.telemetry.cell_voltages[9] = 3.5;
    state.telemetry.pack_voltage_mv = 53_120;
    state.telemetry.temperature = 23;
    state.telemetry.input_watts = 0.0;
    state.telemetry.output_watts = -150.7;
    state.telemetry.full_charge_voltage_mv = 55_200;
    state.telemetry.set_serial("HW51ZEH4SF123456");

    let p = build(Outbound::BatteryStatus, &state);
    assert_eq!(p[7], 23);
    assert_eq!(p[20], 23);
    assert_eq!(&p[43..47], &[23; 4]);
    assert_eq!(u16_at(&p, 12), 53_120);
    assert_eq!(u16_at(&p, 39), 3500);
    assert_eq!(u16_at(&p, 41), 3000);
    assert_eq!(u16_at(&p, 77), 3250);
    assert_eq!(u16_at(&p, 77 + 5 * 2), 3000);
    assert_eq!(u16_at(&p, 77 + 9 * 2), 3500);
    assert_eq!(u16_at(&p, 77 + 15 * 2), 3250);
    assert_eq!(&p[57..59], &[0, 0]);
    assert_eq!(&p[61..63], &(-150i16).to_le_bytes());
    assert_eq!(&p[122..138], b"HW51ZEH4SF123456");
    assert_eq!(u16_at(&p, 148), 55_200);
    // Untouched template bytes survive.
    assert_eq!(&p[0..3], &BATTERY_STATUS_TEMPLATE[0..3]);
    assert_eq!(&p[150..], &BATTERY_STATUS_TEMPLATE[150..]);

    let parsed = BatteryStatus::from_payload(&p).unwrap();
    assert_eq!(parsed.max_cell_mv, 3500);
    assert_eq!(parsed.min_cell_mv, 3000);
    assert_eq!(parsed.serial, *b"HW51ZEH4SF123456");
}

#[test]
/// Heartbeat reply: 132 bytes with runtimes and limits in the tail.
fn test_heartbeat_reply_offsets() {
    let mut state = BridgeState::default();
    state.telemetry.charge_voltage_mv = 56_800;
    state.telemetry.soc = 87;
    state.telemetry.pack_voltage_mv = 52_300;
    state.telemetry.temperature = -5;
    state.telemetry.charge_runtime = 0x0102_0304;
    state.telemetry.discharge_runtime = 0x0A0B_0C0D;
    state.limits.upper = 95;
    state.limits.lower = 10;

    let p = build(Outbound::HeartbeatReply, &state);
    assert_eq!(p.len(), 132);
    assert_eq!(&p[3..19], &state.telemetry.serial);
    assert_eq!(u16_at(&p, 41), 56_803);
    assert_eq!(p[56], 87);
    assert_eq!(u16_at(&p, 57), 52_300);
    assert_eq!(p[114], 0xFB);
    assert_eq!(p[115], 0xFB);
    assert_eq!(&p[120..124], &[0x04, 0x03, 0x02, 0x01]);
    assert_eq!(&p[124..128], &[0x0D, 0x0C, 0x0B, 0x0A]);
    assert_eq!(p[128], 95);
    assert_eq!(p[129], 10);
    assert_eq!(&p[130..], &[0, 0]);
}

#[test]
/// Voltage report offsets wrap below 1896 mV.
fn test_voltage_report_wrapping() {
    let mut state = BridgeState::default();
    state.telemetry.pack_voltage_mv = 52_000;
    let p = build(Outbound::VoltageReport(VoltageTarget::T04), &state);
    assert_eq!(u16_at(&p, 1), 53_000);
    assert_eq!(u16_at(&p, 9), 50_104);

    state.telemetry.pack_voltage_mv = 1000;
    let p = build(Outbound::VoltageReport(VoltageTarget::T08), &state);
    assert_eq!(&p[9..11], &[0x80, 0xFC]);
    assert_eq!(VoltageReport::from_payload(&p).unwrap().pack_voltage_mv, 1000);
}

#[test]
/// Pack summary: charging flag, balance capacity and extremes.
fn test_pack_summary_offsets() {
    let mut state = BridgeState::default();
    state.telemetry.input_watts = 150.0;
    state.telemetry.output_watts = 0.0;
    state.telemetry.balance_capacity = 2.7;
    state.telemetry.soc = 64;
    state.telemetry.cell_voltages[0] = 3.125;
    state.telemetry.cell_voltages[15] = 3.5;
    state.telemetry.discharge_runtime = 77;
    state.limits.upper = 90;
    state.limits.lower = 15;

    let p = build(Outbound::PackSummary, &state);
    assert_eq!(&p[0..16], &state.telemetry.serial);
    assert_eq!(p[37], 64);
    assert_eq!(u16_at(&p, 38), state.telemetry.pack_voltage_mv);
    assert_eq!(p[47], 0x02);
    assert_eq!(u16_at(&p, 57), 2000);
    assert_eq!(u16_at(&p, 65), 3500);
    assert_eq!(u16_at(&p, 69), 3125);
    assert_eq!(u16_at(&p, 78), 150);
    assert_eq!(&p[86..90], &77u32.to_le_bytes());
    assert_eq!((p[91], p[92]), (90, 15));

    state.telemetry.input_watts = 0.0;
    let p = build(Outbound::PackSummary, &state);
    assert_eq!(p[47], 0x00);
    assert!(!PackSummary::from_payload(&p).unwrap().charging);
}

#[test]
/// Power flow: 32-bit signed power and charge runtime.
fn test_power_flow_offsets() {
    let mut state = BridgeState::default();
    state.telemetry.soc = 42;
    state.telemetry.input_watts = 0.0;
    state.telemetry.output_watts = -6.0;
    state.telemetry.charge_runtime = 1234;
    let p = build(Outbound::PowerFlow, &state);
    assert_eq!(p[0], 42);
    assert_eq!(p[1], 0x00);
    assert_eq!(&p[2..6], &[0, 0, 0, 0]);
    assert_eq!(&p[6..10], &[0xFA, 0xFF, 0xFF, 0xFF]);
    assert_eq!(&p[10..14], &1234u32.to_le_bytes());
    assert_eq!((p[15], p[16]), (100, 5));
    assert_eq!(&p[17..], &POWER_FLOW_TEMPLATE[17..]);
}

#[test]
/// Serial lands at offset 1 (0x70), 8 (0x24) and 0 (0x68).
fn test_serial_offsets() {
    let mut state = BridgeState::default();
    state.telemetry.set_serial("ABC");
    let mut expected = [0u8; 16];
    expected[..3].copy_from_slice(b"ABC");

    assert_eq!(&build(Outbound::SerialAnnounce, &state)[1..17], &expected);
    assert_eq!(&build(Outbound::VersionDate, &state)[8..24], &expected);
    assert_eq!(&build(Outbound::PackSummary, &state)[0..16], &expected);
}

#[test]
/// Pack voltage at offset 2, byte 4 cleared.
fn test_pack_voltage_offsets() {
    let mut state = BridgeState::default();
    state.telemetry.pack_voltage_mv = 0xD307;
    let p = build(Outbound::PackVoltage, &state);
    assert_eq!(&p[2..5], &[0x07, 0xD3, 0x00]);
    assert_eq!(&p[5..], &PACK_VOLTAGE_TEMPLATE[5..]);
}

#[test]
/// Static payloads go out verbatim.
fn test_static_payloads() {
    let state = BridgeState::default();
    assert_eq!(build(Outbound::VersionInfo, &state), VERSION_INFO_TEMPLATE.to_vec());
    assert_eq!(build(Outbound::Limit(LimitTracker::UpperAck), &state), vec![0x00]);
}

#[test]
/// Too small an output buffer is an error, not a panic.
fn test_buffer_too_small() {
    let mut buffer = [0u8; 10];
    assert!(Outbound::BatteryStatus
        .build_payload(&BridgeState::default(), &mut buffer)
        .is_err());
}

//==================================================================================INBOUND
#[test]
/// Peer serial is read from bytes 3..19 when printable.
fn test_heartbeat_serial() {
    let mut payload = [0u8; HEARTBEAT_PAYLOAD_LEN];
    payload[3..19].copy_from_slice(b"HW51ZEH4SF5U1234");
    assert_eq!(heartbeat_serial(&payload), Some(*b"HW51ZEH4SF5U1234"));

    payload[10] = 0x7F;
    assert_eq!(heartbeat_serial(&payload), None);
    assert_eq!(heartbeat_serial(&payload[..18]), None);
}

#[test]
/// Limit value is the first payload byte.
fn test_limit_value() {
    assert_eq!(limit_value(&[80]), Some(80));
    assert_eq!(limit_value(&[]), None);
}

//==================================================================================CLASSES
#[test]
/// Class set toggles individual classes.
fn test_class_set() {
    let mut set = ClassSet::all();
    for class in MessageClass::ALL {
        assert!(set.contains(class));
    }
    set.set(MessageClass::Limit, false);
    assert!(!set.contains(MessageClass::Limit));
    assert!(set.contains(MessageClass::PackVoltage));

    let only = ClassSet::empty().with(MessageClass::HeartbeatReply, true);
    assert!(only.contains(MessageClass::HeartbeatReply));
    assert!(!only.contains(MessageClass::VersionInfo));
}
