//! Byte templates captured from a real BMS/PowerStream exchange.
//!
//! Headers are 18 bytes: `[2..4]` declared payload length (LE), `[4]` message
//! type, `[6]` key slot (overwritten on encode), `[16..18]` tracker (BE).
//! Payload templates are copied before the live fields are stamped in, so
//! every byte not owned by a field keeps its captured value.
use crate::core::HEADER_LEN;

//==================================================================================HEADERS
/// Heartbeat reply (0x3C).
pub const HEADER_HEARTBEAT_REPLY: [u8; HEADER_LEN] = [
    0xAA, 0x03, 0x84, 0x00, 0x3C, 0x2E, 0xAC, 0x04,
    0x00, 0x00, 0x0B, 0x3C, 0x03, 0x14, 0x01, 0x01,
    0x03, 0x2F,
];

/// Battery status (0x13).
pub const HEADER_BATTERY_STATUS: [u8; HEADER_LEN] = [
    0xAA, 0x03, 0xBA, 0x00, 0x13, 0x2C, 0x00, 0x1A,
    0x00, 0x00, 0x0B, 0x3C, 0x03, 0x14, 0x01, 0x00,
    0x03, 0x1A,
];

/// Upper charge limit acknowledgement (0xCB / 0x2031).
pub const HEADER_LIMIT_UPPER_ACK: [u8; HEADER_LEN] = [
    0xAA, 0x03, 0x01, 0x00, 0xCB, 0x2E, 0xF7, 0x3A,
    0x00, 0x00, 0x0B, 0x3C, 0x03, 0x14, 0x01, 0x01,
    0x20, 0x31,
];

/// Lower charge limit acknowledgement (0xCB / 0x2033).
pub const HEADER_LIMIT_LOWER_ACK: [u8; HEADER_LEN] = [
    0xAA, 0x03, 0x01, 0x00, 0xCB, 0x2E, 0xF7, 0x3A,
    0x00, 0x00, 0x0B, 0x3C, 0x03, 0x14, 0x01, 0x01,
    0x20, 0x33,
];

/// Scheduled limit frame, tracker 0x0321.
pub const HEADER_LIMIT_0321: [u8; HEADER_LEN] = [
    0xAA, 0x03, 0x01, 0x00, 0xCB, 0x2C, 0x5E, 0x47,
    0x01, 0x00, 0x0B, 0x3C, 0x03, 0x08, 0x01, 0x00,
    0x03, 0x21,
];

/// Scheduled limit frame, tracker 0x0141.
pub const HEADER_LIMIT_0141: [u8; HEADER_LEN] = [
    0xAA, 0x03, 0x01, 0x00, 0xCB, 0x2C, 0x5F, 0x47,
    0x01, 0x00, 0x0B, 0x3C, 0x03, 0x08, 0x01, 0x00,
    0x01, 0x41,
];

/// Scheduled limit frame, tracker 0x0150.
pub const HEADER_LIMIT_0150: [u8; HEADER_LEN] = [
    0xAA, 0x03, 0x01, 0x00, 0xCB, 0x2C, 0x72, 0x47,
    0x01, 0x00, 0x0B, 0x3C, 0x03, 0x08, 0x01, 0x00,
    0x01, 0x50,
];

/// Serial announce (0x70).
pub const HEADER_SERIAL_ANNOUNCE: [u8; HEADER_LEN] = [
    0xAA, 0x03, 0x20, 0x00, 0x70, 0x2C, 0x86, 0x44,
    0x01, 0x00, 0x0B, 0x3C, 0x03, 0x35, 0x01, 0x00,
    0x35, 0x10,
];

/// Voltage report (0x0B). The five variants differ in byte 13 and in the
/// captured key byte.
pub const HEADER_VOLTAGE_REPORT_02: [u8; HEADER_LEN] = [
    0xAA, 0x03, 0x1A, 0x00, 0x0B, 0x2C, 0x8E, 0x47,
    0x01, 0x00, 0x0B, 0x3C, 0x03, 0x02, 0x01, 0x00,
    0x03, 0x07,
];

pub const HEADER_VOLTAGE_REPORT_04: [u8; HEADER_LEN] = [
    0xAA, 0x03, 0x1A, 0x00, 0x0B, 0x2C, 0x8E, 0x47,
    0x01, 0x00, 0x0B, 0x3C, 0x03, 0x04, 0x01, 0x00,
    0x03, 0x07,
];

pub const HEADER_VOLTAGE_REPORT_05: [u8; HEADER_LEN] = [
    0xAA, 0x03, 0x1A, 0x00, 0x0B, 0x2C, 0x8C, 0x47,
    0x01, 0x00, 0x0B, 0x3C, 0x03, 0x05, 0x01, 0x00,
    0x03, 0x07,
];

pub const HEADER_VOLTAGE_REPORT_08: [u8; HEADER_LEN] = [
    0xAA, 0x03, 0x1A, 0x00, 0x0B, 0x2C, 0x8E, 0x47,
    0x01, 0x00, 0x0B, 0x3C, 0x03, 0x08, 0x01, 0x00,
    0x03, 0x07,
];

pub const HEADER_VOLTAGE_REPORT_50: [u8; HEADER_LEN] = [
    0xAA, 0x03, 0x1A, 0x00, 0x0B, 0x2C, 0x8D, 0x47,
    0x01, 0x00, 0x0B, 0x3C, 0x03, 0x50, 0x01, 0x00,
    0x03, 0x07,
];

/// Pack voltage (0x5C).
pub const HEADER_PACK_VOLTAGE: [u8; HEADER_LEN] = [
    0xAA, 0x03, 0x0A, 0x00, 0x5C, 0x2C, 0x98, 0x46,
    0x01, 0x00, 0x0B, 0x3C, 0x03, 0x08, 0x01, 0x00,
    0x03, 0x22,
];

/// Pack summary (0x68).
pub const HEADER_PACK_SUMMARY: [u8; HEADER_LEN] = [
    0xAA, 0x03, 0x80, 0x00, 0x68, 0x2C, 0xB9, 0x45,
    0x01, 0x00, 0x0B, 0x3C, 0x03, 0x21, 0x01, 0x00,
    0x03, 0x01,
];

/// Power flow (0x4F).
pub const HEADER_POWER_FLOW: [u8; HEADER_LEN] = [
    0xAA, 0x03, 0x23, 0x00, 0x4F, 0x2C, 0x8A, 0x05,
    0x00, 0x00, 0x0B, 0x3C, 0x03, 0x21, 0x01, 0x00,
    0x03, 0x01,
];

/// Version info reply (0x8C).
pub const HEADER_VERSION_INFO: [u8; HEADER_LEN] = [
    0xAA, 0x03, 0x2C, 0x00, 0x8C, 0x2F, 0xBF, 0x00,
    0x00, 0x00, 0x0B, 0x3C, 0x03, 0x14, 0x01, 0x01,
    0x01, 0x05,
];

/// Version date reply (0x24).
pub const HEADER_VERSION_DATE: [u8; HEADER_LEN] = [
    0xAA, 0x03, 0x24, 0x00, 0x24, 0x2F, 0xCD, 0x3A,
    0x00, 0x00, 0x0B, 0x3C, 0x03, 0x14, 0x01, 0x01,
    0x01, 0x41,
];

/// Heartbeat as sent by the PowerStream (0xC4). Only used to simulate the peer.
pub const HEADER_HEARTBEAT: [u8; HEADER_LEN] = [
    0xAA, 0x03, 0x45, 0x00, 0xC4, 0x2D, 0x29, 0x3B,
    0x00, 0x00, 0x01, 0x4B, 0x14, 0x03, 0x01, 0x01,
    0x03, 0x02,
];

//==================================================================================PAYLOADS
/// Battery status (0x13).
pub const BATTERY_STATUS_TEMPLATE: [u8; 186] = [
    0x01, 0x01, 0x01, 0x60, 0xEA, 0x00, 0x00, 0x12,
    0x00, 0x00, 0x00, 0x08, 0xE8, 0xCA, 0x00, 0x00,
    0x00, 0xFF, 0xFF, 0xFF, 0x12, 0x00, 0x40, 0x9C,
    0x00, 0x00, 0x68, 0x0C, 0x00, 0x00, 0x5F, 0x94,
    0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x64, 0xB6,
    0x0C, 0x9A, 0x0C, 0x12, 0x12, 0x12, 0x12, 0x00,
    0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x41, 0x00, 0x00, 0x00, 0x00, 0x6A, 0xFF, 0x02,
    0x7B, 0x7B, 0x02, 0x00, 0x00, 0x01, 0x00, 0x00,
    0x1C, 0x00, 0x10, 0xB4, 0x0C, 0xB6, 0x0C, 0x9A,
    0x0C, 0xAE, 0x0C, 0xB1, 0x0C, 0xAF, 0x0C, 0xB1,
    0x0C, 0xA5, 0x0C, 0xB2, 0x0C, 0xB1, 0x0C, 0xB0,
    0x0C, 0xB1, 0x0C, 0xAE, 0x0C, 0xB0, 0x0C, 0xAF,
    0x0C, 0xAF, 0x0C, 0x02, 0x12, 0x00, 0x12, 0x00,
    0x56, 0x30, 0x2E, 0x30, 0x2E, 0x30, 0x03, 0x01,
    0x00, 0x00, 0x4D, 0x31, 0x30, 0x32, 0x5A, 0x33,
    0x42, 0x34, 0x5A, 0x45, 0x35, 0x48, 0x30, 0x36,
    0x30, 0x31, 0x3C, 0x0B, 0x00, 0x00, 0x20, 0x41,
    0x80, 0xB5, 0x80, 0x40, 0x7A, 0xD1, 0x05, 0x41,
    0x11, 0x01, 0x00, 0x01, 0x04, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00,
];

/// Heartbeat reply (0x3C). Zero padded to the 132 bytes its header declares;
/// the runtime counters and charge limits live in the padded tail.
pub const HEARTBEAT_REPLY_TEMPLATE: [u8; 132] = [
    0x01, 0x84, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x3C, 0x00, 0x0B, 0x00, 0x01,
    0x4D, 0x03, 0x01, 0x01, 0x11, 0x01, 0x00, 0x01,
    0x02, 0x01, 0x02, 0x00, 0xC8, 0x00, 0x00, 0x01,
    0x00, 0x6E, 0xD2, 0x00, 0x00, 0x51, 0x56, 0x00,
    0x00, 0x01, 0x00, 0x02, 0x8E, 0x88, 0x05, 0x41,
    0x0F, 0x9A, 0xCA, 0x00, 0x00, 0x49, 0xFF, 0xFF,
    0xFF, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x15, 0x15, 0x40, 0x9C, 0x00, 0x00,
    0x7F, 0x32, 0x02, 0x00, 0x7A, 0x02, 0x00, 0x00,
    0x64, 0x05, 0x00, 0x64, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
];

/// Limit frames and acknowledgements (0xCB).
pub const LIMIT_TEMPLATE: [u8; 1] = [
    0x00,
];

/// Serial announce (0x70).
pub const SERIAL_ANNOUNCE_TEMPLATE: [u8; 32] = [
    0x01, 0x4D, 0x31, 0x30, 0x32, 0x5A, 0x33, 0x42,
    0x34, 0x5A, 0x45, 0x35, 0x48, 0x30, 0x36, 0x30,
    0x31, 0x01, 0x0B, 0x3C, 0x01, 0x01, 0x03, 0x4D,
    0x01, 0x00, 0x01, 0x11, 0x00, 0x00, 0x00, 0x00,
];

/// Voltage report (0x0B), shared by all five header variants.
pub const VOLTAGE_REPORT_TEMPLATE: [u8; 26] = [
    0x02, 0xF0, 0xD2, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x01, 0xCF, 0x00, 0x00, 0x00, 0x01, 0x00,
    0x03, 0x01, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00,
];

/// Pack voltage (0x5C).
pub const PACK_VOLTAGE_TEMPLATE: [u8; 10] = [
    0x00, 0x02, 0x07, 0xD3, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00,
];

/// Pack summary (0x68).
pub const PACK_SUMMARY_TEMPLATE: [u8; 128] = [
    0x4D, 0x31, 0x30, 0x32, 0x5A, 0x33, 0x42, 0x34,
    0x5A, 0x45, 0x35, 0x48, 0x30, 0x36, 0x30, 0x31,
    0x60, 0xEA, 0x00, 0x00, 0x4D, 0x03, 0x01, 0x01,
    0xC8, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x01, 0x08, 0x18, 0xCB,
    0x00, 0x00, 0xD1, 0x02, 0x00, 0x00, 0x16, 0x02,
    0x01, 0x40, 0x9C, 0x00, 0x00, 0x5F, 0x94, 0x00,
    0x00, 0xF5, 0x0B, 0x00, 0x00, 0x04, 0x00, 0x00,
    0x00, 0xB8, 0x0C, 0x00, 0x00, 0x9D, 0x0C, 0x00,
    0x00, 0x16, 0x16, 0x17, 0x17, 0x00, 0x54, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x21, 0x0A,
    0x00, 0x00, 0x01, 0x32, 0x05, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x01,
    0x00, 0x00, 0x00, 0x64, 0x00, 0x03, 0x00, 0x17,
    0x16, 0x03, 0x00, 0x00, 0x54, 0xEC, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Power flow (0x4F).
pub const POWER_FLOW_TEMPLATE: [u8; 35] = [
    0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFA, 0xFF,
    0xFF, 0xFF, 0x7F, 0x32, 0x02, 0x00, 0x00, 0x64,
    0x05, 0x00, 0x64, 0x00, 0x2C, 0x01, 0x00, 0x00,
    0x00, 0x25, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00,
];

/// Version info (0x8C): firmware build date string, static.
pub const VERSION_INFO_TEMPLATE: [u8; 44] = [
    0x3C, 0x00, 0x0B, 0x00, 0x01, 0x01, 0x03, 0x4D,
    0x11, 0x01, 0x00, 0x01, 0x4A, 0x61, 0x6E, 0x20,
    0x32, 0x32, 0x20, 0x32, 0x30, 0x32, 0x34, 0x20,
    0x32, 0x32, 0x3A, 0x33, 0x39, 0x3A, 0x32, 0x33,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
];

/// Version date (0x24).
pub const VERSION_DATE_TEMPLATE: [u8; 36] = [
    0x7E, 0x06, 0x00, 0x00, 0x3C, 0x00, 0x0B, 0x00,
    0x4D, 0x31, 0x30, 0x32, 0x5A, 0x33, 0x42, 0x34,
    0x5A, 0x45, 0x35, 0x48, 0x30, 0x36, 0x30, 0x31,
    0xA6, 0xF1, 0x32, 0x33, 0x34, 0x36, 0x0B, 0x00,
    0x39, 0x38, 0x36, 0x37,
];

/// Length of the PowerStream heartbeat payload (0xC4).
pub const HEARTBEAT_PAYLOAD_LEN: usize = 69;
