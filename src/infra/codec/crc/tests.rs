//! CRC16/ARC reference checks.
use super::*;

#[test]
/// Table entries match the published CRC-16/ARC table.
fn test_table_reference_entries() {
    assert_eq!(CRC16_TABLE[0], 0x0000);
    assert_eq!(CRC16_TABLE[1], 0xC0C1);
    assert_eq!(CRC16_TABLE[2], 0xC181);
    assert_eq!(CRC16_TABLE[3], 0x0140);
    assert_eq!(CRC16_TABLE[128], 0xA001);
    assert_eq!(CRC16_TABLE[255], 0x4040);
}

#[test]
/// Standard check value for "123456789".
fn test_check_value() {
    assert_eq!(crc16(b"123456789"), 0xBB3D);
}

#[test]
/// Empty input keeps the initial value.
fn test_empty_input() {
    assert_eq!(crc16(&[]), 0);
}

#[test]
/// Incremental update equals one-shot computation.
fn test_update_is_incremental() {
    let data = b"\xAA\x03\x84\x00\x3C\x2E\xAC\x04 payload bytes";
    let (head, tail) = data.split_at(7);
    assert_eq!(update(crc16(head), tail), crc16(data));
}

#[test]
/// Flipping any single byte changes the CRC.
fn test_single_byte_change_detected() {
    let reference: [u8; 24] = [
        0xAA, 0x03, 0x01, 0x00, 0xCB, 0x2E, 0xF7, 0x3A, 0x00, 0x00, 0x0B, 0x3C, 0x03, 0x14, 0x01,
        0x01, 0x20, 0x31, 0x10, 0x20, 0x30, 0x40, 0x50, 0x60,
    ];
    let base = crc16(&reference);

    for index in 0..reference.len() {
        let mut altered = reference;
        altered[index] ^= 0x01;
        assert_ne!(crc16(&altered), base, "byte {index} change went undetected");
    }
}
