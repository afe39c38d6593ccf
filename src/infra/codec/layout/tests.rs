//! Layout reader/writer edge cases.
use super::*;

const FLAG: FieldDescriptor = FieldDescriptor::new("Flag", FieldKind::U8, 0);
const VOLTAGE: FieldDescriptor = FieldDescriptor::new("Voltage", FieldKind::U16Le, 1);
const POWER: FieldDescriptor = FieldDescriptor::new("Power", FieldKind::I16Le, 3);
const RUNTIME: FieldDescriptor = FieldDescriptor::new("Runtime", FieldKind::U32Le, 5);
const WATTS: FieldDescriptor = FieldDescriptor::new("Watts", FieldKind::I32Le, 9);
const NAME: FieldDescriptor = FieldDescriptor::new("Name", FieldKind::Bytes(3), 13);
const CELLS: FieldDescriptor = FieldDescriptor::new("Cells", FieldKind::Bytes(4), 16);

#[test]
/// Multi-byte integers land little-endian at their offsets.
fn test_write_little_endian_fields() {
    let mut buffer = [0u8; 20];
    let mut writer = LayoutWriter::new(&mut buffer);
    writer.put_u8(&FLAG, 0x02).unwrap();
    writer.put_u16(&VOLTAGE, 0xCAE8).unwrap();
    writer.put_i16(&POWER, -150).unwrap();
    writer.put_u32(&RUNTIME, 0x0102_0304).unwrap();
    writer.put_i32(&WATTS, -2).unwrap();

    assert_eq!(buffer[0], 0x02);
    assert_eq!(&buffer[1..3], &[0xE8, 0xCA]);
    assert_eq!(&buffer[3..5], &[0x6A, 0xFF]);
    assert_eq!(&buffer[5..9], &[0x04, 0x03, 0x02, 0x01]);
    assert_eq!(&buffer[9..13], &[0xFE, 0xFF, 0xFF, 0xFF]);
}

#[test]
/// Bytes outside the written fields keep their template value.
fn test_writer_preserves_untouched_bytes() {
    let mut buffer = [0xAAu8; 20];
    LayoutWriter::new(&mut buffer).put_u16(&VOLTAGE, 0).unwrap();
    assert_eq!(buffer[0], 0xAA);
    assert_eq!(&buffer[1..3], &[0, 0]);
    assert!(buffer[3..].iter().all(|b| *b == 0xAA));
}

#[test]
/// Reader returns what the writer stored.
fn test_reader_reads_back_fields() {
    let mut buffer = [0u8; 20];
    {
        let mut writer = LayoutWriter::new(&mut buffer);
        writer.put_bytes(&NAME, b"M10").unwrap();
        writer.put_u16_array(&CELLS, &[3300, 3350]).unwrap();
        writer.put_i32(&WATTS, 123_456).unwrap();
    }
    let reader = LayoutReader::new(&buffer);
    assert_eq!(reader.bytes(&NAME).unwrap(), b"M10");
    assert_eq!(reader.u16_at(&CELLS, 0).unwrap(), 3300);
    assert_eq!(reader.u16_at(&CELLS, 1).unwrap(), 3350);
    assert_eq!(reader.i32(&WATTS).unwrap(), 123_456);
}

#[test]
/// Writing past the buffer end is rejected without touching memory.
fn test_out_of_bounds_rejected() {
    let mut buffer = [0u8; 6];
    let err = LayoutWriter::new(&mut buffer).put_u32(&RUNTIME, 1).unwrap_err();
    assert_eq!(
        err,
        LayoutError::OutOfBounds {
            field: "Runtime",
            end: 9,
            available: 6
        }
    );
    assert_eq!(buffer, [0u8; 6]);
}

#[test]
/// Accessing a field with the wrong accessor is a kind mismatch.
fn test_kind_mismatch_rejected() {
    let buffer = [0u8; 20];
    let reader = LayoutReader::new(&buffer);
    assert!(matches!(
        reader.u32(&VOLTAGE),
        Err(LayoutError::KindMismatch { field: "Voltage" })
    ));

    let mut buffer = [0u8; 20];
    let mut writer = LayoutWriter::new(&mut buffer);
    assert!(matches!(
        writer.put_bytes(&NAME, b"TOO LONG"),
        Err(LayoutError::KindMismatch { field: "Name" })
    ));
}

#[test]
/// Indexing beyond a packed u16 array is out of bounds.
fn test_u16_at_out_of_range() {
    let buffer = [0u8; 20];
    let reader = LayoutReader::new(&buffer);
    assert!(matches!(
        reader.u16_at(&CELLS, 2),
        Err(LayoutError::OutOfBounds { field: "Cells", .. })
    ));
}
