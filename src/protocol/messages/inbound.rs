//! Fields read out of PowerStream messages.
use crate::core::{FieldDescriptor, FieldKind, SERIAL_LEN};
use crate::infra::codec::layout::LayoutReader;

/// PowerStream serial inside the heartbeat payload.
pub const HEARTBEAT_SERIAL: FieldDescriptor =
    FieldDescriptor::new("PeerSerial", FieldKind::Bytes(SERIAL_LEN), 3);

/// Charge limit byte inside an inbound limit message.
pub const LIMIT_VALUE: FieldDescriptor = FieldDescriptor::new("LimitValue", FieldKind::U8, 0);

/// Printable ASCII, space to tilde.
fn is_printable(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte)
}

/// Peer serial carried by a heartbeat. `None` when the payload is too short
/// or any byte is not printable.
pub fn heartbeat_serial(payload: &[u8]) -> Option<[u8; SERIAL_LEN]> {
    let raw = LayoutReader::new(payload).bytes(&HEARTBEAT_SERIAL).ok()?;
    if !raw.iter().copied().all(is_printable) {
        return None;
    }
    let mut serial = [0u8; SERIAL_LEN];
    serial.copy_from_slice(raw);
    Some(serial)
}

/// Charge limit carried by an inbound limit message, if the payload has one.
pub fn limit_value(payload: &[u8]) -> Option<u8> {
    LayoutReader::new(payload).u8(&LIMIT_VALUE).ok()
}
