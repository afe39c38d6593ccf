//! Public traits exposed by the codec layer. They decouple the typed payload
//! records from the byte templates they are serialized into and give the
//! session layer a uniform API over every outbound message.
use crate::core::FieldDescriptor;
use crate::error::{DeserializationError, SerializationError};

//==================================================================================PAYLOAD_DATA
/// Implemented by every typed payload record.
///
/// A record is serialized by copying its static [`TEMPLATE`](PayloadData::TEMPLATE)
/// into the output buffer and then overwriting the offsets listed in
/// [`FIELDS`](PayloadData::FIELDS). Bytes not covered by a field keep the
/// template value captured from the real device.
pub trait PayloadData: Sized {
    /// Reference payload bytes.
    const TEMPLATE: &'static [u8];

    /// Byte layout of the live fields, in offset order.
    const FIELDS: &'static [&'static FieldDescriptor];

    /// Deserialize a payload into a record.
    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError>;

    /// Serialize the record into `buffer` and return the payload length.
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, SerializationError>;
}

/// Copy `template` into the head of `buffer`, checking capacity first.
/// Shared prologue of every [`PayloadData::to_payload`] implementation.
pub fn stamp_template(template: &[u8], buffer: &mut [u8]) -> Result<usize, SerializationError> {
    if buffer.len() < template.len() {
        return Err(SerializationError::BufferTooSmall {
            needed: template.len(),
            available: buffer.len(),
        });
    }
    buffer[..template.len()].copy_from_slice(template);
    Ok(template.len())
}

/// Reject payloads whose length differs from the template.
/// Shared prologue of every [`PayloadData::from_payload`] implementation.
pub fn expect_len(template: &[u8], payload: &[u8]) -> Result<(), DeserializationError> {
    if payload.len() != template.len() {
        return Err(DeserializationError::InvalidDataLength {
            expected: template.len(),
            found: payload.len(),
        });
    }
    Ok(())
}
