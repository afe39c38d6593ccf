//! Error definitions shared across library modules.
//! Each type models one failure family (encoding, decoding, reassembly,
//! payload layout, transmission). None of them is fatal to the engine: every
//! failure is scoped to the current message or transfer.
use thiserror_no_std::Error;

//==================================================================================FRAME_CODEC
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised while encoding an outbound message.
pub enum EncodeError {
    /// The header is too short to carry the type and key slot.
    #[error("Malformed header: {len} bytes, at least 7 required")]
    MalformedHeader { len: usize },
    /// Header, payload and CRC do not fit the encode buffer.
    #[error("Message too large: {len} bytes, max {max}")]
    MessageTooLarge { len: usize, max: usize },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised while decoding a reassembled message.
pub enum DecodeError {
    /// Fewer bytes than a complete header.
    #[error("Malformed header: {len} bytes")]
    MalformedHeader { len: usize },
    /// The raw buffer is shorter than the length declared in the header.
    #[error("Truncated message -> needed: {needed}, available: {available}")]
    Truncated { needed: usize, available: usize },
    /// Output buffer cannot hold the decoded payload.
    #[error("Output buffer too small -> needed: {needed}, available: {available}")]
    OutputTooSmall { needed: usize, available: usize },
    /// CRC carried by the peer does not match the recomputed one.
    #[error("CRC mismatch: received {received:#06x}, computed {computed:#06x}")]
    CrcMismatch { received: u16, computed: u16 },
}

//==================================================================================REASSEMBLY
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Reasons an inbound transfer was discarded.
pub enum ReassemblyFault {
    /// Declared payload length exceeds the configured maximum.
    #[error("Oversize payload {declared} > cap {max}")]
    OversizePayload { declared: usize, max: usize },
    /// No byte appended within the idle window.
    #[error("Reassembly timeout with {have} bytes buffered")]
    Timeout { have: usize },
    /// The complete message failed to decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Link-level degradations reported by the sequencer.
pub enum LinkFault {
    /// No heartbeat seen within the loss timeout.
    #[error("Heartbeat lost: silent for {silent_ms} ms")]
    HeartbeatLost { silent_ms: u64 },
}

//==================================================================================LAYOUT
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised by the byte-layout reader/writer.
pub enum LayoutError {
    /// Field extends past the end of the buffer.
    #[error("Field {field} out of bounds -> end: {end}, available: {available}")]
    OutOfBounds {
        field: &'static str,
        end: usize,
        available: usize,
    },
    /// Accessor does not match the declared field kind.
    #[error("Kind mismatch for field {field}")]
    KindMismatch { field: &'static str },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Issues encountered while serializing a payload record.
pub enum SerializationError {
    /// Provided buffer is too small for the template.
    #[error("Buffer too small -> needed: {needed}, available: {available}")]
    BufferTooSmall { needed: usize, available: usize },
    /// Field write failed.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised while deserializing a payload into a record.
pub enum DeserializationError {
    /// Payload size does not match the template.
    #[error("Invalid data length -> expected: {expected}, found: {found}")]
    InvalidDataLength { expected: usize, found: usize },
    /// Field read failed.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

//==================================================================================SEND_ERROR
#[derive(Error, Debug)]
/// Errors encountered when sending a message (build + encode + transmit).
pub enum SendError<E: core::fmt::Debug> {
    /// Payload record could not be serialized.
    #[error("Serialization failed: {0}")]
    Serialization(SerializationError),
    /// Frame codec rejected the message.
    #[error("Encode failed: {0}")]
    Encode(EncodeError),
    /// The frame sink refused a frame.
    #[error("Frame sink error: {0:?}")]
    Sink(E),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised by the in-memory frame batch.
pub enum BatchError {
    /// No room left for another frame.
    #[error("Frame batch full (capacity {capacity})")]
    Full { capacity: usize },
}

#[derive(Error, Debug)]
/// Errors terminating the async bridge runner.
pub enum BridgeRunError<E: core::fmt::Debug> {
    /// Receiving from the CAN bus failed.
    #[error("CAN bus receive error: {0:?}")]
    Receive(E),
    /// Sending on the CAN bus failed.
    #[error("CAN bus send error: {0:?}")]
    Send(E),
}
