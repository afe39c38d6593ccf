//! Defines the "data contract" shared by the frame codec, the reassembly
//! engine and the payload records.
//!
//! Sizes of every fixed buffer live here, together with the byte-layout
//! descriptors that the payload records use as their single source of truth
//! for field offsets.

/// Length of the protocol header carried in front of every payload.
pub const HEADER_LEN: usize = 18;

/// Trailing CRC16 length (little-endian).
pub const CRC_LEN: usize = 2;

/// Largest payload accepted on the receive side.
pub const MAX_RX_PAYLOAD: usize = 2048;

/// Capacity of the reassembly buffer: header, maximum payload and CRC.
pub const RX_BUFFER_CAPACITY: usize = HEADER_LEN + MAX_RX_PAYLOAD + CRC_LEN;

/// Largest payload the transmit side will encode. The biggest outbound
/// template (battery status, 0x13) is 186 bytes.
pub const MAX_TX_PAYLOAD: usize = 256;

/// Largest fully encoded outbound message (header, payload, CRC).
pub const MAX_ENCODED_LEN: usize = HEADER_LEN + MAX_TX_PAYLOAD + CRC_LEN;

/// Number of series cells reported by the BMS.
pub const CELL_COUNT: usize = 16;

/// Length of the ASCII serial number exchanged with the peer.
pub const SERIAL_LEN: usize = 16;

//==================================================================================HEADER_OFFSETS
/// Payload length, low byte.
pub const IDX_LEN_LO: usize = 2;
/// Payload length, high byte.
pub const IDX_LEN_HI: usize = 3;
/// Message type.
pub const IDX_TYPE: usize = 4;
/// XOR key slot.
pub const IDX_KEY: usize = 6;
/// Tracker, high byte (big-endian pair).
pub const IDX_TRACKER_HI: usize = 16;
/// Tracker, low byte.
pub const IDX_TRACKER_LO: usize = 17;

//==================================================================================LAYOUT
/// Encoding of a single field inside a payload template.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldKind {
    /// Single unsigned byte.
    U8,
    /// Unsigned 16-bit little-endian integer.
    U16Le,
    /// Signed 16-bit little-endian integer (two's complement).
    I16Le,
    /// Unsigned 32-bit little-endian integer.
    U32Le,
    /// Signed 32-bit little-endian integer (two's complement).
    I32Le,
    /// Raw byte run of the given length (serial numbers, cell arrays).
    Bytes(usize),
}

impl FieldKind {
    /// Number of bytes occupied by a field of this kind.
    pub const fn width(&self) -> usize {
        match self {
            FieldKind::U8 => 1,
            FieldKind::U16Le | FieldKind::I16Le => 2,
            FieldKind::U32Le | FieldKind::I32Le => 4,
            FieldKind::Bytes(len) => *len,
        }
    }
}

/// Descriptor for one field of a payload template.
#[derive(Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// 1. Field identifier (diagnostics and test fixtures).
    pub id: &'static str,
    /// 2. Encoding of the field.
    pub kind: FieldKind,
    /// 3. Absolute byte offset inside the payload.
    pub offset: usize,
}

impl FieldDescriptor {
    /// Declare a field at `offset`.
    pub const fn new(id: &'static str, kind: FieldKind, offset: usize) -> Self {
        Self { id, kind, offset }
    }

    /// First byte after the field.
    pub const fn end(&self) -> usize {
        self.offset + self.kind.width()
    }
}

//==================================================================================MESSAGE_BYTES
/// Fixed-capacity buffer holding one encoded outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageBytes {
    pub len: usize,
    pub data: [u8; MAX_ENCODED_LEN],
}

impl Default for MessageBytes {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBytes {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            len: 0,
            data: [0; MAX_ENCODED_LEN],
        }
    }

    /// Number of valid bytes stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks whether the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remaining room before the buffer is full.
    #[inline]
    pub fn remaining(&self) -> usize {
        MAX_ENCODED_LEN - self.len
    }

    /// Append bytes, clamped to the remaining capacity. Returns the count copied.
    #[inline]
    pub fn extend_from_slice(&mut self, slice: &[u8]) -> usize {
        let clamped = slice.len().min(self.remaining());
        self.data[self.len..self.len + clamped].copy_from_slice(&slice[..clamped]);
        self.len += clamped;
        clamped
    }

    /// Immutable view over the populated bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Mutable view over the populated bytes.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data[..self.len]
    }
}
