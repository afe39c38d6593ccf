//! Byte-level codec helpers: CRC16/ARC, descriptor-driven field access and the
//! traits implemented by every payload record.
pub mod crc;
pub mod layout;
pub mod traits;
