//! Infrastructure shared by the protocol layer: checksums, byte-layout
//! access and the payload record traits.
pub mod codec;
