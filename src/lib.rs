//! `powerstream-can` library: the CAN protocol spoken between a battery BMS
//! and an EcoFlow PowerStream inverter, in a `no_std` environment. The crate
//! exposes the infrastructure modules (CRC, byte layouts, payload traits) and
//! the protocol logic (XOR/CRC16 framing, multi-frame transport, message
//! catalogue, heartbeat-gated transmit session).
#![cfg_attr(not(test), no_std)]
//==================================================================================
/// Buffer sizes, header offsets and field descriptors shared by the codec
/// and the payload records.
pub mod core;
/// Failure families: encoding, decoding, reassembly, layout, transmission.
pub mod error;
/// Checksums, byte-layout access and payload record traits.
pub mod infra;
/// BMS ↔ PowerStream protocol: transport, messages and the session engine.
pub mod protocol;
//==================================================================================
