//! High-level components of the PowerStream link: CAN transport and framing,
//! the message catalogue, and the session engine driving both directions.
pub mod messages;
pub mod session;
pub mod transport;
