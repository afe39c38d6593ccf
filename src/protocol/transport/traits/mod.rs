//! Abstraction traits used by the transport layer: async CAN bus and timer for
//! the bridge runner, a monotonic clock, and the synchronous frame sink the
//! protocol engine emits into.
pub mod bridge_clock;
pub mod bridge_timer;
pub mod can_bus;
pub mod frame_sink;
