//! Stateful side of the bridge.
//!
//! * [`engine`]: reassembly, decode, dispatch and the transmit cycle.
//! * [`sequencer`]: heartbeat-gated step table.
//! * [`shared`]: the lock serialising receive path and tick.
//! * [`runner`]: async loop over a [`CanBus`](crate::protocol::transport::traits::can_bus::CanBus).
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod runner;
pub mod sequencer;
pub mod shared;
pub mod state;
