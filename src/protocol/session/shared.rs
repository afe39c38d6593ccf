//! Lock shared by the receive path and the periodic tick.
//!
//! Frame arrivals may come from an interrupt or a different task than the
//! tick. Both go through the same blocking mutex, so reassembly, keys and the
//! bridge snapshot are never touched concurrently, and a completed message is
//! fully dispatched (reply included) before the next frame gets in.
use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Instant;

use crate::error::SendError;
use crate::protocol::messages::outbound::Outbound;
use crate::protocol::session::diagnostics::Diagnostics;
use crate::protocol::session::engine::{FrameOutcome, ProtocolEngine, TickReport};
use crate::protocol::session::state::BridgeState;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::frame_sink::FrameSink;

/// [`ProtocolEngine`] behind a blocking mutex.
pub struct SharedEngine<M: RawMutex = CriticalSectionRawMutex> {
    inner: Mutex<M, RefCell<ProtocolEngine>>,
}

impl<M: RawMutex> SharedEngine<M> {
    pub fn new(engine: ProtocolEngine) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(engine)),
        }
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut ProtocolEngine) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    pub fn handle_frame<S: FrameSink>(
        &self,
        frame: &CanFrame,
        now: Instant,
        sink: &mut S,
    ) -> FrameOutcome {
        self.with(|engine| engine.handle_frame(frame, now, sink))
    }

    pub fn tick<S: FrameSink>(&self, now: Instant, sink: &mut S) -> TickReport {
        self.with(|engine| engine.tick(now, sink))
    }

    pub fn send<S: FrameSink>(
        &self,
        msg: Outbound,
        sink: &mut S,
    ) -> Result<usize, SendError<S::Error>> {
        self.with(|engine| engine.send(msg, sink))
    }

    /// Apply telemetry or TX switch changes in one critical section.
    pub fn update_state(&self, f: impl FnOnce(&mut BridgeState)) {
        self.with(|engine| f(engine.state_mut()))
    }

    /// Copy of the current bridge snapshot.
    pub fn state(&self) -> BridgeState {
        self.with(|engine| *engine.state())
    }

    pub fn link_healthy(&self) -> bool {
        self.with(|engine| engine.link_healthy())
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.with(|engine| engine.diagnostics().clone())
    }
}
