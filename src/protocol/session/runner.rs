//! Async driver tying a [`SharedEngine`] to a CAN bus.
//!
//! The runner waits on the bus and on the tick timer at the same time. Each
//! wake-up feeds the engine under its lock, collecting outgoing frames into a
//! [`FrameBatch`], then writes the batch to the bus once the lock is
//! released. Nothing in the library spawns tasks; firmware awaits
//! [`BridgeRunner::drive`] from its own executor.
use core::fmt::Debug;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Instant};
use futures_util::{future::select, future::Either, pin_mut};

use crate::error::BridgeRunError;
use crate::protocol::session::shared::SharedEngine;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::bridge_clock::BridgeClock;
use crate::protocol::transport::traits::bridge_timer::BridgeTimer;
use crate::protocol::transport::traits::can_bus::CanBus;
use crate::protocol::transport::traits::frame_sink::FrameBatch;
use crate::protocol::transport::TICK_PERIOD_MS;

/// Frames one wake-up may produce. The largest outbound message (0x13)
/// takes 26 frames.
pub const DEFAULT_BATCH_CAPACITY: usize = 32;

pub struct BridgeRunner<'a, M, C, T, K, const N: usize = DEFAULT_BATCH_CAPACITY>
where
    M: RawMutex,
    C: CanBus,
    T: BridgeTimer,
    K: BridgeClock,
{
    engine: &'a SharedEngine<M>,
    bus: C,
    timer: T,
    clock: K,
    batch: FrameBatch<N>,
    last_tick: Option<Instant>,
}

impl<'a, M, C, T, K, const N: usize> BridgeRunner<'a, M, C, T, K, N>
where
    M: RawMutex,
    C: CanBus,
    C::Error: Debug,
    T: BridgeTimer,
    K: BridgeClock,
{
    pub fn new(engine: &'a SharedEngine<M>, bus: C, timer: T, clock: K) -> Self {
        Self {
            engine,
            bus,
            timer,
            clock,
            batch: FrameBatch::new(),
            last_tick: None,
        }
    }

    /// Give the bus back, e.g. after [`drive`](Self::drive) failed.
    pub fn into_inner(self) -> C {
        self.bus
    }

    /// Run until the bus fails. `recv` must be cancel safe: a pending receive
    /// is dropped whenever the tick timer wins the race.
    pub async fn drive(&mut self) -> Result<(), BridgeRunError<C::Error>> {
        loop {
            let mut received: Option<CanFrame> = None;
            {
                let recv_future = self.bus.recv();
                let tick_future = self.timer.delay_ms(TICK_PERIOD_MS);
                pin_mut!(recv_future);
                pin_mut!(tick_future);

                match select(recv_future, tick_future).await {
                    Either::Left((result, pending_tick)) => {
                        drop(pending_tick);
                        received = Some(result.map_err(BridgeRunError::Receive)?);
                    }
                    Either::Right(((), pending_recv)) => drop(pending_recv),
                }
            }

            let now = self.clock.now();
            if let Some(frame) = received {
                self.engine.handle_frame(&frame, now, &mut self.batch);
                self.flush().await?;
            }
            // A busy bus must not starve the schedule.
            if self.tick_due(now) {
                self.last_tick = Some(now);
                let _report = self.engine.tick(now, &mut self.batch);
                #[cfg(feature = "defmt")]
                if let Some(fault) = _report.link {
                    defmt::warn!("Link degraded: {}", fault);
                }
                self.flush().await?;
            }
        }
    }

    fn tick_due(&self, now: Instant) -> bool {
        match self.last_tick {
            Some(last) => {
                now.saturating_duration_since(last) >= Duration::from_millis(TICK_PERIOD_MS as u64)
            }
            None => true,
        }
    }

    async fn flush(&mut self) -> Result<(), BridgeRunError<C::Error>> {
        for frame in self.batch.frames() {
            self.bus.send(frame).await.map_err(BridgeRunError::Send)?;
        }
        self.batch.clear();
        Ok(())
    }
}
