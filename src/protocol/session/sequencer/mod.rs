//! Heartbeat-gated transmit schedule.
//!
//! The PowerStream expects a fixed cyclic burst pattern from the battery as
//! long as it keeps sending heartbeats. The first heartbeat starts the cycle
//! at step 0 immediately; silence longer than the loss timeout stops it and
//! reports the link unhealthy until the next heartbeat.
use crate::error::LinkFault;
use crate::protocol::messages::outbound::{LimitTracker, Outbound, VoltageTarget};
use crate::protocol::transport::HEARTBEAT_LOSS_TIMEOUT_MS;
use embassy_time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// One scheduled transmission and the pause that follows it.
pub struct Step {
    pub action: Outbound,
    pub gap_ms: u16,
}

const fn step(action: Outbound, gap_ms: u16) -> Step {
    Step { action, gap_ms }
}

const VOLTAGE_04: Outbound = Outbound::VoltageReport(VoltageTarget::T04);
const VOLTAGE_02: Outbound = Outbound::VoltageReport(VoltageTarget::T02);
const VOLTAGE_05: Outbound = Outbound::VoltageReport(VoltageTarget::T05);
const VOLTAGE_50: Outbound = Outbound::VoltageReport(VoltageTarget::T50);
const VOLTAGE_08: Outbound = Outbound::VoltageReport(VoltageTarget::T08);

/// The cycle, in order. Order and gaps reproduce the pacing the peer expects.
pub const STEP_TABLE: [Step; 23] = [
    step(Outbound::SerialAnnounce, 25),
    step(VOLTAGE_04, 1),
    step(VOLTAGE_02, 1),
    step(VOLTAGE_05, 1),
    step(VOLTAGE_50, 1),
    step(VOLTAGE_08, 100),
    step(Outbound::PowerFlow, 100),
    step(VOLTAGE_04, 1),
    step(VOLTAGE_02, 1),
    step(VOLTAGE_05, 1),
    step(VOLTAGE_50, 1),
    step(VOLTAGE_08, 100),
    step(Outbound::PackSummary, 4),
    step(Outbound::BatteryStatus, 1),
    step(Outbound::Limit(LimitTracker::T0321), 1),
    step(Outbound::Limit(LimitTracker::T0141), 1),
    step(Outbound::PackVoltage, 1),
    step(Outbound::Limit(LimitTracker::T0150), 100),
    step(VOLTAGE_04, 1),
    step(VOLTAGE_02, 1),
    step(VOLTAGE_05, 1),
    step(VOLTAGE_50, 1),
    step(VOLTAGE_08, 200),
];

//==================================================================================TX_SEQUENCER
#[derive(Clone, Debug)]
pub struct TxSequencer {
    loss_timeout: Duration,
    running: bool,
    index: usize,
    next_due: Instant,
    last_heartbeat: Option<Instant>,
}

impl Default for TxSequencer {
    fn default() -> Self {
        Self::new(Duration::from_millis(HEARTBEAT_LOSS_TIMEOUT_MS))
    }
}

impl TxSequencer {
    pub const fn new(loss_timeout: Duration) -> Self {
        Self {
            loss_timeout,
            running: false,
            index: 0,
            next_due: Instant::from_ticks(0),
            last_heartbeat: None,
        }
    }

    /// Cycling the step table.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Heartbeat seen within the loss timeout.
    pub fn link_healthy(&self) -> bool {
        self.running
    }

    /// Index of the next step to fire.
    pub fn cursor(&self) -> usize {
        self.index
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.running.then_some(self.next_due)
    }

    pub fn last_heartbeat(&self) -> Option<Instant> {
        self.last_heartbeat
    }

    /// Register a peer heartbeat. Returns `true` when this (re)starts the cycle.
    pub fn on_heartbeat(&mut self, now: Instant) -> bool {
        self.last_heartbeat = Some(now);
        if self.running {
            return false;
        }
        self.running = true;
        self.index = 0;
        self.next_due = now;
        #[cfg(feature = "defmt")]
        defmt::info!("Heartbeat seen, TX sequencer started");
        true
    }

    /// Stop the cycle if the peer has been silent for too long.
    pub fn check_link(&mut self, now: Instant) -> Option<LinkFault> {
        if !self.running {
            return None;
        }
        let last = self.last_heartbeat?;
        let silent = now.saturating_duration_since(last);
        if silent > self.loss_timeout {
            self.running = false;
            #[cfg(feature = "defmt")]
            defmt::warn!("Heartbeat lost after {} ms, TX sequencer stopped", silent.as_millis());
            return Some(LinkFault::HeartbeatLost {
                silent_ms: silent.as_millis(),
            });
        }
        None
    }

    /// Next due action, if any. Advances the cursor and schedules the
    /// following step `gap_ms` after `now`. Nothing fires while stopped or
    /// while transmission is disabled; the cursor does not move then.
    pub fn poll(&mut self, now: Instant, tx_enabled: bool) -> Option<Outbound> {
        if !self.running || !tx_enabled || now < self.next_due {
            return None;
        }
        let Step { action, gap_ms } = STEP_TABLE[self.index];
        self.next_due = now + Duration::from_millis(gap_ms as u64);
        self.index = (self.index + 1) % STEP_TABLE.len();
        Some(action)
    }
}
