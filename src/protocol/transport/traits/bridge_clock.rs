//! Monotonic time source. The engine never reads a clock itself: every entry
//! point takes `now` explicitly so tests can drive time by hand.
use embassy_time::Instant;

/// Source of monotonic timestamps.
pub trait BridgeClock {
    fn now(&self) -> Instant;
}

/// [`BridgeClock`] reading the embassy time driver.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyClock;

impl BridgeClock for EmbassyClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
