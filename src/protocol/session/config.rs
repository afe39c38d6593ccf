//! Runtime configuration of the protocol engine.
use crate::core::MAX_RX_PAYLOAD;
use crate::protocol::transport::can_id::RoutingGroup;
use crate::protocol::transport::{HEARTBEAT_LOSS_TIMEOUT_MS, REASSEMBLY_TIMEOUT_MS};
use embassy_time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Engine parameters. Defaults match the PowerStream firmware.
///
/// ```rust
/// use powerstream_can::protocol::session::config::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_max_payload(512)
///     .with_verify_crc(false);
/// assert_eq!(config.max_payload, 512);
/// ```
pub struct EngineConfig {
    /// Group the peer transmits on.
    pub inbound: RoutingGroup,
    /// Group this node transmits on.
    pub outbound: RoutingGroup,
    pub reassembly_timeout: Duration,
    pub heartbeat_loss_timeout: Duration,
    /// Largest inbound payload accepted; capped at the buffer size.
    pub max_payload: usize,
    /// Reject inbound messages whose CRC does not match.
    pub verify_crc: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            inbound: RoutingGroup::INBOUND,
            outbound: RoutingGroup::OUTBOUND,
            reassembly_timeout: Duration::from_millis(REASSEMBLY_TIMEOUT_MS),
            heartbeat_loss_timeout: Duration::from_millis(HEARTBEAT_LOSS_TIMEOUT_MS),
            max_payload: MAX_RX_PAYLOAD,
            verify_crc: true,
        }
    }
}

impl EngineConfig {
    pub fn with_inbound(mut self, group: RoutingGroup) -> Self {
        self.inbound = group;
        self
    }

    pub fn with_outbound(mut self, group: RoutingGroup) -> Self {
        self.outbound = group;
        self
    }

    pub fn with_reassembly_timeout(mut self, timeout: Duration) -> Self {
        self.reassembly_timeout = timeout;
        self
    }

    pub fn with_heartbeat_loss_timeout(mut self, timeout: Duration) -> Self {
        self.heartbeat_loss_timeout = timeout;
        self
    }

    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload.min(MAX_RX_PAYLOAD);
        self
    }

    pub fn with_verify_crc(mut self, verify_crc: bool) -> Self {
        self.verify_crc = verify_crc;
        self
    }
}
