//! XOR key bookkeeping.
//!
//! Replies to the peer's requests must reuse the key the peer chose for the
//! request; those keys are "sticky" and live in one slot per reply kind.
//! Every other outbound message draws from a free-running counter.
use crate::protocol::messages::{
    HEARTBEAT, HEARTBEAT_REPLY, LIMIT, TRACKER_LOWER_LIMIT, TRACKER_UPPER_LIMIT,
    TRACKER_VERSION_DATE, TRACKER_VERSION_INFO, VERSION_DATE, VERSION_INFO, VERSION_REQUEST,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Reply kinds whose key is learned from the peer.
pub enum StickySlot {
    /// 0x3C, paired with the 0xC4 heartbeat.
    HeartbeatReply,
    /// 0x8C, paired with 0xDE / 0x0105.
    VersionInfo,
    /// 0x24, paired with 0xDE / 0x0141.
    VersionDate,
    /// 0xCB / 0x2031.
    UpperLimitAck,
    /// 0xCB / 0x2033.
    LowerLimitAck,
}

impl StickySlot {
    const COUNT: usize = 5;

    fn index(self) -> usize {
        match self {
            StickySlot::HeartbeatReply => 0,
            StickySlot::VersionInfo => 1,
            StickySlot::VersionDate => 2,
            StickySlot::UpperLimitAck => 3,
            StickySlot::LowerLimitAck => 4,
        }
    }

    /// Slot an outbound `(msg_type, tracker)` reads its key from.
    pub fn for_outbound(msg_type: u8, tracker: Option<u16>) -> Option<Self> {
        match (msg_type, tracker) {
            (HEARTBEAT_REPLY, _) => Some(StickySlot::HeartbeatReply),
            (VERSION_INFO, _) => Some(StickySlot::VersionInfo),
            (VERSION_DATE, _) => Some(StickySlot::VersionDate),
            (LIMIT, Some(TRACKER_UPPER_LIMIT)) => Some(StickySlot::UpperLimitAck),
            (LIMIT, Some(TRACKER_LOWER_LIMIT)) => Some(StickySlot::LowerLimitAck),
            _ => None,
        }
    }

    /// Slot an inbound `(msg_type, tracker)` teaches.
    pub fn for_inbound(msg_type: u8, tracker: u16) -> Option<Self> {
        match (msg_type, tracker) {
            (HEARTBEAT, _) => Some(StickySlot::HeartbeatReply),
            (VERSION_REQUEST, TRACKER_VERSION_INFO) => Some(StickySlot::VersionInfo),
            (VERSION_REQUEST, TRACKER_VERSION_DATE) => Some(StickySlot::VersionDate),
            (LIMIT, TRACKER_UPPER_LIMIT) => Some(StickySlot::UpperLimitAck),
            (LIMIT, TRACKER_LOWER_LIMIT) => Some(StickySlot::LowerLimitAck),
            _ => None,
        }
    }
}

//==================================================================================KEY_REGISTRY
#[derive(Clone, Debug, PartialEq, Eq)]
/// Sticky keys plus the ephemeral counter.
pub struct KeyRegistry {
    sticky: [u8; StickySlot::COUNT],
    next_ephemeral: u8,
}

impl KeyRegistry {
    /// Start a session. `seed` should come from a hardware RNG so two
    /// sessions do not begin with the same key sequence.
    pub fn new(seed: u8) -> Self {
        Self {
            sticky: [0; StickySlot::COUNT],
            next_ephemeral: seed,
        }
    }

    /// Key for an outbound message. Non-sticky types consume the counter.
    pub fn key_for_outbound(&mut self, msg_type: u8, tracker: Option<u16>) -> u8 {
        match StickySlot::for_outbound(msg_type, tracker) {
            Some(slot) => self.sticky[slot.index()],
            None => {
                let key = self.next_ephemeral;
                self.next_ephemeral = self.next_ephemeral.wrapping_add(1);
                key
            }
        }
    }

    /// Record the key of a successfully decoded inbound message. Returns the
    /// slot updated, if the type is sticky.
    pub fn learn(&mut self, msg_type: u8, tracker: u16, key: u8) -> Option<StickySlot> {
        let slot = StickySlot::for_inbound(msg_type, tracker)?;
        self.sticky[slot.index()] = key;
        Some(slot)
    }

    pub fn sticky(&self, slot: StickySlot) -> u8 {
        self.sticky[slot.index()]
    }

    /// Value the counter will hand out next.
    pub fn peek_ephemeral(&self) -> u8 {
        self.next_ephemeral
    }
}
