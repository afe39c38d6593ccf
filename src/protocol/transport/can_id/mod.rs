//! 29-bit arbitration identifiers and the start/middle/end routing groups
//! that carry one segmented logical message.
use super::{
    INBOUND_END_ID, INBOUND_MIDDLE_ID, INBOUND_START_ID, OUTBOUND_FIRST_ID, OUTBOUND_LAST_ID,
    OUTBOUND_MIDDLE_ID,
};

/// Mask keeping the 29 identifier bits of an extended frame.
pub const EXTENDED_ID_MASK: u32 = 0x1FFF_FFFF;

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Raw arbitration identifier as handed over by the driver.
pub struct CanId(pub u32);

impl CanId {
    /// Identifier restricted to its 29 significant bits.
    pub fn masked(&self) -> u32 {
        self.0 & EXTENDED_ID_MASK
    }
}

//==================================================================================ROUTING
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Position of a frame inside its message group.
pub enum FrameRole {
    /// First frame: resets any transfer in progress.
    Start,
    /// Interior frame.
    Middle,
    /// Last frame: triggers the completion check.
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// The three identifiers bound to one logical channel.
pub struct RoutingGroup {
    pub start: u32,
    pub middle: u32,
    pub end: u32,
}

impl RoutingGroup {
    /// Group used for every message this node transmits.
    pub const OUTBOUND: Self = Self {
        start: OUTBOUND_FIRST_ID,
        middle: OUTBOUND_MIDDLE_ID,
        end: OUTBOUND_LAST_ID,
    };

    /// Group the peer uses for the messages it transmits.
    pub const INBOUND: Self = Self {
        start: INBOUND_START_ID,
        middle: INBOUND_MIDDLE_ID,
        end: INBOUND_END_ID,
    };

    /// Classify an identifier; `None` when it belongs to another channel.
    pub fn role_of(&self, id: CanId) -> Option<FrameRole> {
        let id = id.masked();
        if id == self.start {
            Some(FrameRole::Start)
        } else if id == self.middle {
            Some(FrameRole::Middle)
        } else if id == self.end {
            Some(FrameRole::End)
        } else {
            None
        }
    }

    /// Identifier to use for a frame in the given role.
    pub fn id_for(&self, role: FrameRole) -> CanId {
        CanId(match role {
            FrameRole::Start => self.start,
            FrameRole::Middle => self.middle,
            FrameRole::End => self.end,
        })
    }
}
