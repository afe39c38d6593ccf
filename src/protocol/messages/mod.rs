//! Message catalogue of the BMS ↔ PowerStream link.
//!
//! * [`templates`]: captured header and payload bytes.
//! * [`records`]: typed payload records stamped into those templates.
//! * [`outbound`]: every message this node can emit, with its header, class
//!   and payload builder.
//! * [`inbound`]: the few fields read out of peer messages.
pub mod inbound;
pub mod outbound;
pub mod records;
pub mod templates;

//==================================================================================MESSAGE_TYPES
/// PowerStream heartbeat (inbound).
pub const HEARTBEAT: u8 = 0xC4;
/// Heartbeat reply (outbound), paired with [`HEARTBEAT`].
pub const HEARTBEAT_REPLY: u8 = 0x3C;
/// Version request (inbound); the tracker selects the reply.
pub const VERSION_REQUEST: u8 = 0xDE;
/// Version info reply (outbound).
pub const VERSION_INFO: u8 = 0x8C;
/// Version date reply (outbound).
pub const VERSION_DATE: u8 = 0x24;
/// Charge limit traffic, both directions.
pub const LIMIT: u8 = 0xCB;
pub const SERIAL_ANNOUNCE: u8 = 0x70;
pub const VOLTAGE_REPORT: u8 = 0x0B;
pub const POWER_FLOW: u8 = 0x4F;
pub const PACK_SUMMARY: u8 = 0x68;
pub const BATTERY_STATUS: u8 = 0x13;
pub const PACK_VOLTAGE: u8 = 0x5C;

//==================================================================================TRACKERS
/// [`VERSION_REQUEST`] asking for [`VERSION_INFO`].
pub const TRACKER_VERSION_INFO: u16 = 0x0105;
/// [`VERSION_REQUEST`] asking for [`VERSION_DATE`].
pub const TRACKER_VERSION_DATE: u16 = 0x0141;
/// [`LIMIT`] carrying the upper charge limit.
pub const TRACKER_UPPER_LIMIT: u16 = 0x2031;
/// [`LIMIT`] carrying the lower charge limit.
pub const TRACKER_LOWER_LIMIT: u16 = 0x2033;

//==================================================================================MESSAGE_CLASS
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Transmission enable granularity. One class per outbound message type.
pub enum MessageClass {
    SerialAnnounce,
    VoltageReport,
    PowerFlow,
    PackSummary,
    BatteryStatus,
    Limit,
    PackVoltage,
    VersionDate,
    VersionInfo,
    HeartbeatReply,
}

impl MessageClass {
    pub const ALL: [MessageClass; 10] = [
        MessageClass::SerialAnnounce,
        MessageClass::VoltageReport,
        MessageClass::PowerFlow,
        MessageClass::PackSummary,
        MessageClass::BatteryStatus,
        MessageClass::Limit,
        MessageClass::PackVoltage,
        MessageClass::VersionDate,
        MessageClass::VersionInfo,
        MessageClass::HeartbeatReply,
    ];

    /// Message type owned by the class.
    pub const fn msg_type(self) -> u8 {
        match self {
            MessageClass::SerialAnnounce => SERIAL_ANNOUNCE,
            MessageClass::VoltageReport => VOLTAGE_REPORT,
            MessageClass::PowerFlow => POWER_FLOW,
            MessageClass::PackSummary => PACK_SUMMARY,
            MessageClass::BatteryStatus => BATTERY_STATUS,
            MessageClass::Limit => LIMIT,
            MessageClass::PackVoltage => PACK_VOLTAGE,
            MessageClass::VersionDate => VERSION_DATE,
            MessageClass::VersionInfo => VERSION_INFO,
            MessageClass::HeartbeatReply => HEARTBEAT_REPLY,
        }
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Set of enabled [`MessageClass`]es.
pub struct ClassSet(u16);

impl Default for ClassSet {
    fn default() -> Self {
        Self::all()
    }
}

impl ClassSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn all() -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < MessageClass::ALL.len() {
            bits |= MessageClass::ALL[i].bit();
            i += 1;
        }
        Self(bits)
    }

    pub const fn contains(&self, class: MessageClass) -> bool {
        self.0 & class.bit() != 0
    }

    pub fn set(&mut self, class: MessageClass, enabled: bool) {
        if enabled {
            self.0 |= class.bit();
        } else {
            self.0 &= !class.bit();
        }
    }

    /// Builder-style variant of [`set`](Self::set).
    pub const fn with(self, class: MessageClass, enabled: bool) -> Self {
        if enabled {
            Self(self.0 | class.bit())
        } else {
            Self(self.0 & !class.bit())
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
