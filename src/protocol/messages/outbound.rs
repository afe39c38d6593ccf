//! Every message this node can put on the bus.
//!
//! An [`Outbound`] ties together a header template, the message class that
//! gates it, and the payload record built from the bridge snapshot.
use crate::core::HEADER_LEN;
use crate::error::SerializationError;
use crate::infra::codec::traits::PayloadData;
use crate::protocol::messages::records::{
    BatteryStatus, HeartbeatReply, LimitStatus, PackSummary, PackVoltage, PowerFlow,
    SerialAnnounce, VersionDate, VersionInfo, VoltageReport,
};
use crate::protocol::messages::templates::*;
use crate::protocol::messages::MessageClass;
use crate::protocol::session::state::BridgeState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Header variant of the voltage report, named after its byte 13.
pub enum VoltageTarget {
    T02,
    T04,
    T05,
    T08,
    T50,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Header variant of a limit (0xCB) message, named after its tracker.
pub enum LimitTracker {
    /// Scheduled, tracker 0x0321.
    T0321,
    /// Scheduled, tracker 0x0141.
    T0141,
    /// Scheduled, tracker 0x0150.
    T0150,
    /// Acknowledges the upper charge limit, tracker 0x2031.
    UpperAck,
    /// Acknowledges the lower charge limit, tracker 0x2033.
    LowerAck,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outbound {
    SerialAnnounce,
    VoltageReport(VoltageTarget),
    PowerFlow,
    PackSummary,
    BatteryStatus,
    Limit(LimitTracker),
    PackVoltage,
    HeartbeatReply,
    VersionInfo,
    VersionDate,
}

impl Outbound {
    /// Class whose enable switch gates the message.
    pub const fn class(&self) -> MessageClass {
        match self {
            Outbound::SerialAnnounce => MessageClass::SerialAnnounce,
            Outbound::VoltageReport(_) => MessageClass::VoltageReport,
            Outbound::PowerFlow => MessageClass::PowerFlow,
            Outbound::PackSummary => MessageClass::PackSummary,
            Outbound::BatteryStatus => MessageClass::BatteryStatus,
            Outbound::Limit(_) => MessageClass::Limit,
            Outbound::PackVoltage => MessageClass::PackVoltage,
            Outbound::HeartbeatReply => MessageClass::HeartbeatReply,
            Outbound::VersionInfo => MessageClass::VersionInfo,
            Outbound::VersionDate => MessageClass::VersionDate,
        }
    }

    pub const fn header(&self) -> &'static [u8; HEADER_LEN] {
        match self {
            Outbound::SerialAnnounce => &HEADER_SERIAL_ANNOUNCE,
            Outbound::VoltageReport(VoltageTarget::T02) => &HEADER_VOLTAGE_REPORT_02,
            Outbound::VoltageReport(VoltageTarget::T04) => &HEADER_VOLTAGE_REPORT_04,
            Outbound::VoltageReport(VoltageTarget::T05) => &HEADER_VOLTAGE_REPORT_05,
            Outbound::VoltageReport(VoltageTarget::T08) => &HEADER_VOLTAGE_REPORT_08,
            Outbound::VoltageReport(VoltageTarget::T50) => &HEADER_VOLTAGE_REPORT_50,
            Outbound::PowerFlow => &HEADER_POWER_FLOW,
            Outbound::PackSummary => &HEADER_PACK_SUMMARY,
            Outbound::BatteryStatus => &HEADER_BATTERY_STATUS,
            Outbound::Limit(LimitTracker::T0321) => &HEADER_LIMIT_0321,
            Outbound::Limit(LimitTracker::T0141) => &HEADER_LIMIT_0141,
            Outbound::Limit(LimitTracker::T0150) => &HEADER_LIMIT_0150,
            Outbound::Limit(LimitTracker::UpperAck) => &HEADER_LIMIT_UPPER_ACK,
            Outbound::Limit(LimitTracker::LowerAck) => &HEADER_LIMIT_LOWER_ACK,
            Outbound::PackVoltage => &HEADER_PACK_VOLTAGE,
            Outbound::HeartbeatReply => &HEADER_HEARTBEAT_REPLY,
            Outbound::VersionInfo => &HEADER_VERSION_INFO,
            Outbound::VersionDate => &HEADER_VERSION_DATE,
        }
    }

    /// Build the payload from `state` into `buffer`; returns its length.
    pub fn build_payload(
        &self,
        state: &BridgeState,
        buffer: &mut [u8],
    ) -> Result<usize, SerializationError> {
        match self {
            Outbound::SerialAnnounce => SerialAnnounce::from_state(state).to_payload(buffer),
            Outbound::VoltageReport(_) => VoltageReport::from_state(state).to_payload(buffer),
            Outbound::PowerFlow => PowerFlow::from_state(state).to_payload(buffer),
            Outbound::PackSummary => PackSummary::from_state(state).to_payload(buffer),
            Outbound::BatteryStatus => BatteryStatus::from_state(state).to_payload(buffer),
            Outbound::Limit(_) => LimitStatus::default().to_payload(buffer),
            Outbound::PackVoltage => PackVoltage::from_state(state).to_payload(buffer),
            Outbound::HeartbeatReply => HeartbeatReply::from_state(state).to_payload(buffer),
            Outbound::VersionInfo => VersionInfo.to_payload(buffer),
            Outbound::VersionDate => VersionDate::from_state(state).to_payload(buffer),
        }
    }
}
