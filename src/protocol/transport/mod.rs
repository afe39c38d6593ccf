//! PowerStream transport layer: CAN frame representation, arbitration
//! identifiers and routing groups, the XOR/CRC16 frame codec with its key
//! registry, segmentation/reassembly, and bus abstraction traits.
//!
//! ## Arbitration identifiers
//!
//! A logical message travels as a *group* of extended CAN frames: the first
//! frame uses the group's start identifier, the last one its end identifier
//! and every frame in between the middle identifier. The outbound (BMS → PS)
//! and inbound (PS → BMS) groups live in different numeric families; both are
//! fixed by the peer firmware.
//!
//! ## Timing constants
//!
//! Both timeouts below are polled against a monotonic clock, never armed as
//! events. Neither can fire before the first relevant frame has arrived.

pub mod can_frame;
pub mod can_id;
pub mod frame_codec;
pub mod segmented;
pub mod traits;

/// Outbound group, first frame.
pub const OUTBOUND_FIRST_ID: u32 = 0x1000_3001;
/// Outbound group, interior frames.
pub const OUTBOUND_MIDDLE_ID: u32 = 0x1010_3001;
/// Outbound group, last frame.
pub const OUTBOUND_LAST_ID: u32 = 0x1020_3001;

/// Inbound group, start frame.
pub const INBOUND_START_ID: u32 = 0x1001_4001;
/// Inbound group, middle frames.
pub const INBOUND_MIDDLE_ID: u32 = 0x1011_4001;
/// Inbound group, end frame.
pub const INBOUND_END_ID: u32 = 0x1021_4001;

/// Idle window after which an incomplete inbound transfer is discarded (ms).
///
/// The peer emits the frames of one message back to back; 300 ms without a
/// new fragment means the rest of the group was lost on the bus.
pub const REASSEMBLY_TIMEOUT_MS: u64 = 300;

/// Heartbeat silence after which the TX sequencer stops (ms).
///
/// The PowerStream sends its heartbeat (type 0xC4) roughly every 500 ms. Past
/// 800 ms without one the link is reported unhealthy and all scheduled
/// transmissions cease until the next heartbeat.
pub const HEARTBEAT_LOSS_TIMEOUT_MS: u64 = 800;

/// Recommended period of the engine tick (ms).
///
/// The step table uses 1 ms gaps between related frames of a burst, so the
/// tick has to run at least that often to reproduce the peer's pacing.
pub const TICK_PERIOD_MS: u32 = 1;
