//! Reassembly of inbound messages from start/middle/end frames.
//!
//! A single transfer is tracked at a time. The header is parsed as bytes
//! arrive: message type once offset 4 is buffered, declared payload length
//! once offsets 2..4 are, tracker once the full header is. The transfer
//! completes on an end frame once header, payload and CRC are all present.
use crate::core::{
    CRC_LEN, HEADER_LEN, IDX_LEN_HI, IDX_TRACKER_HI, IDX_TRACKER_LO, IDX_TYPE, MAX_RX_PAYLOAD,
    RX_BUFFER_CAPACITY,
};
use crate::error::ReassemblyFault;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::{FrameRole, RoutingGroup};
use crate::protocol::transport::frame_codec::declared_len;
use crate::protocol::transport::REASSEMBLY_TIMEOUT_MS;
use embassy_time::{Duration, Instant};

//==================================================================================Enums and Structs
#[derive(Debug, PartialEq, Eq)]
pub enum ProcessResult<'a> {
    /// Frame belongs to another channel, or arrived with no transfer active.
    Ignored,
    /// Bytes appended, message still incomplete.
    FragmentConsumed,
    /// Transfer discarded.
    Dropped(ReassemblyFault),
    /// Header, payload and CRC are buffered. The slice is exactly
    /// `header + payload + crc`; call [`ReassemblyEngine::release`] once the
    /// message has been handled.
    MessageComplete(&'a [u8]),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Transfer state.
pub enum TransferState {
    Idle,
    Accumulating,
    /// Complete message held until released.
    Complete,
}

/// Receive-side state machine bound to one routing group.
pub struct ReassemblyEngine {
    group: RoutingGroup,
    timeout: Duration,
    max_payload: usize,
    state: TransferState,
    buffer: [u8; RX_BUFFER_CAPACITY],
    have: usize,
    last_activity: Option<Instant>,
    msg_type: Option<u8>,
    payload_len: Option<usize>,
    tracker: Option<u16>,
}

impl Default for ReassemblyEngine {
    fn default() -> Self {
        Self::new(
            RoutingGroup::INBOUND,
            Duration::from_millis(REASSEMBLY_TIMEOUT_MS),
            MAX_RX_PAYLOAD,
        )
    }
}

impl ReassemblyEngine {
    /// `max_payload` is clamped to what the buffer can hold.
    pub const fn new(group: RoutingGroup, timeout: Duration, max_payload: usize) -> Self {
        let max_payload = if max_payload > MAX_RX_PAYLOAD {
            MAX_RX_PAYLOAD
        } else {
            max_payload
        };
        Self {
            group,
            timeout,
            max_payload,
            state: TransferState::Idle,
            buffer: [0; RX_BUFFER_CAPACITY],
            have: 0,
            last_activity: None,
            msg_type: None,
            payload_len: None,
            tracker: None,
        }
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    /// Bytes buffered for the current transfer.
    pub fn buffered(&self) -> usize {
        self.have
    }

    /// Message type, once byte 4 has arrived.
    pub fn msg_type(&self) -> Option<u8> {
        self.msg_type
    }

    /// Declared payload length, once bytes 2..4 have arrived.
    pub fn payload_len(&self) -> Option<usize> {
        self.payload_len
    }

    /// Tracker, once the full header has arrived.
    pub fn tracker(&self) -> Option<u16> {
        self.tracker
    }

    /// Total bytes expected for the current transfer, once known.
    pub fn target_total(&self) -> Option<usize> {
        self.payload_len.map(|len| HEADER_LEN + len + CRC_LEN)
    }

    /// Return to `Idle`, forgetting the current transfer.
    pub fn release(&mut self) {
        self.state = TransferState::Idle;
        self.have = 0;
        self.last_activity = None;
        self.msg_type = None;
        self.payload_len = None;
        self.tracker = None;
        // The buffer keeps stale bytes; `have` bounds every read.
    }

    //==================================================================================Process Functions
    /// Feed one CAN frame received at `now`.
    pub fn process_frame(&mut self, frame: &CanFrame, now: Instant) -> ProcessResult<'_> {
        if !frame.extended {
            return ProcessResult::Ignored;
        }
        let Some(role) = self.group.role_of(frame.id) else {
            return ProcessResult::Ignored;
        };

        match role {
            FrameRole::Start => {
                self.release();
                self.state = TransferState::Accumulating;
                self.last_activity = Some(now);
                #[cfg(feature = "defmt")]
                defmt::debug!("Reassembly start");
            }
            FrameRole::Middle | FrameRole::End => {
                if self.state != TransferState::Accumulating {
                    return ProcessResult::Ignored;
                }
                if let Some(fault) = self.poll_timeout(now) {
                    return ProcessResult::Dropped(fault);
                }
            }
        }

        if let Err(fault) = self.append(frame.payload(), now) {
            return ProcessResult::Dropped(fault);
        }

        if role == FrameRole::End {
            if let Some(total) = self.target_total() {
                if self.have >= total {
                    self.state = TransferState::Complete;
                    return ProcessResult::MessageComplete(&self.buffer[..total]);
                }
            }
        }
        ProcessResult::FragmentConsumed
    }

    /// Drop the transfer if it has been idle longer than the timeout.
    /// Never fires while idle.
    pub fn poll_timeout(&mut self, now: Instant) -> Option<ReassemblyFault> {
        if self.state != TransferState::Accumulating {
            return None;
        }
        let last = self.last_activity?;
        if now.saturating_duration_since(last) > self.timeout {
            let fault = ReassemblyFault::Timeout { have: self.have };
            #[cfg(feature = "defmt")]
            defmt::debug!("Reassembly timeout, {} bytes dropped", self.have);
            self.release();
            return Some(fault);
        }
        None
    }

    fn append(&mut self, data: &[u8], now: Instant) -> Result<(), ReassemblyFault> {
        if data.is_empty() {
            return Ok(());
        }
        let count = data.len().min(RX_BUFFER_CAPACITY - self.have);
        self.buffer[self.have..self.have + count].copy_from_slice(&data[..count]);
        self.have += count;
        self.last_activity = Some(now);

        if self.msg_type.is_none() && self.have > IDX_TYPE {
            self.msg_type = Some(self.buffer[IDX_TYPE]);
        }
        if self.payload_len.is_none() && self.have > IDX_LEN_HI {
            let declared = declared_len(&self.buffer[..self.have]).unwrap_or(0);
            if declared > self.max_payload {
                let fault = ReassemblyFault::OversizePayload {
                    declared,
                    max: self.max_payload,
                };
                #[cfg(feature = "defmt")]
                defmt::warn!("Oversize payload {} > cap {}, dropping", declared, self.max_payload);
                self.release();
                return Err(fault);
            }
            self.payload_len = Some(declared);
        }
        if self.tracker.is_none() && self.have >= HEADER_LEN {
            self.tracker = Some(u16::from_be_bytes([
                self.buffer[IDX_TRACKER_HI],
                self.buffer[IDX_TRACKER_LO],
            ]));
        }
        Ok(())
    }
}
