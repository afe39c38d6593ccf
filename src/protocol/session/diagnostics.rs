//! Counters for observability. None of them affects protocol behaviour.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostics {
    pub frames_received: u32,
    /// Frames outside the inbound group or arriving with no transfer active.
    pub frames_ignored: u32,
    pub transfers_started: u32,
    pub messages_decoded: u32,
    pub oversize_drops: u32,
    pub reassembly_timeouts: u32,
    pub crc_failures: u32,
    /// Other decode failures (truncated, malformed).
    pub decode_failures: u32,
    pub heartbeats: u32,
    pub heartbeat_losses: u32,
    pub messages_sent: u32,
    pub frames_sent: u32,
    pub send_failures: u32,
    /// Occurrences of each decoded message type.
    pub type_counts: [u16; 256],
    pub last_msg_type: Option<u8>,
    pub last_tracker: Option<u16>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            frames_received: 0,
            frames_ignored: 0,
            transfers_started: 0,
            messages_decoded: 0,
            oversize_drops: 0,
            reassembly_timeouts: 0,
            crc_failures: 0,
            decode_failures: 0,
            heartbeats: 0,
            heartbeat_losses: 0,
            messages_sent: 0,
            frames_sent: 0,
            send_failures: 0,
            type_counts: [0; 256],
            last_msg_type: None,
            last_tracker: None,
        }
    }
}

impl Diagnostics {
    /// Count one decoded message; returns its running count.
    pub fn record_decoded(&mut self, msg_type: u8, tracker: u16) -> u16 {
        self.messages_decoded = self.messages_decoded.wrapping_add(1);
        let count = &mut self.type_counts[msg_type as usize];
        *count = count.wrapping_add(1);
        self.last_msg_type = Some(msg_type);
        self.last_tracker = Some(tracker);
        *count
    }

    pub fn type_count(&self, msg_type: u8) -> u16 {
        self.type_counts[msg_type as usize]
    }
}
