//! CAN frame generator for encoded messages. Lazily cuts the encoded byte
//! stream into frames and picks the routing identifier of each one.
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::{FrameRole, RoutingGroup};
use crate::protocol::transport::frame_codec::{EncodedMessage, FramingMode};

#[derive(Debug)]
/// Shared parameters for all frames of one message.
pub struct FrameSegmenter<'a> {
    group: RoutingGroup,
    mode: FramingMode,
    bytes: &'a [u8],
}

impl<'a> FrameSegmenter<'a> {
    /// Segment raw bytes with an explicit framing mode.
    pub fn new(group: RoutingGroup, mode: FramingMode, bytes: &'a [u8]) -> Self {
        Self { group, mode, bytes }
    }

    /// Segment an encoded message with the mode its type selected.
    pub fn for_message(group: RoutingGroup, message: &'a EncodedMessage) -> Self {
        Self::new(group, message.mode, message.bytes.as_slice())
    }

    /// Number of frames the message occupies.
    pub fn frame_count(&self) -> usize {
        self.bytes.len().div_ceil(self.mode.chunk_len())
    }

    pub fn frames(self) -> FrameIterator<'a> {
        FrameIterator {
            segmenter: self,
            frame_index: 0,
            bytes_sent: 0,
        }
    }
}

/// Lazy iterator returning frames one by one.
pub struct FrameIterator<'a> {
    segmenter: FrameSegmenter<'a>,
    frame_index: usize,
    bytes_sent: usize,
}

impl<'a> Iterator for FrameIterator<'a> {
    type Item = CanFrame;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.segmenter.bytes;
        if self.bytes_sent >= bytes.len() {
            return None;
        }

        let capacity = self.segmenter.mode.chunk_len();
        let remaining = bytes.len() - self.bytes_sent;
        let chunk = remaining.min(capacity);

        // First frame wins over last: a one-frame message uses the start id.
        let role = if self.frame_index == 0 {
            FrameRole::Start
        } else if remaining <= capacity {
            FrameRole::End
        } else {
            FrameRole::Middle
        };
        let id = self.segmenter.group.id_for(role);

        let slice = &bytes[self.bytes_sent..self.bytes_sent + chunk];
        let frame = match self.segmenter.mode {
            FramingMode::Plain => CanFrame::new_extended(id, slice),
            FramingMode::LengthPrefixed => {
                let mut data = [0u8; 8];
                data[0] = chunk as u8;
                data[1..1 + chunk].copy_from_slice(slice);
                CanFrame::new_extended(id, &data[..1 + chunk])
            }
        };

        self.bytes_sent += chunk;
        self.frame_index += 1;

        Some(frame)
    }
}
