//! In-memory representation of a classic CAN 2.0 frame as exchanged with the
//! PowerStream. Every protocol frame is extended (29-bit); standard frames are
//! only kept around so the receive path can ignore them explicitly.
use crate::protocol::transport::can_id::{CanId, EXTENDED_ID_MASK};
use embedded_can::{ExtendedId, Id, StandardId};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Raw frame as read from or written to the CAN bus.
pub struct CanFrame {
    /// Arbitration identifier. Only the low 29 bits are meaningful.
    pub id: CanId,
    /// `true` for 29-bit identifiers.
    pub extended: bool,
    /// Payload buffer. Classic CAN frames always provide eight bytes.
    pub data: [u8; 8],
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    pub len: usize,
}

impl CanFrame {
    /// Build an extended data frame. `data` beyond eight bytes is dropped.
    pub fn new_extended(id: CanId, data: &[u8]) -> Self {
        let len = data.len().min(8);
        let mut buf = [0u8; 8];
        buf[..len].copy_from_slice(&data[..len]);
        Self {
            id: CanId(id.masked()),
            extended: true,
            data: buf,
            len,
        }
    }

    /// Valid payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len.min(8)]
    }
}

//==================================================================================EMBEDDED_CAN
impl embedded_can::Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        if data.len() > 8 {
            return None;
        }
        let (raw, extended) = match id.into() {
            Id::Standard(sid) => (sid.as_raw() as u32, false),
            Id::Extended(eid) => (eid.as_raw(), true),
        };
        let mut frame = Self::new_extended(CanId(raw), data);
        frame.extended = extended;
        Some(frame)
    }

    fn new_remote(_id: impl Into<Id>, _dlc: usize) -> Option<Self> {
        None
    }

    fn is_extended(&self) -> bool {
        self.extended
    }

    fn is_remote_frame(&self) -> bool {
        false
    }

    fn id(&self) -> Id {
        if self.extended {
            match ExtendedId::new(self.id.0 & EXTENDED_ID_MASK) {
                Some(eid) => Id::Extended(eid),
                None => Id::Extended(ExtendedId::ZERO),
            }
        } else {
            match StandardId::new((self.id.0 & 0x7FF) as u16) {
                Some(sid) => Id::Standard(sid),
                None => Id::Standard(StandardId::ZERO),
            }
        }
    }

    fn dlc(&self) -> usize {
        self.len.min(8)
    }

    fn data(&self) -> &[u8] {
        self.payload()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_can::Frame;

    #[test]
    /// Extended constructor masks the identifier and clamps the payload.
    fn test_new_extended_clamps() {
        let frame = CanFrame::new_extended(CanId(0xF000_3001), &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(frame.id, CanId(0x1000_3001));
        assert_eq!(frame.len, 8);
        assert_eq!(frame.payload(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    /// The `embedded_can::Frame` view matches the inherent fields.
    fn test_embedded_can_view() {
        let eid = ExtendedId::new(0x1021_4001).unwrap();
        let frame = <CanFrame as Frame>::new(eid, &[0xAA, 0xBB]).unwrap();
        assert!(frame.is_extended());
        assert!(!frame.is_remote_frame());
        assert_eq!(frame.dlc(), 2);
        assert_eq!(Frame::data(&frame), &[0xAA, 0xBB]);
        assert_eq!(frame.id(), Id::Extended(eid));

        let sid = StandardId::new(0x123).unwrap();
        let standard = <CanFrame as Frame>::new(sid, &[]).unwrap();
        assert!(!standard.is_extended());
        assert_eq!(standard.id(), Id::Standard(sid));
        assert!(<CanFrame as Frame>::new(eid, &[0; 9]).is_none());
    }
}
