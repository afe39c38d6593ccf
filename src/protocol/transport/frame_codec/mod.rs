//! XOR + CRC16 framing of one logical message.
//!
//! Wire layout of an encoded message:
//!
//! ```text
//! | header (18) | payload ^ key (len) | crc16 LE (2) |
//!   [2..4] payload length LE
//!   [4]    message type
//!   [6]    XOR key
//!   [16..18] tracker BE
//! ```
//!
//! The CRC covers the header and the *obfuscated* payload. Splitting the
//! encoded bytes into CAN frames is the job of
//! [`segmented::builder`](crate::protocol::transport::segmented::builder).
pub mod keys;

use crate::core::{
    MessageBytes, CRC_LEN, HEADER_LEN, IDX_KEY, IDX_LEN_HI, IDX_LEN_LO, IDX_TRACKER_HI,
    IDX_TRACKER_LO, IDX_TYPE, MAX_ENCODED_LEN,
};
use crate::error::{DecodeError, EncodeError};
use crate::infra::codec::crc::crc16;
use keys::KeyRegistry;

/// Message type switching the segmenter to length-prefixed frames.
pub const LENGTH_PREFIXED_MSG_TYPE: u8 = 0xA0;

/// Shortest header that still carries the type and key slots.
pub const MIN_HEADER_LEN: usize = IDX_KEY + 1;

//==================================================================================FRAMING_MODE
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// How encoded bytes are laid into CAN frames.
pub enum FramingMode {
    /// Up to eight message bytes per frame, no prefix.
    Plain,
    /// First byte of each frame counts the (up to seven) data bytes after it.
    LengthPrefixed,
}

impl FramingMode {
    pub fn for_msg_type(msg_type: u8) -> Self {
        if msg_type == LENGTH_PREFIXED_MSG_TYPE {
            FramingMode::LengthPrefixed
        } else {
            FramingMode::Plain
        }
    }

    /// Message bytes carried per frame.
    pub fn chunk_len(&self) -> usize {
        match self {
            FramingMode::Plain => 8,
            FramingMode::LengthPrefixed => 7,
        }
    }
}

//==================================================================================ENCODE
#[derive(Clone, Debug, PartialEq, Eq)]
/// Fully framed message ready for segmentation.
pub struct EncodedMessage {
    pub bytes: MessageBytes,
    pub mode: FramingMode,
    pub msg_type: u8,
    pub key: u8,
    pub crc: u16,
}

/// Tracker carried by a header, when the header is long enough to hold one.
pub fn header_tracker(header: &[u8]) -> Option<u16> {
    if header.len() > IDX_TRACKER_LO {
        Some(u16::from_be_bytes([
            header[IDX_TRACKER_HI],
            header[IDX_TRACKER_LO],
        ]))
    } else {
        None
    }
}

/// Obfuscate and checksum `payload` behind `header`.
///
/// The key comes from `keys` (sticky reply slot or the ephemeral counter).
/// It is written into the header copy together with the actual payload
/// length; the caller's header is left untouched.
pub fn encode(
    header: &[u8],
    payload: &[u8],
    keys: &mut KeyRegistry,
) -> Result<EncodedMessage, EncodeError> {
    if header.len() < MIN_HEADER_LEN {
        return Err(EncodeError::MalformedHeader { len: header.len() });
    }
    let total = header.len() + payload.len() + CRC_LEN;
    if total > MAX_ENCODED_LEN {
        return Err(EncodeError::MessageTooLarge {
            len: total,
            max: MAX_ENCODED_LEN,
        });
    }

    let msg_type = header[IDX_TYPE];
    let key = keys.key_for_outbound(msg_type, header_tracker(header));

    let mut bytes = MessageBytes::new();
    bytes.extend_from_slice(header);
    bytes.data[IDX_KEY] = key;
    bytes.data[IDX_LEN_LO..=IDX_LEN_HI].copy_from_slice(&(payload.len() as u16).to_le_bytes());
    for (dst, src) in bytes.data[header.len()..header.len() + payload.len()]
        .iter_mut()
        .zip(payload)
    {
        *dst = src ^ key;
    }
    bytes.len = header.len() + payload.len();

    let crc = crc16(bytes.as_slice());
    bytes.extend_from_slice(&crc.to_le_bytes());

    Ok(EncodedMessage {
        bytes,
        mode: FramingMode::for_msg_type(msg_type),
        msg_type,
        key,
        crc,
    })
}

//==================================================================================DECODE
#[derive(Debug, PartialEq, Eq)]
/// Result of decoding one reassembled message.
pub struct DecodedMessage<'a> {
    pub msg_type: u8,
    pub tracker: u16,
    pub key: u8,
    /// CRC as carried on the wire.
    pub crc: u16,
    /// De-obfuscated payload.
    pub payload: &'a [u8],
}

/// Payload length declared by a (possibly partial) header.
pub fn declared_len(raw: &[u8]) -> Option<usize> {
    if raw.len() > IDX_LEN_HI {
        Some(u16::from_le_bytes([raw[IDX_LEN_LO], raw[IDX_LEN_HI]]) as usize)
    } else {
        None
    }
}

/// Decode `raw` (header, obfuscated payload, CRC) into `out`.
///
/// With `verify_crc` the trailing CRC is recomputed over header and
/// obfuscated payload and a mismatch is rejected. Bytes after the declared
/// end of the message are ignored.
pub fn decode<'a>(
    raw: &[u8],
    out: &'a mut [u8],
    verify_crc: bool,
) -> Result<DecodedMessage<'a>, DecodeError> {
    if raw.len() < HEADER_LEN {
        return Err(DecodeError::MalformedHeader { len: raw.len() });
    }
    let payload_len = declared_len(raw).unwrap_or(0);
    let needed = HEADER_LEN + payload_len + CRC_LEN;
    if raw.len() < needed {
        return Err(DecodeError::Truncated {
            needed,
            available: raw.len(),
        });
    }
    if out.len() < payload_len {
        return Err(DecodeError::OutputTooSmall {
            needed: payload_len,
            available: out.len(),
        });
    }

    let body_end = HEADER_LEN + payload_len;
    let received = u16::from_le_bytes([raw[body_end], raw[body_end + 1]]);
    if verify_crc {
        let computed = crc16(&raw[..body_end]);
        if computed != received {
            return Err(DecodeError::CrcMismatch { received, computed });
        }
    }

    let key = raw[IDX_KEY];
    let payload = &mut out[..payload_len];
    for (dst, src) in payload.iter_mut().zip(&raw[HEADER_LEN..body_end]) {
        *dst = src ^ key;
    }

    Ok(DecodedMessage {
        msg_type: raw[IDX_TYPE],
        tracker: u16::from_be_bytes([raw[IDX_TRACKER_HI], raw[IDX_TRACKER_LO]]),
        key,
        crc: received,
        payload,
    })
}
