//! End-to-end transport: encode, segment, reassemble, decode.
use super::assembler::{ProcessResult, ReassemblyEngine};
use super::builder::FrameSegmenter;
use crate::core::HEADER_LEN;
use crate::protocol::transport::can_id::{FrameRole, RoutingGroup};
use crate::protocol::transport::frame_codec::{decode, encode, keys::KeyRegistry};
use embassy_time::{Duration, Instant};

/// Our outbound frames are routed through an assembler listening on the
/// outbound group, standing in for the peer.
fn loopback(header: &[u8], payload: &[u8], out: &mut [u8]) -> (u8, u16, usize) {
    let mut keys = KeyRegistry::new(0x42);
    let encoded = encode(header, payload, &mut keys).unwrap();
    let mut engine =
        ReassemblyEngine::new(RoutingGroup::OUTBOUND, Duration::from_millis(300), 2048);

    let mut completed = None;
    for frame in FrameSegmenter::for_message(RoutingGroup::OUTBOUND, &encoded).frames() {
        if let ProcessResult::MessageComplete(raw) = engine.process_frame(&frame, Instant::from_millis(5)) {
            completed = Some(raw.to_vec());
        }
    }
    let raw = completed.expect("message did not complete");
    let decoded = decode(&raw, out, true).unwrap();
    (decoded.msg_type, decoded.tracker, decoded.payload.len())
}

#[test]
/// A 186-byte payload survives the full path.
fn test_large_payload_round_trip() {
    let payload: [u8; 186] = core::array::from_fn(|i| (i * 7) as u8);
    let mut header = [0u8; HEADER_LEN];
    header[0] = 0xAA;
    header[2..4].copy_from_slice(&186u16.to_le_bytes());
    header[4] = 0x13;
    header[16] = 0x00;
    header[17] = 0x01;

    let mut out = [0u8; 256];
    let (msg_type, tracker, len) = loopback(&header, &payload, &mut out);
    assert_eq!((msg_type, tracker, len), (0x13, 0x0001, 186));
    assert_eq!(&out[..186], &payload);
}

#[test]
/// Short messages whose frames split exactly on the CRC still complete.
fn test_boundary_lengths_round_trip() {
    for len in [0usize, 1, 4, 6, 12, 14, 20] {
        let payload: Vec<u8> = (0..len as u8).collect();
        let mut header = [0u8; HEADER_LEN];
        header[2..4].copy_from_slice(&(len as u16).to_le_bytes());
        header[4] = 0x5C;

        let mut out = [0u8; 64];
        let (_, _, got) = loopback(&header, &payload, &mut out);
        assert_eq!(got, len);
        assert_eq!(&out[..len], payload.as_slice());
    }
}

#[test]
/// The segmenter tags the frame sequence start, middle.., end.
fn test_roles_in_order() {
    let mut keys = KeyRegistry::new(0);
    let mut header = [0u8; HEADER_LEN];
    header[2] = 32;
    header[4] = 0x70;
    let encoded = encode(&header, &[0u8; 32], &mut keys).unwrap();
    let roles: Vec<FrameRole> = FrameSegmenter::for_message(RoutingGroup::OUTBOUND, &encoded)
        .frames()
        .map(|f| RoutingGroup::OUTBOUND.role_of(f.id).unwrap())
        .collect();
    // 18 + 32 + 2 = 52 bytes -> 7 frames.
    assert_eq!(roles.len(), 7);
    assert_eq!(roles[0], FrameRole::Start);
    assert!(roles[1..6].iter().all(|r| *r == FrameRole::Middle));
    assert_eq!(roles[6], FrameRole::End);
}
