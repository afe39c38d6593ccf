//! # Quickstart Example
//!
//! Minimal walk through powerstream-can:
//! - Build and serialize a payload record
//! - Encode a message and split it into CAN frames
//! - Feed a PowerStream heartbeat to the engine and watch it reply
//! - Run the transmit cycle for a few ticks
//!
//! This example uses `std` for a quick trial run.
//!
//! ```bash
//! cargo run --example quickstart
//! ```

use embassy_time::Instant;
use powerstream_can::infra::codec::crc::crc16;
use powerstream_can::infra::codec::traits::PayloadData;
use powerstream_can::protocol::messages::records::PackVoltage;
use powerstream_can::protocol::messages::templates::{
    HEADER_HEARTBEAT, HEADER_PACK_VOLTAGE, HEARTBEAT_PAYLOAD_LEN,
};
use powerstream_can::protocol::session::config::EngineConfig;
use powerstream_can::protocol::session::engine::ProtocolEngine;
use powerstream_can::protocol::session::state::BridgeState;
use powerstream_can::protocol::transport::can_frame::CanFrame;
use powerstream_can::protocol::transport::can_id::RoutingGroup;
use powerstream_can::protocol::transport::frame_codec::keys::KeyRegistry;
use powerstream_can::protocol::transport::frame_codec::{encode, FramingMode};
use powerstream_can::protocol::transport::segmented::builder::FrameSegmenter;
use powerstream_can::protocol::transport::traits::frame_sink::FrameBatch;

fn print_frame(frame: &CanFrame) {
    print!("   {:08X}#", frame.id.masked());
    for byte in frame.payload() {
        print!("{:02X}", byte);
    }
    println!();
}

fn main() {
    println!("=== powerstream-can Quickstart ===\n");

    // ======================================================================
    // 1. Serialize a payload record
    // ======================================================================
    println!("1. Building a pack voltage payload (0x5C)");

    let mut state = BridgeState::default();
    state.telemetry.pack_voltage_mv = 53_120;
    state.telemetry.set_serial("BMS0000000000001");

    let record = PackVoltage::from_state(&state);
    let mut payload = [0u8; 64];
    let len = match record.to_payload(&mut payload) {
        Ok(len) => len,
        Err(e) => {
            eprintln!("   Serialization error: {:?}", e);
            return;
        }
    };
    print!("   Payload: ");
    for byte in &payload[..len] {
        print!("{:02X} ", byte);
    }
    println!("\n");

    // ======================================================================
    // 2. Encode and segment
    // ======================================================================
    println!("2. Encoding with an ephemeral key and splitting into frames");

    let mut keys = KeyRegistry::new(0x40);
    match encode(&HEADER_PACK_VOLTAGE, &payload[..len], &mut keys) {
        Ok(encoded) => {
            println!("   Key: 0x{:02X}, CRC: 0x{:04X}", encoded.key, encoded.crc);
            for frame in FrameSegmenter::for_message(RoutingGroup::OUTBOUND, &encoded).frames() {
                print_frame(&frame);
            }
            println!();
        }
        Err(e) => eprintln!("   Encode error: {}\n", e),
    }

    // ======================================================================
    // 3. Receive a heartbeat
    // ======================================================================
    println!("3. Feeding a PowerStream heartbeat");

    let mut engine = ProtocolEngine::new(EngineConfig::default(), state, 0x40);
    let mut sink = FrameBatch::<64>::new();

    let peer_key = 0x29;
    let mut heartbeat = [0u8; HEARTBEAT_PAYLOAD_LEN];
    heartbeat[3..19].copy_from_slice(b"HW51ZEH4SF000001");
    let mut raw = HEADER_HEARTBEAT.to_vec();
    raw[6] = peer_key;
    raw.extend(heartbeat.iter().map(|b| b ^ peer_key));
    let crc = crc16(&raw);
    raw.extend_from_slice(&crc.to_le_bytes());

    for frame in FrameSegmenter::new(RoutingGroup::INBOUND, FramingMode::Plain, &raw).frames() {
        let outcome = engine.handle_frame(&frame, Instant::from_millis(0), &mut sink);
        if !matches!(
            outcome,
            powerstream_can::protocol::session::engine::FrameOutcome::Consumed
        ) {
            println!("   Outcome: {:?}", outcome);
        }
    }
    println!("   Peer serial: {:?}", engine.peer_serial());
    println!("   Link healthy: {}", engine.link_healthy());
    println!("   Reply frames: {}\n", sink.len());
    sink.clear();

    // ======================================================================
    // 4. Drive the transmit cycle
    // ======================================================================
    println!("4. Ticking the first 30 ms of the cycle");

    for ms in 0..30 {
        let report = engine.tick(Instant::from_millis(ms), &mut sink);
        if let Some((action, sent)) = report.fired {
            println!("   t={:>3} ms  {:?} sent={} frames={}", ms, action, sent, sink.len());
        }
        sink.clear();
    }

    let diag = engine.diagnostics();
    println!(
        "\n   Messages sent: {}, frames sent: {}",
        diag.messages_sent, diag.frames_sent
    );
    println!("\n=== Done ===");
}
