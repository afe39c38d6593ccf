//! Protocol engine scenarios driven by hand-fed time: a full transmit cycle,
//! recovery after a dropped transfer, and what the peer sees on the wire.

mod helpers {
    include!("helpers/mod.rs");
}

use embassy_time::Instant;
use helpers::{heartbeat_frames, peer_frames, peer_message, PeerListener, PEER_SERIAL};
use powerstream_can::protocol::messages::outbound::Outbound;
use powerstream_can::protocol::messages::{BATTERY_STATUS, HEARTBEAT, HEARTBEAT_REPLY, LIMIT, SERIAL_ANNOUNCE};
use powerstream_can::protocol::session::config::EngineConfig;
use powerstream_can::protocol::session::engine::{FrameOutcome, ProtocolEngine};
use powerstream_can::protocol::session::sequencer::STEP_TABLE;
use powerstream_can::protocol::session::shared::SharedEngine;
use powerstream_can::protocol::session::state::BridgeState;
use powerstream_can::protocol::transport::traits::frame_sink::FrameBatch;

fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

fn feed(engine: &mut ProtocolEngine, frames: &[powerstream_can::protocol::transport::can_frame::CanFrame], now: Instant, sink: &mut FrameBatch<64>) -> FrameOutcome {
    let mut last = FrameOutcome::Ignored;
    for frame in frames {
        last = engine.handle_frame(frame, now, sink);
    }
    last
}

#[test]
/// A 1 ms tick reproduces the step table at its cumulative offsets, twice over.
fn test_cycle_follows_step_table() {
    let mut engine = ProtocolEngine::new(EngineConfig::default(), BridgeState::default(), 0);
    let mut sink = FrameBatch::<64>::new();
    feed(&mut engine, &heartbeat_frames(0x31), at(0), &mut sink);
    sink.clear();

    let mut fired: Vec<(u64, Outbound)> = Vec::new();
    for ms in 0..1_290u64 {
        if ms % 400 == 0 {
            feed(&mut engine, &heartbeat_frames(0x31), at(ms), &mut sink);
        }
        if let Some((action, sent)) = engine.tick(at(ms), &mut sink).fired {
            assert!(sent);
            fired.push((ms, action));
        }
        sink.clear();
    }

    let mut expected = Vec::new();
    let mut offset = 0u64;
    for _ in 0..2 {
        for step in STEP_TABLE.iter() {
            expected.push((offset, step.action));
            offset += step.gap_ms as u64;
        }
    }
    assert_eq!(offset, 1_290);
    assert_eq!(fired, expected);
    assert!(engine.link_healthy());
}

#[test]
/// Every emitted message decodes on the peer side; replies reuse the peer key
/// and scheduled messages draw consecutive ephemeral keys.
fn test_wire_view_of_a_session() {
    let mut engine = ProtocolEngine::new(EngineConfig::default(), BridgeState::default(), 0xFE);
    let mut sink = FrameBatch::<64>::new();
    let mut peer = PeerListener::new();
    let mut seen = Vec::new();

    feed(&mut engine, &heartbeat_frames(0x5A), at(0), &mut sink);
    for ms in 0..=26 {
        engine.tick(at(ms), &mut sink);
        for frame in sink.frames() {
            seen.extend(peer.push(frame));
        }
        sink.clear();
    }

    // Reply, serial announce at 0, then the first voltage report at 25 and the
    // next one at 26.
    assert_eq!(seen.len(), 4);
    assert_eq!((seen[0].msg_type, seen[0].key), (HEARTBEAT_REPLY, 0x5A));
    assert_eq!((seen[1].msg_type, seen[1].key), (SERIAL_ANNOUNCE, 0xFE));
    assert_eq!(seen[2].key, 0xFF);
    assert_eq!(seen[3].key, 0x00);
    assert_eq!(seen[2].tracker, 0x0307);
}

#[test]
/// A transfer abandoned mid-way leaves nothing behind for the next one.
fn test_recovery_after_abandoned_transfer() {
    let mut engine = ProtocolEngine::new(EngineConfig::default(), BridgeState::default(), 0);
    let mut sink = FrameBatch::<64>::new();
    let frames = heartbeat_frames(0x01);

    // Start and middle only, then silence.
    feed(&mut engine, &frames[..2], at(0), &mut sink);
    assert_eq!(engine.assembler().buffered(), 16);
    assert!(!engine.link_healthy());
    assert!(engine.tick(at(301), &mut sink).reassembly.is_some());

    // A late end frame is not stitched onto anything.
    assert_eq!(
        feed(&mut engine, &frames[frames.len() - 1..], at(302), &mut sink),
        FrameOutcome::Ignored
    );

    let outcome = feed(&mut engine, &frames, at(400), &mut sink);
    assert_eq!(
        outcome,
        FrameOutcome::Dispatched {
            msg_type: HEARTBEAT,
            tracker: 0x0302
        }
    );
    assert_eq!(engine.peer_serial(), core::str::from_utf8(PEER_SERIAL).ok());
}

#[test]
/// A new start frame discards the transfer in progress.
fn test_start_frame_restarts_transfer() {
    let mut engine = ProtocolEngine::new(EngineConfig::default(), BridgeState::default(), 0);
    let mut sink = FrameBatch::<64>::new();
    let limit = peer_frames(&peer_message(LIMIT, 0x2031, 0x44, &[80]));

    feed(&mut engine, &heartbeat_frames(0x01)[..3], at(0), &mut sink);
    let outcome = feed(&mut engine, &limit, at(5), &mut sink);
    assert_eq!(
        outcome,
        FrameOutcome::Dispatched {
            msg_type: LIMIT,
            tracker: 0x2031
        }
    );
    assert_eq!(engine.state().limits.upper, 80);
    assert_eq!(engine.diagnostics().transfers_started, 2);
}

#[test]
/// Cell extremes land as little-endian millivolts at offsets 39 and 41.
fn test_battery_status_cell_extremes() {
    let mut state = BridgeState::default();
    let volts = [3.25f32, 3.375, 3.0, 3.5, 3.125];
    for (i, cell) in state.telemetry.cell_voltages.iter_mut().enumerate() {
        *cell = volts[i % volts.len()];
    }
    let shared: SharedEngine = SharedEngine::new(ProtocolEngine::new(EngineConfig::default(), state, 0));
    let mut sink = FrameBatch::<64>::new();
    assert_eq!(shared.send(Outbound::BatteryStatus, &mut sink).unwrap(), 26);

    let mut peer = PeerListener::new();
    let msg = sink
        .frames()
        .iter()
        .find_map(|frame| peer.push(frame))
        .expect("battery status must complete");
    assert_eq!(msg.msg_type, BATTERY_STATUS);
    assert_eq!(&msg.payload[39..41], &3500u16.to_le_bytes());
    assert_eq!(&msg.payload[41..43], &3000u16.to_le_bytes());
    assert_eq!(shared.diagnostics().frames_sent, 26);
}

#[test]
/// State written through the shared handle reaches the next payload.
fn test_shared_state_update() {
    let shared: SharedEngine = SharedEngine::new(ProtocolEngine::new(
        EngineConfig::default(),
        BridgeState::default(),
        0,
    ));
    shared.update_state(|state| state.telemetry.set_serial("BMS0000000000042"));
    assert_eq!(&shared.state().telemetry.serial, b"BMS0000000000042");

    let mut sink = FrameBatch::<64>::new();
    shared.send(Outbound::SerialAnnounce, &mut sink).unwrap();
    let mut peer = PeerListener::new();
    let msg = sink.frames().iter().find_map(|f| peer.push(f)).unwrap();
    assert_eq!(&msg.payload[1..17], b"BMS0000000000042");
    assert!(!shared.link_healthy());
}
