//! Bridge runner over a simulated bus: the PowerStream side sends heartbeats
//! and requests, the runner answers and keeps the transmit cycle going.

mod helpers {
    include!("helpers/mod.rs");
}

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use helpers::{heartbeat_frames, peer_frames, peer_message, MockCanBus, MockTimer, PeerListener};
use powerstream_can::protocol::messages::{
    HEARTBEAT_REPLY, LIMIT, SERIAL_ANNOUNCE, VERSION_INFO, VERSION_REQUEST, VOLTAGE_REPORT,
};
use powerstream_can::protocol::session::config::EngineConfig;
use powerstream_can::protocol::session::engine::ProtocolEngine;
use powerstream_can::protocol::session::runner::BridgeRunner;
use powerstream_can::protocol::session::shared::SharedEngine;
use powerstream_can::protocol::session::state::BridgeState;
use powerstream_can::protocol::transport::traits::bridge_clock::EmbassyClock;
use powerstream_can::protocol::transport::traits::can_bus::CanBus;
use static_cell::StaticCell;
use tokio::time::{timeout, Duration};

static ENGINE: StaticCell<SharedEngine<CriticalSectionRawMutex>> = StaticCell::new();
static QUIET_ENGINE: StaticCell<SharedEngine<CriticalSectionRawMutex>> = StaticCell::new();

async fn send_all(bus: &mut MockCanBus, frames: &[powerstream_can::protocol::transport::can_frame::CanFrame]) {
    for frame in frames {
        bus.send(frame).await.expect("host send");
    }
}

#[tokio::test]
async fn runner_answers_heartbeat_and_runs_cycle() {
    let engine: &'static SharedEngine<CriticalSectionRawMutex> = ENGINE.init(SharedEngine::new(ProtocolEngine::new(
        EngineConfig::default(),
        BridgeState::default(),
        0x20,
    )));

    let (dut_bus, mut host_bus) = MockCanBus::create_pair();
    let mut runner = BridgeRunner::<_, _, _, _>::new(engine, dut_bus, MockTimer, EmbassyClock);
    let runner_future = runner.drive();
    tokio::pin!(runner_future);

    tokio::select! {
        result = &mut runner_future => {
            panic!("runner ended unexpectedly: {:?}", result);
        }
        _ = async {
            let mut peer = PeerListener::new();
            send_all(&mut host_bus, &heartbeat_frames(0x66)).await;

            let reply = peer.next_message(&mut host_bus).await;
            assert_eq!((reply.msg_type, reply.key), (HEARTBEAT_REPLY, 0x66));

            let first = peer.next_message(&mut host_bus).await;
            assert_eq!((first.msg_type, first.key), (SERIAL_ANNOUNCE, 0x20));
            let second = peer.next_message(&mut host_bus).await;
            assert_eq!((second.msg_type, second.key), (VOLTAGE_REPORT, 0x21));

            send_all(&mut host_bus, &peer_frames(&peer_message(VERSION_REQUEST, 0x0105, 0x0D, &[0; 4]))).await;
            send_all(&mut host_bus, &peer_frames(&peer_message(LIMIT, 0x2033, 0x0E, &[12]))).await;

            let mut version = None;
            let mut limit_ack = None;
            while version.is_none() || limit_ack.is_none() {
                let msg = peer.next_message(&mut host_bus).await;
                match (msg.msg_type, msg.tracker) {
                    (VERSION_INFO, _) => version = Some(msg.key),
                    (LIMIT, 0x2033) => limit_ack = Some(msg.key),
                    _ => {}
                }
            }
            assert_eq!(version, Some(0x0D));
            assert_eq!(limit_ack, Some(0x0E));
            assert_eq!(engine.state().limits.lower, 12);
            assert!(engine.link_healthy());
        } => {}
    }
}

#[tokio::test]
async fn runner_stays_silent_without_heartbeat() {
    let engine: &'static SharedEngine<CriticalSectionRawMutex> = QUIET_ENGINE.init(SharedEngine::new(ProtocolEngine::new(
        EngineConfig::default(),
        BridgeState::default(),
        0,
    )));

    let (dut_bus, mut host_bus) = MockCanBus::create_pair();
    let mut runner = BridgeRunner::<_, _, _, _>::new(engine, dut_bus, MockTimer, EmbassyClock);
    let runner_future = runner.drive();
    tokio::pin!(runner_future);

    tokio::select! {
        result = &mut runner_future => {
            panic!("runner ended unexpectedly: {:?}", result);
        }
        _ = async {
            let silent = timeout(Duration::from_millis(50), host_bus.recv()).await;
            assert!(silent.is_err(), "bridge transmitted without a heartbeat");
            assert!(!engine.link_healthy());
        } => {}
    }
}
