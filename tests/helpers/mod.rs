/// Test doubles simulating the CAN bus and timer, plus a PowerStream stand-in.
use powerstream_can::core::HEADER_LEN;
use powerstream_can::infra::codec::crc::crc16;
use powerstream_can::protocol::messages::templates::{HEADER_HEARTBEAT, HEARTBEAT_PAYLOAD_LEN};
use powerstream_can::protocol::transport::{
    can_frame::CanFrame,
    can_id::RoutingGroup,
    frame_codec::{decode, FramingMode},
    segmented::{
        assembler::{ProcessResult, ReassemblyEngine},
        builder::FrameSegmenter,
    },
    traits::{bridge_timer::BridgeTimer, can_bus::CanBus},
};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{sleep, Duration};

#[derive(Clone)]
#[allow(dead_code)]
/// In-memory CAN bus reproducing the `CanBus` trait behavior.
pub struct MockCanBus {
    tx: mpsc::UnboundedSender<CanFrame>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<CanFrame>>>,
}

#[allow(dead_code)]
impl MockCanBus {
    /// Construct a pair of interconnected buses (BMS ↔ PowerStream).
    pub fn create_pair() -> (Self, Self) {
        let (dut_tx, host_rx) = mpsc::unbounded_channel();
        let (host_tx, dut_rx) = mpsc::unbounded_channel();

        let dut_bus = Self {
            tx: dut_tx,
            rx: Arc::new(Mutex::new(dut_rx)),
        };

        let host_bus = Self {
            tx: host_tx,
            rx: Arc::new(Mutex::new(host_rx)),
        };

        (dut_bus, host_bus)
    }
}

impl CanBus for MockCanBus {
    type Error = ();

    async fn send<'a>(&'a mut self, frame: &'a CanFrame) -> Result<(), Self::Error> {
        self.tx.send(frame.clone()).map_err(|_| ())?;
        Ok(())
    }

    async fn recv(&mut self) -> Result<CanFrame, Self::Error> {
        let mut rx = self.rx.lock().await;
        rx.recv().await.ok_or(())
    }
}

#[allow(dead_code)]
/// Timer based on `tokio::time::sleep` to drive the tick in tests.
pub struct MockTimer;

impl BridgeTimer for MockTimer {
    async fn delay_ms(&mut self, millis: u32) {
        sleep(Duration::from_millis(millis as u64)).await;
    }
}

#[allow(dead_code)]
pub const PEER_SERIAL: &[u8; 16] = b"HW51ZEH4SF123456";

#[allow(dead_code)]
/// Peer message with its own key, as the PowerStream would put it on the wire.
pub fn peer_message(msg_type: u8, tracker: u16, key: u8, payload: &[u8]) -> Vec<u8> {
    let mut raw = HEADER_HEARTBEAT.to_vec();
    raw[2..4].copy_from_slice(&(payload.len() as u16).to_le_bytes());
    raw[4] = msg_type;
    raw[6] = key;
    raw[16..HEADER_LEN].copy_from_slice(&tracker.to_be_bytes());
    raw.extend(payload.iter().map(|b| b ^ key));
    let crc = crc16(&raw);
    raw.extend_from_slice(&crc.to_le_bytes());
    raw
}

#[allow(dead_code)]
pub fn peer_frames(raw: &[u8]) -> Vec<CanFrame> {
    FrameSegmenter::new(RoutingGroup::INBOUND, FramingMode::Plain, raw)
        .frames()
        .collect()
}

#[allow(dead_code)]
pub fn heartbeat_frames(key: u8) -> Vec<CanFrame> {
    let mut payload = [0u8; HEARTBEAT_PAYLOAD_LEN];
    payload[3..19].copy_from_slice(PEER_SERIAL);
    peer_frames(&peer_message(0xC4, 0x0302, key, &payload))
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
/// One message the bridge emitted, decoded.
pub struct Observed {
    pub msg_type: u8,
    pub tracker: u16,
    pub key: u8,
    pub payload: Vec<u8>,
}

#[allow(dead_code)]
/// PowerStream side receiver: reassembles what the bridge transmits.
pub struct PeerListener {
    assembler: ReassemblyEngine,
    out: Vec<u8>,
}

#[allow(dead_code)]
impl PeerListener {
    pub fn new() -> Self {
        Self {
            assembler: ReassemblyEngine::new(
                RoutingGroup::OUTBOUND,
                embassy_time::Duration::from_millis(300),
                2048,
            ),
            out: vec![0; 2048],
        }
    }

    /// Feed one bridge frame; returns the message it completed, if any.
    pub fn push(&mut self, frame: &CanFrame) -> Option<Observed> {
        let raw = match self.assembler.process_frame(frame, embassy_time::Instant::from_millis(0)) {
            ProcessResult::MessageComplete(raw) => raw.to_vec(),
            _ => return None,
        };
        self.assembler.release();
        let msg = decode(&raw, &mut self.out, true).expect("bridge emitted an undecodable message");
        Some(Observed {
            msg_type: msg.msg_type,
            tracker: msg.tracker,
            key: msg.key,
            payload: msg.payload.to_vec(),
        })
    }

    /// Receive from `bus` until one complete message arrives.
    pub async fn next_message(&mut self, bus: &mut MockCanBus) -> Observed {
        loop {
            let frame = bus.recv().await.expect("bus closed");
            if let Some(msg) = self.push(&frame) {
                return msg;
            }
        }
    }
}
