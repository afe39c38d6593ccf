//! The protocol engine: reassembly, decode, per-type dispatch, immediate
//! replies and the scheduled transmit cycle, over one owned state.
//!
//! The engine never blocks and never reads a clock. Frame arrivals go through
//! [`ProtocolEngine::handle_frame`], the periodic timer calls
//! [`ProtocolEngine::tick`]; both take `now` and a [`FrameSink`] receiving
//! the frames to transmit. Serialising the two entry points is the caller's
//! job, see [`SharedEngine`](crate::protocol::session::shared::SharedEngine).
use crate::core::{MAX_RX_PAYLOAD, MAX_TX_PAYLOAD, SERIAL_LEN};
use crate::error::{DecodeError, LinkFault, ReassemblyFault, SendError};
use crate::protocol::messages::inbound::{heartbeat_serial, limit_value};
use crate::protocol::messages::outbound::{LimitTracker, Outbound};
use crate::protocol::messages::{
    HEARTBEAT, LIMIT, TRACKER_LOWER_LIMIT, TRACKER_UPPER_LIMIT, TRACKER_VERSION_DATE,
    TRACKER_VERSION_INFO, VERSION_REQUEST,
};
use crate::protocol::session::config::EngineConfig;
use crate::protocol::session::diagnostics::Diagnostics;
use crate::protocol::session::sequencer::TxSequencer;
use crate::protocol::session::state::BridgeState;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::{FrameRole, RoutingGroup};
use crate::protocol::transport::frame_codec::keys::KeyRegistry;
use crate::protocol::transport::frame_codec::{decode, encode, DecodedMessage};
use crate::protocol::transport::segmented::assembler::{ProcessResult, ReassemblyEngine};
use crate::protocol::transport::segmented::builder::FrameSegmenter;
use crate::protocol::transport::traits::frame_sink::FrameSink;
use embassy_time::Instant;

//==================================================================================OUTCOMES
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// What one inbound frame did to the engine.
pub enum FrameOutcome {
    /// Foreign channel, or no transfer active.
    Ignored,
    /// Buffered, message incomplete.
    Consumed,
    /// Transfer discarded (oversize, timeout, decode failure).
    Dropped(ReassemblyFault),
    /// A message was decoded and dispatched.
    Dispatched { msg_type: u8, tracker: u16 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// What one tick did.
pub struct TickReport {
    /// Stale transfer dropped by this tick.
    pub reassembly: Option<ReassemblyFault>,
    /// Heartbeat loss detected by this tick.
    pub link: Option<LinkFault>,
    /// Step fired by this tick and whether it went out.
    pub fired: Option<(Outbound, bool)>,
}

//==================================================================================SESSION
/// Everything dispatch and transmit touch, apart from the receive buffers.
struct Session {
    outbound: RoutingGroup,
    keys: KeyRegistry,
    state: BridgeState,
    sequencer: TxSequencer,
    peer_serial: Option<[u8; SERIAL_LEN]>,
    diagnostics: Diagnostics,
}

impl Session {
    /// Act on one decoded message. Replies go out before this returns.
    fn dispatch<S: FrameSink>(&mut self, msg: &DecodedMessage<'_>, now: Instant, sink: &mut S) {
        let _count = self.diagnostics.record_decoded(msg.msg_type, msg.tracker);
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "RX type={:#04x} len={} cnt={} key={:#04x} crc={:#06x} tracker={:#06x}",
            msg.msg_type,
            msg.payload.len(),
            _count,
            msg.key,
            msg.crc,
            msg.tracker
        );
        self.keys.learn(msg.msg_type, msg.tracker, msg.key);

        match (msg.msg_type, msg.tracker) {
            (HEARTBEAT, _) => {
                self.diagnostics.heartbeats = self.diagnostics.heartbeats.wrapping_add(1);
                self.peer_serial = heartbeat_serial(msg.payload);
                self.reply(Outbound::HeartbeatReply, sink);
                self.sequencer.on_heartbeat(now);
            }
            (VERSION_REQUEST, TRACKER_VERSION_INFO) => {
                self.reply(Outbound::VersionInfo, sink);
            }
            (VERSION_REQUEST, TRACKER_VERSION_DATE) => {
                self.reply(Outbound::VersionDate, sink);
            }
            (LIMIT, TRACKER_UPPER_LIMIT) => {
                if let Some(value) = limit_value(msg.payload) {
                    self.state.limits.upper = value;
                    #[cfg(feature = "defmt")]
                    defmt::info!("Upper charge limit {}", value);
                }
                self.reply(Outbound::Limit(LimitTracker::UpperAck), sink);
            }
            (LIMIT, TRACKER_LOWER_LIMIT) => {
                if let Some(value) = limit_value(msg.payload) {
                    self.state.limits.lower = value;
                    #[cfg(feature = "defmt")]
                    defmt::info!("Lower charge limit {}", value);
                }
                self.reply(Outbound::Limit(LimitTracker::LowerAck), sink);
            }
            _ => {
                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "RX type={:#04x} not handled, payload[..8]={:02x}",
                    msg.msg_type,
                    &msg.payload[..msg.payload.len().min(8)]
                );
            }
        }
    }

    /// Send `msg` if its class is enabled. Failures are counted and logged.
    fn reply<S: FrameSink>(&mut self, msg: Outbound, sink: &mut S) -> bool {
        if !self.state.tx.allows(msg.class()) {
            return false;
        }
        match self.transmit(msg, sink) {
            Ok(_) => true,
            Err(_err) => {
                self.diagnostics.send_failures = self.diagnostics.send_failures.wrapping_add(1);
                #[cfg(feature = "defmt")]
                defmt::warn!("TX {} failed: {}", msg, defmt::Debug2Format(&_err));
                false
            }
        }
    }

    /// Build, encode and emit `msg`. Stops at the first frame the sink
    /// refuses; frames already handed over are not recalled.
    fn transmit<S: FrameSink>(
        &mut self,
        msg: Outbound,
        sink: &mut S,
    ) -> Result<usize, SendError<S::Error>> {
        let mut payload = [0u8; MAX_TX_PAYLOAD];
        let len = msg
            .build_payload(&self.state, &mut payload)
            .map_err(SendError::Serialization)?;
        let encoded = encode(msg.header(), &payload[..len], &mut self.keys).map_err(SendError::Encode)?;

        let mut sent = 0;
        for frame in FrameSegmenter::for_message(self.outbound, &encoded).frames() {
            if self.state.tx.tx_logging {
                #[cfg(feature = "defmt")]
                defmt::info!("TX {:08X}#{:02X}", frame.id.masked(), frame.payload());
            }
            sink.send_frame(&frame).map_err(SendError::Sink)?;
            sent += 1;
            self.diagnostics.frames_sent = self.diagnostics.frames_sent.wrapping_add(1);
        }
        self.diagnostics.messages_sent = self.diagnostics.messages_sent.wrapping_add(1);
        Ok(sent)
    }
}

//==================================================================================ENGINE
pub struct ProtocolEngine {
    config: EngineConfig,
    assembler: ReassemblyEngine,
    scratch: [u8; MAX_RX_PAYLOAD],
    session: Session,
}

impl ProtocolEngine {
    /// `key_seed` starts the ephemeral key counter; feed it from a hardware RNG.
    pub fn new(config: EngineConfig, state: BridgeState, key_seed: u8) -> Self {
        Self {
            assembler: ReassemblyEngine::new(
                config.inbound,
                config.reassembly_timeout,
                config.max_payload,
            ),
            scratch: [0; MAX_RX_PAYLOAD],
            session: Session {
                outbound: config.outbound,
                keys: KeyRegistry::new(key_seed),
                state,
                sequencer: TxSequencer::new(config.heartbeat_loss_timeout),
                peer_serial: None,
                diagnostics: Diagnostics::default(),
            },
            config,
        }
    }

    //==================================================================================RECEIVE
    /// Feed one frame received at `now`. A completed message is decoded and
    /// dispatched, including any immediate reply into `sink`, before the
    /// receive buffer is released.
    pub fn handle_frame<S: FrameSink>(
        &mut self,
        frame: &CanFrame,
        now: Instant,
        sink: &mut S,
    ) -> FrameOutcome {
        let diag = &mut self.session.diagnostics;
        diag.frames_received = diag.frames_received.wrapping_add(1);
        if self.session.state.tx.rx_logging {
            #[cfg(feature = "defmt")]
            defmt::info!("RX {:08X}#{:02X}", frame.id.masked(), frame.payload());
        }
        if frame.extended && self.config.inbound.role_of(frame.id) == Some(FrameRole::Start) {
            diag.transfers_started = diag.transfers_started.wrapping_add(1);
        }

        let outcome = match self.assembler.process_frame(frame, now) {
            ProcessResult::Ignored => FrameOutcome::Ignored,
            ProcessResult::FragmentConsumed => FrameOutcome::Consumed,
            ProcessResult::Dropped(fault) => FrameOutcome::Dropped(fault),
            ProcessResult::MessageComplete(raw) => {
                match decode(raw, &mut self.scratch, self.config.verify_crc) {
                    Ok(msg) => {
                        self.session.dispatch(&msg, now, sink);
                        FrameOutcome::Dispatched {
                            msg_type: msg.msg_type,
                            tracker: msg.tracker,
                        }
                    }
                    Err(err) => {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("RX decode failed: {}", err);
                        FrameOutcome::Dropped(ReassemblyFault::Decode(err))
                    }
                }
            }
        };

        match outcome {
            FrameOutcome::Dispatched { .. } => self.assembler.release(),
            FrameOutcome::Dropped(ReassemblyFault::Decode(_)) => self.assembler.release(),
            _ => {}
        }
        self.record(outcome);
        outcome
    }

    fn record(&mut self, outcome: FrameOutcome) {
        let diag = &mut self.session.diagnostics;
        let counter = match outcome {
            FrameOutcome::Ignored => &mut diag.frames_ignored,
            FrameOutcome::Dropped(fault) => Self::fault_counter(diag, fault),
            FrameOutcome::Consumed | FrameOutcome::Dispatched { .. } => return,
        };
        *counter = counter.wrapping_add(1);
    }

    fn fault_counter(diag: &mut Diagnostics, fault: ReassemblyFault) -> &mut u32 {
        match fault {
            ReassemblyFault::OversizePayload { .. } => &mut diag.oversize_drops,
            ReassemblyFault::Timeout { .. } => &mut diag.reassembly_timeouts,
            ReassemblyFault::Decode(DecodeError::CrcMismatch { .. }) => &mut diag.crc_failures,
            ReassemblyFault::Decode(_) => &mut diag.decode_failures,
        }
    }

    //==================================================================================TICK
    /// Periodic work: expire a stale transfer, watch the heartbeat, and fire
    /// the due step of the transmit cycle. Run every
    /// [`TICK_PERIOD_MS`](crate::protocol::transport::TICK_PERIOD_MS).
    pub fn tick<S: FrameSink>(&mut self, now: Instant, sink: &mut S) -> TickReport {
        let mut report = TickReport::default();

        if let Some(fault) = self.assembler.poll_timeout(now) {
            let counter = Self::fault_counter(&mut self.session.diagnostics, fault);
            *counter = counter.wrapping_add(1);
            report.reassembly = Some(fault);
        }

        let session = &mut self.session;
        if let Some(fault) = session.sequencer.check_link(now) {
            session.diagnostics.heartbeat_losses = session.diagnostics.heartbeat_losses.wrapping_add(1);
            report.link = Some(fault);
        }

        if let Some(action) = session.sequencer.poll(now, session.state.tx.tx_enabled) {
            let sent = session.reply(action, sink);
            report.fired = Some((action, sent));
        }
        report
    }

    //==================================================================================DIRECT_SEND
    /// Send one message right away, outside the cycle. The class switches
    /// still apply; a disabled message returns `Ok(0)`.
    pub fn send<S: FrameSink>(
        &mut self,
        msg: Outbound,
        sink: &mut S,
    ) -> Result<usize, SendError<S::Error>> {
        if !self.session.state.tx.allows(msg.class()) {
            return Ok(0);
        }
        let result = self.session.transmit(msg, sink);
        if result.is_err() {
            let diag = &mut self.session.diagnostics;
            diag.send_failures = diag.send_failures.wrapping_add(1);
        }
        result
    }

    //==================================================================================OBSERVERS
    pub fn state(&self) -> &BridgeState {
        &self.session.state
    }

    /// Application side updates of telemetry and TX switches.
    pub fn state_mut(&mut self) -> &mut BridgeState {
        &mut self.session.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.session.diagnostics
    }

    pub fn keys(&self) -> &KeyRegistry {
        &self.session.keys
    }

    pub fn sequencer(&self) -> &TxSequencer {
        &self.session.sequencer
    }

    pub fn assembler(&self) -> &ReassemblyEngine {
        &self.assembler
    }

    /// `false` until the first heartbeat and after a heartbeat loss.
    pub fn link_healthy(&self) -> bool {
        self.session.sequencer.link_healthy()
    }

    /// Serial of the PowerStream from its last valid heartbeat.
    pub fn peer_serial(&self) -> Option<&str> {
        let serial = self.session.peer_serial.as_ref()?;
        core::str::from_utf8(serial).ok()
    }
}
