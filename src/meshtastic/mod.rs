//! # Meshtastic Device Communication Module
//!
//! Serial transport for a Meshtastic radio in PROTO mode.
//!
//! ## Architecture
//!
//! [`connect`] opens the port once and spawns two tasks that share it:
//!
//! - **Reader**: reassembles `0x94 0xC3` frames ([`framer`]), decodes
//!   `FromRadio` messages, keeps the link state (own node number, node id map,
//!   LoRa config) up to date and forwards decoded mesh packets as
//!   [`IncomingPacket`] events.
//! - **Writer**: requests the radio's config dump at startup, sends periodic
//!   heartbeats and transmits queued text with a minimum gap between sends.
//!
//! The caller gets a [`MeshtasticLink`] (the [`MeshTransport`] handle) and the
//! receiving end of the packet event channel.
//!
//! ```rust,no_run
//! # #[cfg(feature = "serial")]
//! # {
//! use meshresponder::meshtastic::{connect, MeshTransport, WriterTuning};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let (link, mut events) = connect("/dev/ttyUSB0", 115200, WriterTuning::default()).await?;
//!     link.wait_for_sync(Duration::from_secs(10)).await;
//!     println!("radio: {:?}", link.radio_config());
//!     while let Some(packet) = events.recv().await {
//!         println!("{:?}", packet.text);
//!     }
//!     Ok(())
//! }
//! # }
//! ```

pub mod framer;
pub mod radio;

use log::{debug, info, trace, warn};
use prost::Message;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration, Instant};

use crate::errors::TransportError;
use crate::logutil::escape_log;
use crate::protobuf::meshtastic_generated as proto;
use crate::responder::packet::{IncomingPacket, PortTag, SignalValue};

#[cfg(feature = "serial")]
use crate::logutil::hex_snippet;
#[cfg(feature = "serial")]
use serialport::SerialPort;
#[cfg(feature = "serial")]
use std::io::{Read, Write};

/// Destination used for channel broadcasts.
pub const BROADCAST_ADDR: u32 = 0xffff_ffff;
/// Hard lower bound on the gap between two text transmissions.
pub const MIN_SEND_GAP_FLOOR_MS: u64 = 2000;
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
const DEFAULT_HOP_LIMIT: u32 = 3;
/// How long [`MeshtasticLink::shutdown`] waits for each link task.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Own node as reported by the radio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeIdentity {
    pub node_num: u32,
    /// Logical id such as `!a1b2c3d4`.
    pub user_id: String,
}

/// Best-effort radio settings; any field may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RadioConfig {
    pub tx_power_dbm: Option<i32>,
    pub region: Option<String>,
    pub spreading_factor: Option<u32>,
    pub bandwidth_khz: Option<u32>,
}

/// What the responder needs from a radio connection.
pub trait MeshTransport {
    /// Queue `text` for broadcast on `channel`. Does not wait for airtime.
    fn send_text(&mut self, text: &str, channel: u32) -> Result<(), TransportError>;
    fn own_node_identity(&self) -> Option<NodeIdentity>;
    fn radio_config(&self) -> RadioConfig;
    /// Release the connection. Calling it again is a no-op.
    fn close(&mut self);
}

/// Writer tuning parameters, typically sourced from Config
#[derive(Debug, Clone)]
pub struct WriterTuning {
    /// Minimum gap between any text sends (ms). Enforced with a hard lower bound of 2000ms.
    pub min_send_gap_ms: u64,
}

impl Default for WriterTuning {
    fn default() -> Self {
        Self {
            min_send_gap_ms: MIN_SEND_GAP_FLOOR_MS,
        }
    }
}

impl WriterTuning {
    pub fn min_send_gap(&self) -> Duration {
        Duration::from_millis(self.min_send_gap_ms.max(MIN_SEND_GAP_FLOOR_MS))
    }
}

/// Control messages for coordinating between tasks
#[derive(Debug)]
pub enum ControlMessage {
    Shutdown,
}

/// Text queued for the writer task.
#[derive(Debug, Clone)]
pub struct OutgoingText {
    pub channel: u32,
    pub content: String,
}

fn fallback_user_id(num: u32) -> String {
    format!("!{:08x}", num)
}

/// Everything learned from the radio so far. Shared between the reader task
/// and the [`MeshtasticLink`] handle.
#[derive(Debug, Default)]
pub struct LinkState {
    own_node_num: Option<u32>,
    node_ids: HashMap<u32, String>,
    lora: Option<proto::config::LoRaConfig>,
    config_request_id: Option<u32>,
    config_complete: bool,
    binary_frames_seen: bool,
}

impl LinkState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_config_request_id(&mut self, id: u32) {
        self.config_request_id = Some(id);
        self.config_complete = false;
    }

    pub fn is_config_complete(&self) -> bool {
        self.config_complete
    }

    pub fn binary_detected(&self) -> bool {
        self.binary_frames_seen
    }

    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    pub fn own_node_num(&self) -> Option<u32> {
        self.own_node_num
    }

    pub fn own_identity(&self) -> Option<NodeIdentity> {
        self.own_node_num.map(|num| NodeIdentity {
            node_num: num,
            user_id: self.user_id(num),
        })
    }

    /// Logical id for a node number, `!%08x` when the radio never named it.
    pub fn user_id(&self, num: u32) -> String {
        self.node_ids
            .get(&num)
            .cloned()
            .unwrap_or_else(|| fallback_user_id(num))
    }

    pub fn radio_config(&self) -> RadioConfig {
        self.lora
            .as_ref()
            .map(radio::radio_config_from_lora)
            .unwrap_or_default()
    }

    fn remember_user(&mut self, num: u32, user: &proto::User) {
        let id = user.id.trim();
        if num != 0 && !id.is_empty() {
            self.node_ids.insert(num, id.to_string());
        }
    }

    /// Fold one decoded `FromRadio` into the state. Returns the mesh packet
    /// as an event when it should go to the responder.
    pub fn apply(&mut self, msg: proto::FromRadio) -> Option<IncomingPacket> {
        use proto::from_radio::PayloadVariant as FRPayload;
        use proto::mesh_packet::PayloadVariant as MPPayload;

        self.binary_frames_seen = true;
        match msg.payload_variant? {
            FRPayload::Packet(pkt) => {
                if let Some(MPPayload::Decoded(data)) = &pkt.payload_variant {
                    if data.portnum == proto::PortNum::NodeinfoApp as i32 {
                        if let Ok(user) = proto::User::decode(data.payload.as_slice()) {
                            debug!(
                                "NODEINFO from 0x{:08x}: id={} name={}",
                                pkt.from,
                                escape_log(&user.id),
                                escape_log(&user.long_name)
                            );
                            self.remember_user(pkt.from, &user);
                        }
                    }
                }
                packet_from_mesh(&pkt, &self.node_ids)
            }
            FRPayload::MyInfo(info) => {
                if info.my_node_num != 0 {
                    info!("Own node number: 0x{:08x}", info.my_node_num);
                    self.own_node_num = Some(info.my_node_num);
                }
                None
            }
            FRPayload::NodeInfo(node) => {
                if let Some(user) = &node.user {
                    self.remember_user(node.num, user);
                }
                trace!("NodeInfo 0x{:08x} ({} known)", node.num, self.node_ids.len());
                None
            }
            FRPayload::Config(cfg) => {
                if let Some(proto::config::PayloadVariant::Lora(lora)) = cfg.payload_variant {
                    debug!(
                        "LoRa config: preset={} region={} tx_power={}",
                        lora.modem_preset, lora.region, lora.tx_power
                    );
                    self.lora = Some(lora);
                }
                None
            }
            FRPayload::ConfigCompleteId(id) => {
                if self.config_request_id == Some(id) {
                    info!("Radio config sync complete (id=0x{:08x})", id);
                    self.config_complete = true;
                } else {
                    debug!("Ignoring config_complete_id 0x{:08x} for another request", id);
                }
                None
            }
            FRPayload::LogRecord(rec) => {
                debug!("Radio log [{}]: {}", rec.source, escape_log(&rec.message));
                None
            }
            FRPayload::Rebooted(_) => {
                warn!("Radio reports a reboot");
                None
            }
        }
    }
}

/// Convert a decoded mesh packet into a responder event.
///
/// Proto3 zero values are read as "not reported". Encrypted packets the radio
/// could not decode are not forwarded.
pub fn packet_from_mesh(
    pkt: &proto::MeshPacket,
    node_ids: &HashMap<u32, String>,
) -> Option<IncomingPacket> {
    use proto::mesh_packet::PayloadVariant as MPPayload;

    let data = match &pkt.payload_variant {
        Some(MPPayload::Decoded(data)) => data,
        _ => return None,
    };

    let text = if data.portnum == proto::PortNum::TextMessageApp as i32 {
        std::str::from_utf8(&data.payload).ok().map(str::to_string)
    } else {
        None
    };
    let hops_away = (pkt.hop_start != 0).then(|| pkt.hop_start.saturating_sub(pkt.hop_limit));

    Some(IncomingPacket {
        from: pkt.from,
        from_id: Some(
            node_ids
                .get(&pkt.from)
                .cloned()
                .unwrap_or_else(|| fallback_user_id(pkt.from)),
        ),
        to: pkt.to,
        id: pkt.id,
        rx_time: (pkt.rx_time != 0).then_some(pkt.rx_time),
        channel: pkt.channel,
        port: PortTag::Numeric(data.portnum),
        text,
        rx_rssi: (pkt.rx_rssi != 0).then_some(pkt.rx_rssi),
        rx_snr: (pkt.rx_snr != 0.0).then(|| SignalValue::from(pkt.rx_snr)),
        hops_away,
        hop_limit: (pkt.hop_limit != 0).then_some(pkt.hop_limit),
        hop_start: (pkt.hop_start != 0).then_some(pkt.hop_start),
        via_mqtt: pkt.via_mqtt,
    })
}

fn lock_state(state: &Mutex<LinkState>) -> MutexGuard<'_, LinkState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

fn encode_toradio(msg: &proto::ToRadio) -> Result<Vec<u8>, TransportError> {
    let mut payload = Vec::with_capacity(msg.encoded_len());
    msg.encode(&mut payload)?;
    framer::encode_frame(&payload).ok_or_else(|| {
        TransportError::Encode(format!(
            "payload of {} bytes exceeds {} byte frame limit",
            payload.len(),
            framer::MAX_PAYLOAD
        ))
    })
}

fn text_toradio(from: u32, channel: u32, text: &str) -> proto::ToRadio {
    use proto::mesh_packet::PayloadVariant as MPPayload;
    use proto::to_radio::PayloadVariant as TRPayload;

    let data = proto::Data {
        portnum: proto::PortNum::TextMessageApp as i32,
        payload: text.as_bytes().to_vec(),
        ..Default::default()
    };
    let pkt = proto::MeshPacket {
        from,
        to: BROADCAST_ADDR,
        channel,
        payload_variant: Some(MPPayload::Decoded(data)),
        id: rand::random(),
        hop_limit: DEFAULT_HOP_LIMIT,
        want_ack: false,
        ..Default::default()
    };
    proto::ToRadio {
        payload_variant: Some(TRPayload::Packet(pkt)),
    }
}

/// Handle to a running serial link.
pub struct MeshtasticLink {
    state: Arc<Mutex<LinkState>>,
    outgoing_tx: mpsc::UnboundedSender<OutgoingText>,
    control_txs: Vec<mpsc::UnboundedSender<ControlMessage>>,
    tasks: Vec<JoinHandle<()>>,
    closed: bool,
}

impl MeshtasticLink {
    fn new(
        state: Arc<Mutex<LinkState>>,
        outgoing_tx: mpsc::UnboundedSender<OutgoingText>,
        control_txs: Vec<mpsc::UnboundedSender<ControlMessage>>,
        tasks: Vec<JoinHandle<()>>,
    ) -> Self {
        Self {
            state,
            outgoing_tx,
            control_txs,
            tasks,
            closed: false,
        }
    }

    /// Wait until the radio finished its config dump, or `timeout` elapses.
    /// Returns whether the sync completed.
    pub async fn wait_for_sync(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if lock_state(&self.state).is_config_complete() {
                return true;
            }
            if Instant::now() >= deadline {
                let state = lock_state(&self.state);
                warn!(
                    "Radio config sync not complete after {}s (binary_frames_seen={}, nodes={}); continuing with partial telemetry",
                    timeout.as_secs(),
                    state.binary_detected(),
                    state.node_count()
                );
                return false;
            }
            sleep(Duration::from_millis(100)).await;
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close the link and wait for the reader and writer to finish, so the
    /// disconnect notice reaches the radio before the port is released.
    /// Tasks still running after [`SHUTDOWN_GRACE`] are aborted.
    pub async fn shutdown(&mut self) {
        self.close();
        for handle in self.tasks.drain(..) {
            let abort = handle.abort_handle();
            match tokio::time::timeout(SHUTDOWN_GRACE, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Link task ended abnormally: {}", e),
                Err(_) => {
                    warn!(
                        "Link task still running after {}ms; aborting",
                        SHUTDOWN_GRACE.as_millis()
                    );
                    abort.abort();
                }
            }
        }
        debug!("Meshtastic link shut down");
    }
}

impl MeshTransport for MeshtasticLink {
    fn send_text(&mut self, text: &str, channel: u32) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        self.outgoing_tx
            .send(OutgoingText {
                channel,
                content: text.to_string(),
            })
            .map_err(|_| TransportError::Closed)
    }

    fn own_node_identity(&self) -> Option<NodeIdentity> {
        lock_state(&self.state).own_identity()
    }

    fn radio_config(&self) -> RadioConfig {
        lock_state(&self.state).radio_config()
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        for tx in &self.control_txs {
            let _ = tx.send(ControlMessage::Shutdown);
        }
        debug!("Meshtastic link closed ({} tasks signalled)", self.tasks.len());
    }
}

#[cfg(feature = "serial")]
type SharedPort = Arc<Mutex<Box<dyn SerialPort>>>;

/// Create a shared serial port connection for both reader and writer
#[cfg(feature = "serial")]
async fn create_shared_serial_port(
    port_name: &str,
    baud_rate: u32,
) -> Result<SharedPort, TransportError> {
    debug!(
        "Opening shared serial port {} at {} baud",
        port_name, baud_rate
    );

    let mut builder = serialport::new(port_name, baud_rate).timeout(Duration::from_millis(100));
    #[cfg(unix)]
    {
        builder = builder
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None);
    }
    let mut port = builder.open().map_err(|e| TransportError::Open {
        port: port_name.to_string(),
        reason: e.to_string(),
    })?;

    // Toggle DTR/RTS to reset/ensure device wakes
    let _ = port.write_data_terminal_ready(true);
    let _ = port.write_request_to_send(true);
    sleep(Duration::from_millis(150)).await;

    // Drop buffered boot console text
    let _ = port.clear(serialport::ClearBuffer::Input);

    debug!("Shared serial port initialized successfully");
    Ok(Arc::new(Mutex::new(port)))
}

/// Byte sink the writer task sends complete frames to.
pub trait FrameSink: Send + 'static {
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), TransportError>;
}

#[cfg(feature = "serial")]
impl FrameSink for SharedPort {
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        let mut port = self.lock().unwrap_or_else(|e| e.into_inner());
        port.write_all(frame)?;
        port.flush()?;
        Ok(())
    }
}

/// Reader task: serial bytes in, link state and packet events out.
#[cfg(feature = "serial")]
pub struct MeshtasticReader {
    port: SharedPort,
    framer: framer::StreamFramer,
    state: Arc<Mutex<LinkState>>,
    events_tx: mpsc::UnboundedSender<IncomingPacket>,
    control_rx: mpsc::UnboundedReceiver<ControlMessage>,
}

#[cfg(feature = "serial")]
impl MeshtasticReader {
    /// Run the continuous reading task
    pub async fn run(mut self) {
        info!("Starting Meshtastic reader task");
        let mut interval = tokio::time::interval(Duration::from_millis(10));

        loop {
            tokio::select! {
                control_msg = self.control_rx.recv() => {
                    match control_msg {
                        Some(ControlMessage::Shutdown) => {
                            info!("Reader task received shutdown signal");
                            break;
                        }
                        None => {
                            warn!("Control channel closed, shutting down reader");
                            break;
                        }
                    }
                }
                _ = interval.tick() => {
                    match self.read_and_process().await {
                        Ok(true) => {}
                        Ok(false) => {
                            warn!("Packet consumer gone, shutting down reader");
                            break;
                        }
                        Err(e) => {
                            warn!("Serial read error (continuing): {}", e);
                            sleep(Duration::from_millis(100)).await;
                        }
                    }
                }
            }
        }

        info!("Meshtastic reader task shutting down");
    }

    /// Returns `Ok(false)` once nobody is listening for packet events.
    async fn read_and_process(&mut self) -> Result<bool, TransportError> {
        let mut buffer = [0u8; 1024];
        let read_result = {
            let mut port = self.port.lock().unwrap_or_else(|e| e.into_inner());
            port.read(&mut buffer)
        };

        match read_result {
            Ok(0) => return Ok(true),
            Ok(n) => {
                trace!("RAW {} bytes: {}", n, hex_snippet(&buffer[..n], 64));
                self.framer.push(&buffer[..n]);
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::TimedOut => return Ok(true),
            Err(e) => return Err(e.into()),
        }

        while let Some(frame) = self.framer.next_frame() {
            let msg = match proto::FromRadio::decode(frame.as_slice()) {
                Ok(msg) => msg,
                Err(e) => {
                    debug!("Undecodable FromRadio frame ({} bytes): {}", frame.len(), e);
                    continue;
                }
            };
            let event = lock_state(&self.state).apply(msg);
            if let Some(packet) = event {
                trace!(
                    "Packet id={} from=0x{:08x} ch={} port={}",
                    packet.id,
                    packet.from,
                    packet.channel,
                    packet.port
                );
                if self.events_tx.send(packet).is_err() {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}

/// Writer task: config request, heartbeats and paced text sends.
pub struct MeshtasticWriter<S: FrameSink> {
    sink: S,
    state: Arc<Mutex<LinkState>>,
    outgoing_rx: mpsc::UnboundedReceiver<OutgoingText>,
    control_rx: mpsc::UnboundedReceiver<ControlMessage>,
    tuning: WriterTuning,
    last_text_send: Option<Instant>,
}

impl<S: FrameSink> MeshtasticWriter<S> {
    pub fn new(
        sink: S,
        state: Arc<Mutex<LinkState>>,
        outgoing_rx: mpsc::UnboundedReceiver<OutgoingText>,
        control_rx: mpsc::UnboundedReceiver<ControlMessage>,
        tuning: WriterTuning,
    ) -> Self {
        Self {
            sink,
            state,
            outgoing_rx,
            control_rx,
            tuning,
            last_text_send: None,
        }
    }

    pub async fn run(mut self) {
        info!("Starting Meshtastic writer task");

        // Single WantConfigId at startup; the reader marks completion
        let mut id: u32 = rand::random();
        if id == 0 {
            id = 1;
        }
        lock_state(&self.state).set_config_request_id(id);
        info!(
            "Requesting initial config from radio (want_config_id=0x{:08x})",
            id
        );
        if let Err(e) = self.send_want_config(id) {
            warn!("Initial config request failed: {}", e);
        }

        let mut heartbeat_interval = tokio::time::interval(HEARTBEAT_INTERVAL);
        heartbeat_interval.tick().await;

        loop {
            tokio::select! {
                msg = self.outgoing_rx.recv() => {
                    match msg {
                        Some(outgoing) => {
                            if let Err(e) = self.send_text(&outgoing).await {
                                warn!("Failed to send text on ch{}: {}", outgoing.channel, e);
                            }
                        }
                        None => {
                            debug!("Outgoing queue closed, shutting down writer");
                            break;
                        }
                    }
                }
                control_msg = self.control_rx.recv() => {
                    match control_msg {
                        Some(ControlMessage::Shutdown) | None => {
                            info!("Writer task received shutdown signal");
                            self.discard_queued();
                            self.send_disconnect();
                            break;
                        }
                    }
                }
                _ = heartbeat_interval.tick() => {
                    if let Err(e) = self.send_heartbeat() {
                        warn!("Heartbeat failed: {}", e);
                    }
                }
            }
        }

        info!("Meshtastic writer task shutting down");
    }

    async fn send_text(&mut self, msg: &OutgoingText) -> Result<(), TransportError> {
        self.enforce_min_send_gap(self.tuning.min_send_gap()).await;

        let from = lock_state(&self.state).own_node_num().unwrap_or(0);
        let frame = encode_toradio(&text_toradio(from, msg.channel, &msg.content))?;
        self.sink.write_frame(&frame)?;
        self.last_text_send = Some(Instant::now());
        debug!(
            "Sent text on ch{} ({} bytes): {}",
            msg.channel,
            msg.content.len(),
            escape_log(&msg.content)
        );
        Ok(())
    }

    /// Ensure at least `min_gap` has elapsed since the last text packet send
    async fn enforce_min_send_gap(&mut self, min_gap: Duration) {
        if let Some(last) = self.last_text_send {
            let elapsed = last.elapsed();
            if elapsed < min_gap {
                let wait = min_gap - elapsed;
                debug!(
                    "Gating: waiting {}ms to respect minimum {}ms between text sends",
                    wait.as_millis(),
                    min_gap.as_millis()
                );
                sleep(wait).await;
            }
        }
    }

    fn send_want_config(&mut self, request_id: u32) -> Result<(), TransportError> {
        use proto::to_radio::PayloadVariant;
        self.send_toradio(&proto::ToRadio {
            payload_variant: Some(PayloadVariant::WantConfigId(request_id)),
        })
    }

    fn send_heartbeat(&mut self) -> Result<(), TransportError> {
        use proto::to_radio::PayloadVariant;
        let nonce = (std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis()
            & 0xffff) as u32;
        trace!("Heartbeat nonce={}", nonce);
        self.send_toradio(&proto::ToRadio {
            payload_variant: Some(PayloadVariant::Heartbeat(proto::Heartbeat { nonce })),
        })
    }

    fn discard_queued(&mut self) {
        let mut dropped = 0usize;
        while let Ok(msg) = self.outgoing_rx.try_recv() {
            dropped += 1;
            debug!("Dropping queued text on ch{}: {}", msg.channel, escape_log(&msg.content));
        }
        if dropped > 0 {
            warn!("Shutdown discarded {} queued text message(s)", dropped);
        }
    }

    fn send_disconnect(&mut self) {
        use proto::to_radio::PayloadVariant;
        if let Err(e) = self.send_toradio(&proto::ToRadio {
            payload_variant: Some(PayloadVariant::Disconnect(true)),
        }) {
            debug!("Disconnect notice not sent: {}", e);
        }
    }

    fn send_toradio(&mut self, msg: &proto::ToRadio) -> Result<(), TransportError> {
        let frame = encode_toradio(msg)?;
        self.sink.write_frame(&frame)?;
        debug!("Sent ToRadio frame ({} bytes)", frame.len());
        Ok(())
    }
}

/// Open the serial port and start the reader/writer tasks.
///
/// Must be called from within a tokio runtime.
#[cfg(feature = "serial")]
pub async fn connect(
    port_name: &str,
    baud_rate: u32,
    tuning: WriterTuning,
) -> Result<(MeshtasticLink, mpsc::UnboundedReceiver<IncomingPacket>), TransportError> {
    let shared_port = create_shared_serial_port(port_name, baud_rate).await?;
    let state = Arc::new(Mutex::new(LinkState::new()));

    let (events_tx, events_rx) = mpsc::unbounded_channel::<IncomingPacket>();
    let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel::<OutgoingText>();
    let (reader_control_tx, reader_control_rx) = mpsc::unbounded_channel::<ControlMessage>();
    let (writer_control_tx, writer_control_rx) = mpsc::unbounded_channel::<ControlMessage>();

    let reader = MeshtasticReader {
        port: shared_port.clone(),
        framer: framer::StreamFramer::new(),
        state: state.clone(),
        events_tx,
        control_rx: reader_control_rx,
    };
    let writer = MeshtasticWriter::new(
        shared_port,
        state.clone(),
        outgoing_rx,
        writer_control_rx,
        tuning,
    );

    let tasks = vec![tokio::spawn(reader.run()), tokio::spawn(writer.run())];
    info!("Meshtastic link up on {} ({} baud)", port_name, baud_rate);

    Ok((
        MeshtasticLink::new(
            state,
            outgoing_tx,
            vec![reader_control_tx, writer_control_tx],
            tasks,
        ),
        events_rx,
    ))
}

#[cfg(not(feature = "serial"))]
pub async fn connect(
    port_name: &str,
    _baud_rate: u32,
    _tuning: WriterTuning,
) -> Result<(MeshtasticLink, mpsc::UnboundedReceiver<IncomingPacket>), TransportError> {
    warn!("Cannot open {}: built without the `serial` feature", port_name);
    Err(TransportError::NotCompiled)
}
