//! Inbound packet model handed from the transport to the pipeline.
//!
//! Every telemetry field is optional: the radio omits RSSI/SNR for locally
//! generated packets, older firmware never sets `hop_start`, and packets that
//! arrive through other bridges may carry values in unexpected shapes.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric port code for plain text messages.
pub const TEXT_MESSAGE_PORTNUM: i32 = 1;

/// Symbolic spellings of the text message port seen across protocol versions.
const TEXT_MESSAGE_NAMES: [&str; 3] = ["TEXT_MESSAGE_APP", "TEXT_MESSAGE", "PORTNUM_TEXT_MESSAGE"];

/// Payload classification attached to a decoded packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortTag {
    Numeric(i32),
    Named(String),
}

impl PortTag {
    pub fn is_text_message(&self) -> bool {
        match self {
            PortTag::Numeric(code) => *code == TEXT_MESSAGE_PORTNUM,
            PortTag::Named(name) => TEXT_MESSAGE_NAMES
                .iter()
                .any(|n| name.trim().eq_ignore_ascii_case(n)),
        }
    }
}

impl fmt::Display for PortTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortTag::Numeric(code) => write!(f, "{}", code),
            PortTag::Named(name) => f.write_str(name),
        }
    }
}

/// A telemetry reading that is normally numeric but may arrive as raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignalValue {
    Number(f64),
    Text(String),
}

impl From<f32> for SignalValue {
    fn from(v: f32) -> Self {
        SignalValue::Number(v as f64)
    }
}

impl From<f64> for SignalValue {
    fn from(v: f64) -> Self {
        SignalValue::Number(v)
    }
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalValue::Number(v) => write!(f, "{}", v),
            SignalValue::Text(s) => f.write_str(s),
        }
    }
}

/// Rate limit key for a sender. The logical id is preferred so the same radio
/// is not split across two table entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SenderKey {
    Logical(String),
    Numeric(u32),
}

impl fmt::Display for SenderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SenderKey::Logical(id) => f.write_str(id),
            SenderKey::Numeric(num) => write!(f, "{}", num),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingPacket {
    /// Sender node number
    pub from: u32,
    /// Sender user id (e.g. `!a1b2c3d4`) when the node database knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_id: Option<String>,
    pub to: u32,
    #[serde(default)]
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rx_time: Option<u32>,
    #[serde(default)]
    pub channel: u32,
    pub port: PortTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rx_rssi: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rx_snr: Option<SignalValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hops_away: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hop_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hop_start: Option<u32>,
    #[serde(default)]
    pub via_mqtt: bool,
}

impl IncomingPacket {
    /// A text packet on `channel` with no telemetry attached.
    pub fn text(from: u32, channel: u32, text: &str) -> Self {
        Self {
            from,
            from_id: None,
            to: u32::MAX,
            id: 0,
            rx_time: None,
            channel,
            port: PortTag::Numeric(TEXT_MESSAGE_PORTNUM),
            text: Some(text.to_string()),
            rx_rssi: None,
            rx_snr: None,
            hops_away: None,
            hop_limit: None,
            hop_start: None,
            via_mqtt: false,
        }
    }

    /// Identity used for rate limiting: logical id when present, node number otherwise.
    pub fn sender_key(&self) -> SenderKey {
        match self.from_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => SenderKey::Logical(id.to_string()),
            _ => SenderKey::Numeric(self.from),
        }
    }

    /// Exact representation of the packet used for duplicate detection.
    ///
    /// Every field participates, so a retransmission that differs only in
    /// metadata (hop limit, SNR, rx time) yields a different signature.
    pub fn signature(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}
