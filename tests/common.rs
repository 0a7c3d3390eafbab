//! Test utilities & fixtures.
//! A recording in-memory transport and packet builders shared by the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use meshresponder::config::ResponderConfig;
use meshresponder::errors::TransportError;
use meshresponder::meshtastic::{MeshTransport, NodeIdentity, RadioConfig};
use meshresponder::responder::{Dispatcher, IncomingPacket, SignalValue, TelemetrySnapshot};

pub const OWN_NODE: u32 = 0x0000_beef;

/// Transport that records every send instead of touching a radio.
#[derive(Clone, Default)]
pub struct FakeTransport {
    pub sent: Arc<Mutex<Vec<(String, u32)>>>,
    pub closes: Arc<AtomicUsize>,
    pub fail_sends: bool,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_sends: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, u32)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl MeshTransport for FakeTransport {
    fn send_text(&mut self, text: &str, channel: u32) -> Result<(), TransportError> {
        if self.fail_sends {
            return Err(TransportError::Closed);
        }
        self.sent.lock().unwrap().push((text.to_string(), channel));
        Ok(())
    }

    fn own_node_identity(&self) -> Option<NodeIdentity> {
        Some(NodeIdentity {
            node_num: OWN_NODE,
            user_id: format!("!{:08x}", OWN_NODE),
        })
    }

    fn radio_config(&self) -> RadioConfig {
        RadioConfig {
            tx_power_dbm: Some(30),
            region: Some("EU_868".to_string()),
            spreading_factor: None,
            bandwidth_khz: None,
        }
    }

    fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn reference_snapshot() -> TelemetrySnapshot {
    TelemetrySnapshot::new(Some(30), Some("EU_868".to_string()), None, None)
}

/// A `hi` on channel 4 carrying the reference link figures.
pub fn reference_packet(from: u32, text: &str) -> IncomingPacket {
    let mut pkt = IncomingPacket::text(from, 4, text);
    pkt.from_id = Some(format!("!{:08x}", from));
    pkt.id = from ^ 0x5555;
    pkt.rx_rssi = Some(-85);
    pkt.rx_snr = Some(SignalValue::Number(7.25));
    pkt.hops_away = Some(2);
    pkt
}

pub fn dispatcher_on_channel(channel: u32) -> Dispatcher {
    let config = ResponderConfig {
        target_channel: channel,
        ..ResponderConfig::default()
    };
    Dispatcher::new(&config, Some(OWN_NODE), reference_snapshot())
}
