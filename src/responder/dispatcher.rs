//! Per-event pipeline orchestration.
//!
//! The [`Dispatcher`] owns all mutable responder state (seen cache, rate limit
//! table, counters) and is driven through `&mut self`, so each event runs the
//! whole check-then-update sequence without interleaving.
use log::{debug, info, trace, warn};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use super::dedup::Deduplicator;
use super::filter::{FilterSkip, MessageFilter};
use super::packet::IncomingPacket;
use super::rate_limit::RateLimiter;
use super::reply::ReplyComposer;
use super::telemetry::TelemetrySnapshot;
use crate::config::ResponderConfig;
use crate::logutil::escape_log;
use crate::meshtastic::MeshTransport;

/// How a single inbound event ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Duplicate,
    Skipped(FilterSkip),
    RateLimited,
    Replied(String),
    /// A stage or the transport failed; already logged.
    Failed(String),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    pub replies_sent: u64,
    pub send_failures: u64,
    pub faults: u64,
}

pub struct Dispatcher {
    dedup: Deduplicator,
    filter: MessageFilter,
    limiter: RateLimiter,
    composer: ReplyComposer,
    stats: DispatchStats,
}

impl Dispatcher {
    pub fn new(
        config: &ResponderConfig,
        own_node: Option<u32>,
        snapshot: TelemetrySnapshot,
    ) -> Self {
        Self {
            dedup: Deduplicator::new(config.dedup_cache_size),
            filter: MessageFilter::new(own_node, config.target_channel),
            limiter: RateLimiter::new(config.cooldown()),
            composer: ReplyComposer::new(snapshot),
            stats: DispatchStats::default(),
        }
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    pub fn tracked_senders(&self) -> usize {
        self.limiter.tracked_senders()
    }

    /// Run the full pipeline for one packet. Never panics and never returns an error.
    pub fn dispatch<T: MeshTransport + ?Sized>(
        &mut self,
        packet: &IncomingPacket,
        transport: &mut T,
        now: Instant,
    ) -> DispatchOutcome {
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.run_pipeline(packet, transport, now)));
        match result {
            Ok(outcome) => outcome,
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                self.stats.faults += 1;
                warn!(
                    "on_receive error: from={} ch={} id={}: {}",
                    packet.from, packet.channel, packet.id, reason
                );
                DispatchOutcome::Failed(reason)
            }
        }
    }

    fn run_pipeline<T: MeshTransport + ?Sized>(
        &mut self,
        packet: &IncomingPacket,
        transport: &mut T,
        now: Instant,
    ) -> DispatchOutcome {
        if !self.dedup.check_and_record(packet.signature()) {
            trace!("Duplicate delivery of packet id={} from={}", packet.id, packet.from);
            return DispatchOutcome::Duplicate;
        }

        if let Err(skip) = self.filter.evaluate(packet) {
            trace!("Dropped packet id={} from={}: {}", packet.id, packet.from, skip);
            return DispatchOutcome::Skipped(skip);
        }

        let sender = packet.sender_key();
        if !self.limiter.allow(&sender, now) {
            debug!("Rate limited reply to {}", sender);
            return DispatchOutcome::RateLimited;
        }

        let reply = self.composer.compose(packet);
        match transport.send_text(&reply, packet.channel) {
            Ok(()) => {
                self.stats.replies_sent += 1;
                info!("[auto-reply@ch{}] -> {}", packet.channel, escape_log(&reply));
                DispatchOutcome::Replied(reply)
            }
            Err(e) => {
                self.stats.send_failures += 1;
                warn!(
                    "on_receive error: reply to {} on ch{} not sent: {}",
                    sender, packet.channel, e
                );
                DispatchOutcome::Failed(e.to_string())
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic in pipeline".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TransportError;
    use crate::meshtastic::{NodeIdentity, RadioConfig};
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        sent: Vec<(String, u32)>,
        fail: bool,
    }

    impl MeshTransport for Recorder {
        fn send_text(&mut self, text: &str, channel: u32) -> Result<(), TransportError> {
            if self.fail {
                return Err(TransportError::Closed);
            }
            self.sent.push((text.to_string(), channel));
            Ok(())
        }
        fn own_node_identity(&self) -> Option<NodeIdentity> {
            None
        }
        fn radio_config(&self) -> RadioConfig {
            RadioConfig::default()
        }
        fn close(&mut self) {}
    }

    fn dispatcher() -> Dispatcher {
        let cfg = ResponderConfig {
            target_channel: 4,
            ..ResponderConfig::default()
        };
        Dispatcher::new(&cfg, Some(99), TelemetrySnapshot::default())
    }

    #[test]
    fn replies_once_then_dedups() {
        let mut d = dispatcher();
        let mut t = Recorder::default();
        let p = IncomingPacket::text(1, 4, "hi");
        let now = Instant::now();
        assert_eq!(
            d.dispatch(&p, &mut t, now),
            DispatchOutcome::Replied("Ch 4 | (dBi: not measurable)".into())
        );
        assert_eq!(d.dispatch(&p, &mut t, now + Duration::from_secs(60)), DispatchOutcome::Duplicate);
        assert_eq!(t.sent, vec![("Ch 4 | (dBi: not measurable)".to_string(), 4)]);
        assert_eq!(d.stats().replies_sent, 1);
    }

    #[test]
    fn send_failure_is_contained() {
        let mut d = dispatcher();
        let mut t = Recorder {
            fail: true,
            ..Default::default()
        };
        let outcome = d.dispatch(&IncomingPacket::text(1, 4, "hi"), &mut t, Instant::now());
        assert!(matches!(outcome, DispatchOutcome::Failed(_)));
        assert_eq!(d.stats().send_failures, 1);
        // rate limit was still stamped: no retry storm on a dead link
        assert_eq!(d.tracked_senders(), 1);
    }

    struct Exploding;

    impl MeshTransport for Exploding {
        fn send_text(&mut self, _text: &str, _channel: u32) -> Result<(), TransportError> {
            panic!("radio driver bug");
        }
        fn own_node_identity(&self) -> Option<NodeIdentity> {
            None
        }
        fn radio_config(&self) -> RadioConfig {
            RadioConfig::default()
        }
        fn close(&mut self) {}
    }

    #[test]
    fn panic_in_transport_is_isolated() {
        let mut d = dispatcher();
        let outcome = d.dispatch(&IncomingPacket::text(1, 4, "hi"), &mut Exploding, Instant::now());
        assert_eq!(outcome, DispatchOutcome::Failed("radio driver bug".into()));
        assert_eq!(d.stats().faults, 1);

        let mut t = Recorder::default();
        let outcome = d.dispatch(&IncomingPacket::text(2, 4, "hi"), &mut t, Instant::now());
        assert!(matches!(outcome, DispatchOutcome::Replied(_)));
    }

    #[test]
    fn self_origin_never_replies() {
        let mut d = dispatcher();
        let mut t = Recorder::default();
        let outcome = d.dispatch(&IncomingPacket::text(99, 4, "hi"), &mut t, Instant::now());
        assert_eq!(outcome, DispatchOutcome::Skipped(FilterSkip::SelfOrigin));
        assert!(t.sent.is_empty());
    }
}
