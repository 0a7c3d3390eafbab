//! Predicate chain deciding whether a packet deserves a reply.
//!
//! Predicates run in a fixed order and the first rejection wins:
//!
//! 1. self-origin (skipped while our own node number is unknown)
//! 2. text message port
//! 3. target channel
//! 4. exact trigger word
use std::fmt;

use super::packet::IncomingPacket;

/// The only phrase the responder reacts to.
pub const TRIGGER: &str = "hi";

/// Why a packet was dropped. Not an error; nothing is surfaced or counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSkip {
    SelfOrigin,
    NotText,
    WrongChannel,
    NoTrigger,
}

impl fmt::Display for FilterSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FilterSkip::SelfOrigin => "own packet",
            FilterSkip::NotText => "not a text message",
            FilterSkip::WrongChannel => "other channel",
            FilterSkip::NoTrigger => "no trigger",
        };
        f.write_str(s)
    }
}

/// Anchored, case-insensitive match of the trigger after trimming whitespace.
pub fn matches_trigger(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case(TRIGGER)
}

#[derive(Debug, Clone)]
pub struct MessageFilter {
    own_node: Option<u32>,
    target_channel: u32,
}

impl MessageFilter {
    pub fn new(own_node: Option<u32>, target_channel: u32) -> Self {
        Self {
            own_node,
            target_channel,
        }
    }

    pub fn is_self_origin(&self, packet: &IncomingPacket) -> bool {
        matches!(self.own_node, Some(own) if own == packet.from)
    }

    pub fn evaluate(&self, packet: &IncomingPacket) -> Result<(), FilterSkip> {
        if self.is_self_origin(packet) {
            return Err(FilterSkip::SelfOrigin);
        }
        if !packet.port.is_text_message() {
            return Err(FilterSkip::NotText);
        }
        if packet.channel != self.target_channel {
            return Err(FilterSkip::WrongChannel);
        }
        match packet.text.as_deref() {
            Some(text) if matches_trigger(text) => Ok(()),
            _ => Err(FilterSkip::NoTrigger),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responder::packet::PortTag;

    #[test]
    fn trigger_variants() {
        for ok in ["Hi", "HI", " hi ", "hi\t", "hI\r\n"] {
            assert!(matches_trigger(ok), "{:?} should match", ok);
        }
        for bad in ["Hi!", "hi there", "hihi", "", "h i", "oh hi"] {
            assert!(!matches_trigger(bad), "{:?} should not match", bad);
        }
    }

    #[test]
    fn chain_order_reports_first_failure() {
        let filter = MessageFilter::new(Some(42), 4);
        let mut p = IncomingPacket::text(42, 0, "nope");
        p.port = PortTag::Numeric(3);
        assert_eq!(filter.evaluate(&p), Err(FilterSkip::SelfOrigin));
        p.from = 7;
        assert_eq!(filter.evaluate(&p), Err(FilterSkip::NotText));
        p.port = PortTag::Named("TEXT_MESSAGE_APP".into());
        assert_eq!(filter.evaluate(&p), Err(FilterSkip::WrongChannel));
        p.channel = 4;
        assert_eq!(filter.evaluate(&p), Err(FilterSkip::NoTrigger));
        p.text = Some(" Hi ".into());
        assert_eq!(filter.evaluate(&p), Ok(()));
    }

    #[test]
    fn unknown_own_node_skips_self_check() {
        let filter = MessageFilter::new(None, 0);
        assert!(filter.evaluate(&IncomingPacket::text(0, 0, "hi")).is_ok());
    }

    #[test]
    fn missing_text_is_no_trigger() {
        let filter = MessageFilter::new(None, 0);
        let mut p = IncomingPacket::text(1, 0, "hi");
        p.text = None;
        assert_eq!(filter.evaluate(&p), Err(FilterSkip::NoTrigger));
    }
}
