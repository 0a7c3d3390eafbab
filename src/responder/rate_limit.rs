//! Per-sender reply cooldown.
use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::packet::SenderKey;

pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(10);

/// Remembers when each sender last got a reply.
///
/// Entries are never pruned; the table grows with the number of distinct
/// senders over the life of the process.
#[derive(Debug)]
pub struct RateLimiter {
    last_reply: HashMap<SenderKey, Instant>,
    cooldown: Duration,
}

impl RateLimiter {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            last_reply: HashMap::new(),
            cooldown,
        }
    }

    /// Allow a reply to `sender` at `now`, stamping the table when allowed.
    pub fn allow(&mut self, sender: &SenderKey, now: Instant) -> bool {
        match self.last_reply.get(sender) {
            Some(last) if now.saturating_duration_since(*last) < self.cooldown => false,
            Some(last) if now < *last => true,
            _ => {
                self.last_reply.insert(sender.clone(), now);
                true
            }
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn last_reply(&self, sender: &SenderKey) -> Option<Instant> {
        self.last_reply.get(sender).copied()
    }

    pub fn tracked_senders(&self) -> usize {
        self.last_reply.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}
