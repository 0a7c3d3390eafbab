//! Bounded cache of recently seen packet signatures.
use std::collections::{HashSet, VecDeque};

pub const DEFAULT_DEDUP_CAPACITY: usize = 200;

/// FIFO set of exact packet signatures.
///
/// Membership is exact string equality; the oldest signature is evicted once
/// the cache is full, after which an identical packet counts as new again.
#[derive(Debug)]
pub struct Deduplicator {
    order: VecDeque<String>,
    members: HashSet<String>,
    capacity: usize,
}

impl Deduplicator {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            order: VecDeque::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    pub fn seen(&self, signature: &str) -> bool {
        self.members.contains(signature)
    }

    pub fn record(&mut self, signature: String) {
        if self.members.contains(&signature) {
            return;
        }
        while self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.members.remove(&oldest);
            }
        }
        self.members.insert(signature.clone());
        self.order.push_back(signature);
    }

    /// Returns true if the signature was new (and is now recorded).
    pub fn check_and_record(&mut self, signature: String) -> bool {
        if self.seen(&signature) {
            return false;
        }
        self.record(signature);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUP_CAPACITY)
    }
}
