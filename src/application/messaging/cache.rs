//! Bounded cache of recently received messages

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::CachedMessage;

/// Fixed-capacity FIFO of message snapshots.
///
/// Lookups that miss are expected: anything older than the last `capacity`
/// messages, or received before the process started, is simply not here.
pub struct MessageCache {
    capacity: usize,
    entries: Mutex<VecDeque<CachedMessage>>,
}

impl MessageCache {
    /// `capacity` is clamped to at least one entry
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    fn entries(&self) -> MutexGuard<'_, VecDeque<CachedMessage>> {
        // Entries are replaced whole, so a poisoned guard never holds a torn value
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn store(&self, message: CachedMessage) {
        let mut entries = self.entries();
        entries.push_back(message);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// First cached message (oldest first) matching `predicate`
    pub fn find<P>(&self, predicate: P) -> Option<CachedMessage>
    where
        P: Fn(&CachedMessage) -> bool,
    {
        self.entries().iter().find(|m| predicate(m)).cloned()
    }

    pub fn find_by_id(&self, id: &str) -> Option<CachedMessage> {
        self.find(|m| m.id == id)
    }

    /// Replace the snapshot of an already cached id in place and return the
    /// previous one. Uncached ids are left out of the cache.
    pub fn swap(&self, message: CachedMessage) -> Option<CachedMessage> {
        let mut entries = self.entries();
        let slot = entries.iter_mut().find(|m| m.id == message.id)?;
        Some(std::mem::replace(slot, message))
    }

    pub fn snapshot(&self) -> Vec<CachedMessage> {
        self.entries().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
