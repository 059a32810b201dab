//! Bounded outbound publish queue, owned by the network thread.
//!
//! Lossy on full: a new entry is dropped when all slots are taken.
//! Older entries are never evicted.

use heapless::Deque;
use log::warn;

use super::messages::{Payload, Topic};

pub const QUEUE_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    pub topic: Topic,
    pub payload: Payload,
}

#[derive(Debug, Default)]
pub struct PublishQueue {
    entries: Deque<Publication, QUEUE_CAPACITY>,
    dropped: u32,
}

impl PublishQueue {
    pub const fn new() -> Self {
        Self {
            entries: Deque::new(),
            dropped: 0,
        }
    }

    /// Append; returns `false` when the entry was dropped.
    pub fn enqueue(&mut self, publication: Publication) -> bool {
        match self.entries.push_back(publication) {
            Ok(()) => true,
            Err(lost) => {
                self.dropped = self.dropped.saturating_add(1);
                warn!(
                    "publish queue full, dropping {} ({} dropped so far)",
                    lost.topic, self.dropped
                );
                false
            }
        }
    }

    /// Oldest entry, left in place.
    pub fn front(&self) -> Option<&Publication> {
        self.entries.front()
    }

    pub fn pop(&mut self) -> Option<Publication> {
        self.entries.pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.is_full()
    }

    /// Entries refused since start-up.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    pub fn iter(&self) -> impl Iterator<Item = &Publication> {
        self.entries.iter()
    }
}
