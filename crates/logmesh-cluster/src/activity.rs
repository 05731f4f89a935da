//! Liveness and failure tracking for a single node.
//!
//! Each cell is an independent atomic. A node is active if the last
//! `set_active` call said so; `touch` and `record_failure` both go through
//! it, so concurrent probes resolve last-writer-wins.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock time as unix ms.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Debug, Default)]
pub struct ActivityTracker {
    active: AtomicBool,
    /// Only ever grows.
    failure_count: AtomicU32,
    /// Unix ms of the last successful contact, 0 = never.
    last_contact: AtomicU64,
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// The single write path for the liveness flag.
    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }

    /// Record a successful contact. Returns the stored contact time.
    pub fn touch(&self) -> u64 {
        let now = now_ms();
        let previous = self.last_contact.fetch_max(now, Ordering::SeqCst);
        self.set_active(true);
        previous.max(now)
    }

    /// Record a failed contact. Returns the new failure count.
    pub fn record_failure(&self) -> u32 {
        let count = self.failure_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_active(false);
        count
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count.load(Ordering::SeqCst)
    }

    pub fn last_contact(&self) -> Option<u64> {
        match self.last_contact.load(Ordering::SeqCst) {
            0 => None,
            ms => Some(ms),
        }
    }
}
