//! Accounting for sub-resources owned by a map
//!
//! A [`ResourceLedger`] hands out [`ResourceLease`]s. A lease is counted as
//! live until it is dropped, so when a map is dropped every tileset lease it
//! owns is returned exactly once. Readers attach leases; nothing else needs
//! to touch them.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Counters {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

/// Shared counter of acquired and released leases
#[derive(Debug, Clone, Default)]
pub struct ResourceLedger {
    counters: Arc<Counters>,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out a new live lease
    pub fn acquire(&self) -> ResourceLease {
        self.counters.acquired.fetch_add(1, Ordering::SeqCst);
        ResourceLease {
            counters: Arc::clone(&self.counters),
        }
    }

    /// Number of leases currently alive
    pub fn live(&self) -> usize {
        self.acquired() - self.released()
    }

    /// Total number of leases handed out
    pub fn acquired(&self) -> usize {
        self.counters.acquired.load(Ordering::SeqCst)
    }

    /// Total number of leases returned
    pub fn released(&self) -> usize {
        self.counters.released.load(Ordering::SeqCst)
    }
}

/// A live claim on a ledger; returned on drop
///
/// Deliberately not `Clone`: one lease, one release.
#[derive(Debug)]
pub struct ResourceLease {
    counters: Arc<Counters>,
}

impl Drop for ResourceLease {
    fn drop(&mut self) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}
