//! Allocation counters.
//!
//! Plain relaxed atomics: they count buffers and bytes, they never record
//! addresses. Concurrent program instances sharing one allocator each
//! see the combined totals.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Live counters maintained by an [`ArrayAllocator`](crate::ArrayAllocator).
#[derive(Debug, Default)]
pub struct AllocStats {
    live: AtomicUsize,
    live_bytes: AtomicUsize,
    allocations: AtomicU64,
    frees: AtomicU64,
}

/// Point-in-time copy of [`AllocStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Buffers allocated and not yet freed.
    pub live: usize,
    /// Element bytes held by live buffers (headers excluded).
    pub live_bytes: usize,
    /// Successful allocations since creation.
    pub allocations: u64,
    /// Successful frees since creation.
    pub frees: u64,
}

impl AllocStats {
    /// Zeroed counters.
    pub const fn new() -> Self {
        Self {
            live: AtomicUsize::new(0),
            live_bytes: AtomicUsize::new(0),
            allocations: AtomicU64::new(0),
            frees: AtomicU64::new(0),
        }
    }

    pub(crate) fn record_alloc(&self, payload_bytes: usize) {
        self.live.fetch_add(1, Ordering::Relaxed);
        self.live_bytes.fetch_add(payload_bytes, Ordering::Relaxed);
        self.allocations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_free(&self, payload_bytes: usize) {
        self.live.fetch_sub(1, Ordering::Relaxed);
        self.live_bytes.fetch_sub(payload_bytes, Ordering::Relaxed);
        self.frees.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of live buffers.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }

    /// Copy all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            live: self.live.load(Ordering::Relaxed),
            live_bytes: self.live_bytes.load(Ordering::Relaxed),
            allocations: self.allocations.load(Ordering::Relaxed),
            frees: self.frees.load(Ordering::Relaxed),
        }
    }
}
