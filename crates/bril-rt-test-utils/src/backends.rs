//! Instrumented [`Backend`] implementations.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use bril_rt_alloc::{Backend, SystemBackend};

/// Wraps another backend and counts blocks and bytes in flight.
#[derive(Debug, Default)]
pub struct CountingBackend<B = SystemBackend> {
    inner: B,
    outstanding: AtomicUsize,
    outstanding_bytes: AtomicUsize,
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl CountingBackend<SystemBackend> {
    pub fn new() -> Self {
        Self::wrapping(SystemBackend)
    }
}

impl<B> CountingBackend<B> {
    pub fn wrapping(inner: B) -> Self {
        Self {
            inner,
            outstanding: AtomicUsize::new(0),
            outstanding_bytes: AtomicUsize::new(0),
            acquired: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
        }
    }

    /// Blocks acquired and not yet released.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Bytes (headers included) acquired and not yet released.
    pub fn outstanding_bytes(&self) -> usize {
        self.outstanding_bytes.load(Ordering::SeqCst)
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

// SAFETY: forwards every block to and from the wrapped backend.
unsafe impl<B: Backend> Backend for CountingBackend<B> {
    fn acquire(&self, layout: Layout, zeroed: bool) -> Option<NonNull<u8>> {
        let ptr = self.inner.acquire(layout, zeroed)?;
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        self.outstanding_bytes
            .fetch_add(layout.size(), Ordering::SeqCst);
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Some(ptr)
    }

    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
        self.outstanding_bytes
            .fetch_sub(layout.size(), Ordering::SeqCst);
        self.released.fetch_add(1, Ordering::SeqCst);
        // SAFETY: same contract as the wrapped backend.
        unsafe { self.inner.release(ptr, layout) }
    }
}

/// Keeps released blocks mapped until the backend itself is dropped.
///
/// Blocks are stored as addresses so the backend stays `Send + Sync`.
#[derive(Debug, Default)]
pub struct QuarantineBackend {
    quarantined: Mutex<Vec<(usize, Layout)>>,
    live: AtomicUsize,
}

impl QuarantineBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks acquired and not yet released by the allocator.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Blocks released by the allocator but still mapped.
    pub fn quarantined(&self) -> usize {
        self.quarantined.lock().map(|q| q.len()).unwrap_or(0)
    }
}

// SAFETY: blocks come from the system allocator and stay valid until
// Drop, which is strictly later than any release.
unsafe impl Backend for QuarantineBackend {
    fn acquire(&self, layout: Layout, zeroed: bool) -> Option<NonNull<u8>> {
        let ptr = SystemBackend.acquire(layout, zeroed)?;
        self.live.fetch_add(1, Ordering::SeqCst);
        Some(ptr)
    }

    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        self.quarantined
            .lock()
            .expect("quarantine poisoned")
            .push((ptr.as_ptr() as usize, layout));
    }
}

impl Drop for QuarantineBackend {
    fn drop(&mut self) {
        let blocks = match self.quarantined.get_mut() {
            Ok(blocks) => std::mem::take(blocks),
            Err(poisoned) => std::mem::take(poisoned.into_inner()),
        };
        for (address, layout) in blocks {
            if let Some(ptr) = NonNull::new(address as *mut u8) {
                // SAFETY: acquired from SystemBackend with this layout and
                // released exactly once, here.
                unsafe { SystemBackend.release(ptr, layout) };
            }
        }
    }
}
