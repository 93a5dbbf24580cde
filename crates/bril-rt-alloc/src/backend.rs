//! Where array memory comes from.
//!
//! [`Backend`] is the seam between the header bookkeeping in
//! [`ArrayAllocator`](crate::ArrayAllocator) and the system allocator.
//! Production code uses [`SystemBackend`]; test tooling substitutes
//! counting and quarantining backends.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::NonNull;

/// A source of raw memory blocks.
///
/// # Safety
///
/// Implementors must return blocks that are valid for reads and writes of
/// `layout.size()` bytes and aligned to `layout.align()`, and must keep a
/// block valid until it is passed to [`Backend::release`].
pub unsafe trait Backend {
    /// Acquire a block for `layout`, zero-filled when `zeroed` is true.
    ///
    /// Returns `None` when memory is exhausted. `layout` always has a
    /// non-zero size.
    fn acquire(&self, layout: Layout, zeroed: bool) -> Option<NonNull<u8>>;

    /// Return a block to the backend.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by [`Backend::acquire`] on this
    /// backend with the same `layout`, and must not have been released.
    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The process-wide system allocator (`std::alloc`).
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemBackend;

// SAFETY: delegates to the global allocator, which upholds the contract.
unsafe impl Backend for SystemBackend {
    fn acquire(&self, layout: Layout, zeroed: bool) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            return None;
        }
        // SAFETY: layout has a non-zero size, checked above.
        let ptr = unsafe {
            if zeroed {
                alloc::alloc_zeroed(layout)
            } else {
                alloc::alloc(layout)
            }
        };
        NonNull::new(ptr)
    }

    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: caller guarantees ptr came from acquire with this layout.
        unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
    }
}

// SAFETY: forwards to the referenced backend.
unsafe impl<B: Backend + ?Sized> Backend for &B {
    fn acquire(&self, layout: Layout, zeroed: bool) -> Option<NonNull<u8>> {
        (**self).acquire(layout, zeroed)
    }

    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: same contract as the referenced backend.
        unsafe { (**self).release(ptr, layout) }
    }
}
