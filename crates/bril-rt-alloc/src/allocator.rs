//! The array allocator/deallocator pair.
//!
//! [`ArrayAllocator::allocate`] is the only way to create a buffer and
//! [`ArrayAllocator::free`] the only way to release one; releasing the
//! element pointer through any other path would hand the system allocator
//! an address 32 bytes past the block it owns.

#![allow(unsafe_code)]

use std::ptr::NonNull;

use bril_rt_core::AllocError;

use crate::backend::{Backend, SystemBackend};
use crate::buffer::ArrayBuffer;
use crate::layout::{ArrayHeader, ArrayInfo};
use crate::raw::{self, HeaderFault};
use crate::stats::{AllocStats, StatsSnapshot};

/// Allocates and releases length-prefixed arrays from a [`Backend`].
///
/// Holds no per-buffer state: everything needed to release or
/// bounds-check a buffer lives in its header. `&self` methods are
/// reentrant, so one allocator can back several program instances.
#[derive(Debug)]
pub struct ArrayAllocator<B: Backend = SystemBackend> {
    backend: B,
    zero_init: bool,
    stats: AllocStats,
}

impl ArrayAllocator<SystemBackend> {
    /// Allocator over the system allocator with zero-initialised elements.
    pub const fn system() -> Self {
        Self::with_backend(SystemBackend, true)
    }
}

impl Default for ArrayAllocator<SystemBackend> {
    fn default() -> Self {
        Self::system()
    }
}

impl<B: Backend> ArrayAllocator<B> {
    /// Allocator over `backend`. With `zero_init` every element region
    /// starts zero-filled; otherwise its contents are unspecified.
    pub const fn with_backend(backend: B, zero_init: bool) -> Self {
        Self {
            backend,
            zero_init,
            stats: AllocStats::new(),
        }
    }

    /// The backing memory source.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Whether new element regions are zero-filled.
    pub fn zero_init(&self) -> bool {
        self.zero_init
    }

    /// Allocate an array of `length` elements of `element_width` bytes.
    ///
    /// Returns the address of element 0. The address is 16-byte aligned,
    /// non-null and unique among live buffers, including for
    /// `length == 0`. Nothing is allocated when an error is returned.
    pub fn allocate(&self, length: i64, element_width: i64) -> Result<NonNull<u8>, AllocError> {
        let info = ArrayInfo::from_request(length, element_width)?;
        let layout = info.layout_or_err()?;
        let base = self
            .backend
            .acquire(layout, self.zero_init)
            .ok_or(AllocError::OutOfMemory {
                requested: layout.size(),
            })?;
        // SAFETY: base is a fresh, HEADER_ALIGN-aligned block of
        // layout.size() > HEADER_SIZE bytes.
        unsafe { raw::write_header(base, ArrayHeader::live(info, layout)) };
        self.stats.record_alloc(payload_bytes(info));
        Ok(raw::elements_ptr(base))
    }

    /// Allocate an array owned by the returned [`ArrayBuffer`].
    pub fn allocate_buffer(
        &self,
        length: i64,
        element_width: i64,
    ) -> Result<ArrayBuffer<'_, B>, AllocError> {
        let elements = self.allocate(length, element_width)?;
        if !self.zero_init {
            // ArrayBuffer exposes the region as `&[u8]`, so it must be
            // initialised even when compiled code would not need it.
            let bytes = ArrayInfo::from_request(length, element_width)
                .map(payload_bytes)
                .unwrap_or(0);
            // SAFETY: the element region is `bytes` writable bytes.
            unsafe { std::ptr::write_bytes(elements.as_ptr(), 0, bytes) };
        }
        // SAFETY: freshly allocated by self and not shared.
        Ok(unsafe { ArrayBuffer::from_raw(self, elements) })
    }

    /// Release the array whose element address is `elements`.
    ///
    /// Validates the header first. A null or misaligned address, one too
    /// low to follow a header, or one without a live tag is rejected with
    /// [`AllocError::InvalidFree`]; a buffer already released is rejected
    /// with [`AllocError::DoubleFree`]. On error nothing is released.
    ///
    /// # Safety
    ///
    /// `elements` must be null, misaligned, below `HEADER_SIZE`, or an
    /// address returned by `allocate` on this allocator whose backing
    /// memory is still mapped (always true for live buffers; true for
    /// freed buffers only while the backend keeps released blocks).
    /// Anything else is undefined behaviour.
    pub unsafe fn free(&self, elements: *mut u8) -> Result<(), AllocError> {
        let address = elements as usize;
        // SAFETY: forwarded from the caller's contract.
        let header = unsafe { raw::read_header(elements) }.map_err(|fault| match fault {
            HeaderFault::Freed => AllocError::DoubleFree { address },
            other => AllocError::InvalidFree {
                address,
                reason: other.reason(),
            },
        })?;
        let info = header.info();
        let layout = info.layout_or_err()?;
        let elements = NonNull::new(elements).ok_or(AllocError::InvalidFree {
            address,
            reason: HeaderFault::Null.reason(),
        })?;
        // SAFETY: header validated above; the block is still owned here.
        unsafe { raw::mark_freed(elements.as_ptr()) };
        // SAFETY: the block was acquired from this backend with the layout
        // recomputed from its validated header.
        unsafe { self.backend.release(raw::allocation_base(elements), layout) };
        self.stats.record_free(payload_bytes(info));
        Ok(())
    }

    /// Counter snapshot.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Number of live buffers.
    pub fn live(&self) -> usize {
        self.stats.live()
    }

    /// Fail with [`AllocError::Leak`] if any buffer is still live.
    pub fn check_leaks(&self) -> Result<(), AllocError> {
        match self.stats.live() {
            0 => Ok(()),
            live => Err(AllocError::Leak { live }),
        }
    }
}

fn payload_bytes(info: ArrayInfo) -> usize {
    // Only called for requests whose layout was already computed.
    info.payload_bytes().unwrap_or(0)
}

/// Length and element width of the live array at `elements`.
///
/// # Safety
///
/// Same contract as [`ArrayAllocator::free`].
pub unsafe fn array_info(elements: *const u8) -> Result<ArrayInfo, AllocError> {
    let address = elements as usize;
    // SAFETY: forwarded from the caller's contract.
    let header = unsafe { raw::read_header(elements) }.map_err(|fault| match fault {
        HeaderFault::Freed => AllocError::UseAfterFree { address },
        other => AllocError::InvalidAddress {
            address,
            reason: other.reason(),
        },
    })?;
    Ok(header.info())
}

/// Check that `index` addresses an element of the live array at
/// `elements`, returning the array's metadata.
///
/// # Safety
///
/// Same contract as [`ArrayAllocator::free`].
pub unsafe fn check_index(elements: *const u8, index: i64) -> Result<ArrayInfo, AllocError> {
    // SAFETY: forwarded from the caller's contract.
    let info = unsafe { array_info(elements) }?;
    if index < 0 || index as u64 >= info.length {
        return Err(AllocError::IndexOutOfBounds {
            address: elements as usize,
            index,
            length: info.length,
        });
    }
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{HEADER_ALIGN, LENGTH_OFFSET};
    use std::alloc::Layout;

    /// A backend that is always out of memory.
    struct Exhausted;

    // SAFETY: never hands out memory.
    unsafe impl Backend for Exhausted {
        fn acquire(&self, _layout: Layout, _zeroed: bool) -> Option<NonNull<u8>> {
            None
        }

        unsafe fn release(&self, _ptr: NonNull<u8>, _layout: Layout) {
            unreachable!("nothing was acquired")
        }
    }

    #[test]
    fn allocate_then_free_restores_baseline() {
        let alloc = ArrayAllocator::system();
        let before = alloc.stats();
        let ptr = alloc.allocate(10, 8).unwrap();
        assert_eq!(alloc.live(), before.live + 1);
        assert_eq!(alloc.stats().live_bytes, 80);
        // SAFETY: ptr is live and owned by this test.
        unsafe { alloc.free(ptr.as_ptr()) }.unwrap();
        let after = alloc.stats();
        assert_eq!(after.live, before.live);
        assert_eq!(after.live_bytes, 0);
        assert_eq!(after.frees, 1);
    }

    #[test]
    fn element_pointer_is_aligned_past_header() {
        let alloc = ArrayAllocator::system();
        for width in [1, 2, 4, 8, 16] {
            let ptr = alloc.allocate(3, width).unwrap();
            assert_eq!(ptr.as_ptr() as usize % HEADER_ALIGN, 0);
            // SAFETY: ptr is live.
            unsafe { alloc.free(ptr.as_ptr()) }.unwrap();
        }
    }

    #[test]
    fn zero_length_arrays_are_distinct_and_freeable() {
        let alloc = ArrayAllocator::system();
        let a = alloc.allocate(0, 8).unwrap();
        let b = alloc.allocate(0, 8).unwrap();
        assert_ne!(a, b);
        // SAFETY: both live.
        unsafe {
            assert_eq!(array_info(a.as_ptr()).unwrap().length, 0);
            assert!(matches!(
                check_index(a.as_ptr(), 0),
                Err(AllocError::IndexOutOfBounds { length: 0, .. })
            ));
            alloc.free(a.as_ptr()).unwrap();
            alloc.free(b.as_ptr()).unwrap();
        }
        assert_eq!(alloc.live(), 0);
    }

    #[test]
    fn length_survives_writes_to_every_element_byte() {
        let alloc = ArrayAllocator::system();
        let ptr = alloc.allocate(17, 8).unwrap();
        // SAFETY: 17 * 8 writable bytes follow ptr; header read uses the
        // documented fixed offset.
        unsafe {
            std::ptr::write_bytes(ptr.as_ptr(), 0xFF, 17 * 8);
            let length = (ptr.as_ptr().sub(LENGTH_OFFSET) as *const u64).read();
            assert_eq!(length, 17);
            assert_eq!(
                array_info(ptr.as_ptr()).unwrap(),
                ArrayInfo {
                    length: 17,
                    element_width: 8
                }
            );
            alloc.free(ptr.as_ptr()).unwrap();
        }
    }

    #[test]
    fn zero_init_fills_elements_with_zero() {
        let alloc = ArrayAllocator::system();
        let ptr = alloc.allocate(32, 1).unwrap();
        // SAFETY: 32 readable bytes follow ptr.
        unsafe {
            let bytes = std::slice::from_raw_parts(ptr.as_ptr(), 32);
            assert!(bytes.iter().all(|&b| b == 0));
            alloc.free(ptr.as_ptr()).unwrap();
        }
    }

    #[test]
    fn contract_violations_allocate_nothing() {
        let alloc = ArrayAllocator::system();
        assert_eq!(
            alloc.allocate(-1, 8),
            Err(AllocError::NegativeLength { length: -1 })
        );
        assert_eq!(
            alloc.allocate(4, 0),
            Err(AllocError::InvalidElementWidth { element_width: 0 })
        );
        assert_eq!(alloc.stats(), StatsSnapshot::default());
    }

    #[test]
    fn overflowing_request_is_out_of_memory() {
        let alloc = ArrayAllocator::system();
        let err = alloc.allocate(i64::MAX, 8).unwrap_err();
        assert_eq!(err.kind(), bril_rt_core::ErrorKind::OutOfMemory);
        assert_eq!(alloc.live(), 0);
    }

    #[test]
    fn exhausted_backend_reports_requested_size() {
        let alloc = ArrayAllocator::with_backend(Exhausted, true);
        assert_eq!(
            alloc.allocate(4, 8),
            Err(AllocError::OutOfMemory { requested: 64 })
        );
        assert_eq!(alloc.live(), 0);
    }

    #[test]
    fn null_and_misaligned_free_are_rejected() {
        let alloc = ArrayAllocator::system();
        // SAFETY: both addresses fail the checks that need no memory access.
        unsafe {
            assert_eq!(
                alloc.free(std::ptr::null_mut()),
                Err(AllocError::InvalidFree {
                    address: 0,
                    reason: "null pointer"
                })
            );
            assert!(matches!(
                alloc.free(0x1003 as *mut u8),
                Err(AllocError::InvalidFree { address: 0x1003, .. })
            ));
        }
    }

    #[test]
    fn aligned_address_below_a_header_is_too_low() {
        let alloc = ArrayAllocator::system();
        // SAFETY: 0x10 fails the address checks before any memory access.
        unsafe {
            assert_eq!(
                array_info(0x10 as *const u8),
                Err(AllocError::InvalidAddress {
                    address: 0x10,
                    reason: "address is too low to follow an array header"
                })
            );
            assert_eq!(
                alloc.free(0x10 as *mut u8),
                Err(AllocError::InvalidFree {
                    address: 0x10,
                    reason: "address is too low to follow an array header"
                })
            );
        }
    }

    #[test]
    fn interior_pointer_is_rejected() {
        let alloc = ArrayAllocator::system();
        let ptr = alloc.allocate(8, 8).unwrap();
        // SAFETY: ptr + 32 is inside the live element region, so the 32
        // bytes before it (elements 0..4) are readable and zero.
        unsafe {
            let interior = ptr.as_ptr().add(32);
            assert!(matches!(
                alloc.free(interior),
                Err(AllocError::InvalidFree { .. })
            ));
            alloc.free(ptr.as_ptr()).unwrap();
        }
    }

    #[test]
    fn check_index_bounds() {
        let alloc = ArrayAllocator::system();
        let ptr = alloc.allocate(4, 8).unwrap();
        // SAFETY: ptr is live until the final free.
        unsafe {
            assert!(check_index(ptr.as_ptr(), 0).is_ok());
            assert!(check_index(ptr.as_ptr(), 3).is_ok());
            assert_eq!(
                check_index(ptr.as_ptr(), 4),
                Err(AllocError::IndexOutOfBounds {
                    address: ptr.as_ptr() as usize,
                    index: 4,
                    length: 4
                })
            );
            assert!(check_index(ptr.as_ptr(), -1).is_err());
            alloc.free(ptr.as_ptr()).unwrap();
        }
    }

    #[test]
    fn leak_check_counts_live_buffers() {
        let alloc = ArrayAllocator::system();
        assert!(alloc.check_leaks().is_ok());
        let a = alloc.allocate(1, 8).unwrap();
        let b = alloc.allocate(1, 8).unwrap();
        assert_eq!(alloc.check_leaks(), Err(AllocError::Leak { live: 2 }));
        // SAFETY: both live.
        unsafe {
            alloc.free(a.as_ptr()).unwrap();
            alloc.free(b.as_ptr()).unwrap();
        }
        assert!(alloc.check_leaks().is_ok());
    }
}
