//! Low-level pointer primitives for header access.
//!
//! The only place in the crate that turns an element address into a
//! header address. Each `unsafe` function carries a `# Safety` contract
//! and every `unsafe` block a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::ptr::{self, NonNull};

use crate::layout::{ArrayHeader, ArrayInfo, HEADER_ALIGN, HEADER_SIZE};

/// Why an element address failed header validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HeaderFault {
    Null,
    Misaligned,
    /// Too low for a header to precede it.
    BelowHeader,
    /// Tag is [`ArrayHeader::FREED_TAG`].
    Freed,
    /// Tag is neither live nor freed.
    Untagged,
    /// Tag is live but the recorded size disagrees with length x width.
    Corrupted,
}

impl HeaderFault {
    pub(crate) fn reason(self) -> &'static str {
        match self {
            Self::Null => "null pointer",
            Self::Misaligned => "pointer is not 16-byte aligned",
            Self::BelowHeader => "address is too low to follow an array header",
            Self::Freed => "array was already freed",
            Self::Untagged => "no array header at this address",
            Self::Corrupted => "array header is corrupted",
        }
    }
}

/// Address checks that need no memory access.
pub(crate) fn check_address(elements: *const u8) -> Result<(), HeaderFault> {
    let address = elements as usize;
    if elements.is_null() {
        return Err(HeaderFault::Null);
    }
    if address % HEADER_ALIGN != 0 {
        return Err(HeaderFault::Misaligned);
    }
    if address < HEADER_SIZE {
        return Err(HeaderFault::BelowHeader);
    }
    Ok(())
}

/// Start of the allocation that owns `elements`.
pub(crate) fn header_ptr(elements: *const u8) -> *mut ArrayHeader {
    elements.wrapping_sub(HEADER_SIZE) as *mut ArrayHeader
}

/// Element address for an allocation starting at `base`.
pub(crate) fn elements_ptr(base: NonNull<u8>) -> NonNull<u8> {
    // SAFETY: every layout is at least HEADER_SIZE + 1 bytes, so the
    // offset stays inside the allocation and cannot be null.
    unsafe { base.add(HEADER_SIZE) }
}

/// Write a live header at `base`.
///
/// # Safety
///
/// `base` must be the start of a writable allocation of at least
/// `HEADER_SIZE` bytes, aligned to `HEADER_ALIGN`.
pub(crate) unsafe fn write_header(base: NonNull<u8>, header: ArrayHeader) {
    // SAFETY: caller guarantees the header region is writable and aligned.
    unsafe { ptr::write(base.as_ptr() as *mut ArrayHeader, header) }
}

/// Read and validate the header for `elements`.
///
/// # Safety
///
/// After the address checks pass, the 32 bytes before `elements` must be
/// readable: `elements` was returned by `ArrayAllocator::allocate` and
/// its backing memory is still mapped.
pub(crate) unsafe fn read_header(elements: *const u8) -> Result<ArrayHeader, HeaderFault> {
    check_address(elements)?;
    // SAFETY: caller guarantees the header bytes are readable; alignment
    // was checked above and HEADER_ALIGN >= align_of::<ArrayHeader>().
    let header = unsafe { ptr::read(header_ptr(elements)) };
    match header.state {
        ArrayHeader::LIVE_TAG => {}
        ArrayHeader::FREED_TAG => return Err(HeaderFault::Freed),
        _ => return Err(HeaderFault::Untagged),
    }
    let info = ArrayInfo {
        length: header.length,
        element_width: header.element_width,
    };
    match info.layout() {
        Some(layout) if layout.size() as u64 == header.alloc_size && info.element_width > 0 => {
            Ok(header)
        }
        _ => Err(HeaderFault::Corrupted),
    }
}

/// Overwrite the tag of a validated header with [`ArrayHeader::FREED_TAG`].
///
/// # Safety
///
/// `elements` must have passed [`read_header`] and the allocation must
/// still be owned by the caller.
pub(crate) unsafe fn mark_freed(elements: *const u8) {
    let header = header_ptr(elements);
    // SAFETY: header was validated by the caller and is still allocated.
    unsafe { ptr::addr_of_mut!((*header).state).write(ArrayHeader::FREED_TAG) }
}

/// Recover the allocation start for a validated element address.
pub(crate) fn allocation_base(elements: NonNull<u8>) -> NonNull<u8> {
    // SAFETY: element pointers are HEADER_SIZE bytes into a non-null
    // allocation, so the base is non-null.
    unsafe { NonNull::new_unchecked(header_ptr(elements.as_ptr()) as *mut u8) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_rejected_without_access() {
        assert_eq!(check_address(ptr::null()), Err(HeaderFault::Null));
    }

    #[test]
    fn misaligned_is_rejected_without_access() {
        let addr = 0x1008 as *const u8;
        assert_eq!(check_address(addr), Err(HeaderFault::Misaligned));
    }

    #[test]
    fn aligned_low_addresses_have_no_room_for_a_header() {
        let low = 0x10 as *const u8;
        assert_eq!(check_address(low), Err(HeaderFault::BelowHeader));
        assert_eq!(check_address(HEADER_SIZE as *const u8), Ok(()));
    }

    #[test]
    fn header_and_elements_are_inverse() {
        #[repr(C, align(16))]
        struct Block([u8; 64]);
        let mut block = Block([0; 64]);
        let base = NonNull::new(block.0.as_mut_ptr()).unwrap();
        let elements = elements_ptr(base);
        assert_eq!(elements.as_ptr() as usize - base.as_ptr() as usize, HEADER_SIZE);
        assert_eq!(allocation_base(elements), base);
    }

    #[test]
    fn read_header_classifies_tags() {
        #[repr(C, align(16))]
        struct Block([u8; 64]);
        let mut block = Block([0; 64]);
        let base = NonNull::new(block.0.as_mut_ptr()).unwrap();
        let elements = elements_ptr(base);
        let info = ArrayInfo::from_request(2, 8).unwrap();
        let layout = info.layout().unwrap();

        // SAFETY: block is 64 bytes, 16-aligned, and outlives every access.
        unsafe {
            assert_eq!(read_header(elements.as_ptr()), Err(HeaderFault::Untagged));

            write_header(base, ArrayHeader::live(info, layout));
            assert_eq!(read_header(elements.as_ptr()).unwrap().info(), info);

            let mut corrupt = ArrayHeader::live(info, layout);
            corrupt.length = 3;
            write_header(base, corrupt);
            assert_eq!(read_header(elements.as_ptr()), Err(HeaderFault::Corrupted));

            write_header(base, ArrayHeader::live(info, layout));
            mark_freed(elements.as_ptr());
            assert_eq!(read_header(elements.as_ptr()), Err(HeaderFault::Freed));
        }
    }
}
