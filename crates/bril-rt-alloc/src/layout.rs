//! Header layout and allocation sizing.
//!
//! Everything here is pure arithmetic over the request; the pointer
//! work lives in `raw`.

use std::alloc::Layout;
use std::mem;

use bril_rt_core::AllocError;

/// Metadata block stored immediately before every array's elements.
///
/// Field order is part of the runtime's ABI: `length` is the last field,
/// so it always sits at `element_ptr - 8`. `state` is kept past the
/// first 16 bytes, which system allocators commonly reuse for free-list
/// links once a block is released.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArrayHeader {
    /// Byte size of one element.
    pub element_width: u64,
    /// Total bytes of the allocation, header included.
    pub alloc_size: u64,
    /// [`ArrayHeader::LIVE_TAG`] or [`ArrayHeader::FREED_TAG`].
    pub state: u64,
    /// Element count.
    pub length: u64,
}

impl ArrayHeader {
    /// Tag of a live buffer (`"BRILLIVE"` in ASCII).
    pub const LIVE_TAG: u64 = 0x4252_494C_4C49_5645;
    /// Tag written just before a buffer is released (`"BRILFREE"`).
    pub const FREED_TAG: u64 = 0x4252_494C_4652_4545;

    /// Header for a freshly allocated buffer.
    pub(crate) fn live(info: ArrayInfo, layout: Layout) -> Self {
        Self {
            element_width: info.element_width,
            alloc_size: layout.size() as u64,
            state: Self::LIVE_TAG,
            length: info.length,
        }
    }

    /// The caller-visible part of the header.
    pub fn info(&self) -> ArrayInfo {
        ArrayInfo {
            length: self.length,
            element_width: self.element_width,
        }
    }
}

/// Size of [`ArrayHeader`] in bytes; the element pointer is this far past
/// the allocation start.
pub const HEADER_SIZE: usize = mem::size_of::<ArrayHeader>();

/// Alignment of every allocation, and therefore of every element region.
pub const HEADER_ALIGN: usize = 16;

/// Distance in bytes from the element pointer back to the `length` field.
pub const LENGTH_OFFSET: usize = HEADER_SIZE - mem::offset_of!(ArrayHeader, length);

const _: () = assert!(HEADER_SIZE == 32);
const _: () = assert!(HEADER_SIZE % HEADER_ALIGN == 0);
const _: () = assert!(LENGTH_OFFSET == 8);
const _: () = assert!(mem::offset_of!(ArrayHeader, state) >= 16);

/// Length and element width of a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArrayInfo {
    /// Element count.
    pub length: u64,
    /// Byte size of one element.
    pub element_width: u64,
}

impl ArrayInfo {
    /// Validate a raw `(length, element_width)` request.
    pub fn from_request(length: i64, element_width: i64) -> Result<Self, AllocError> {
        if length < 0 {
            return Err(AllocError::NegativeLength { length });
        }
        if element_width <= 0 {
            return Err(AllocError::InvalidElementWidth { element_width });
        }
        Ok(Self {
            length: length as u64,
            element_width: element_width as u64,
        })
    }

    /// Bytes of element data, `length * element_width`.
    pub fn payload_bytes(&self) -> Option<usize> {
        let bytes = self.length.checked_mul(self.element_width)?;
        usize::try_from(bytes).ok()
    }

    /// Layout of the whole allocation for this buffer.
    ///
    /// A zero-byte payload is padded to one byte so the element pointer
    /// always lies inside its own allocation and never aliases a
    /// neighbouring block.
    pub fn layout(&self) -> Option<Layout> {
        let payload = self.payload_bytes()?.max(1);
        let size = HEADER_SIZE.checked_add(payload)?;
        Layout::from_size_align(size, HEADER_ALIGN).ok()
    }

    /// Like [`ArrayInfo::layout`], reporting overflow as an [`AllocError`].
    pub fn layout_or_err(&self) -> Result<Layout, AllocError> {
        self.layout().ok_or(AllocError::CapacityOverflow {
            length: self.length as i64,
            element_width: self.element_width as i64,
        })
    }
}
