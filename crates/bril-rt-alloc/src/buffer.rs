//! Owned, length-carrying view of one array for Rust callers.

#![allow(unsafe_code)]

use std::fmt;
use std::mem::ManuallyDrop;
use std::ptr::NonNull;
use std::slice;

use bril_rt_core::AllocError;

use crate::allocator::ArrayAllocator;
use crate::backend::Backend;
use crate::layout::{ArrayHeader, ArrayInfo};
use crate::raw;

/// A live array owned by Rust code.
///
/// Reads its length from the header rather than storing a copy, so the
/// value seen here is exactly what compiled code and the deallocator
/// see. Dropping the buffer frees it; [`ArrayBuffer::into_raw`] hands
/// ownership to compiled code instead.
pub struct ArrayBuffer<'a, B: Backend> {
    allocator: &'a ArrayAllocator<B>,
    elements: NonNull<u8>,
}

impl<'a, B: Backend> ArrayBuffer<'a, B> {
    /// Take ownership of a live array.
    ///
    /// # Safety
    ///
    /// `elements` must be a live address returned by `allocator.allocate`
    /// with no other owner.
    pub unsafe fn from_raw(allocator: &'a ArrayAllocator<B>, elements: NonNull<u8>) -> Self {
        Self {
            allocator,
            elements,
        }
    }

    /// Give up ownership and return the element address.
    pub fn into_raw(self) -> NonNull<u8> {
        let this = ManuallyDrop::new(self);
        this.elements
    }

    fn header(&self) -> ArrayHeader {
        // SAFETY: the buffer owns a live allocation whose header was
        // written by the allocator and is never mutated while live.
        unsafe { raw::header_ptr(self.elements.as_ptr()).read() }
    }

    /// Length and element width.
    pub fn info(&self) -> ArrayInfo {
        self.header().info()
    }

    /// Element count.
    pub fn len(&self) -> usize {
        self.header().length as usize
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.header().length == 0
    }

    /// Byte size of one element.
    pub fn element_width(&self) -> usize {
        self.header().element_width as usize
    }

    /// Address of element 0.
    pub fn as_ptr(&self) -> *const u8 {
        self.elements.as_ptr()
    }

    /// Mutable address of element 0.
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.elements.as_ptr()
    }

    /// The element region as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        let len = self.len() * self.element_width();
        // SAFETY: the element region is len bytes long and initialised
        // (zero-filled or written by the owner) for the buffer's lifetime.
        unsafe { slice::from_raw_parts(self.elements.as_ptr(), len) }
    }

    /// The element region as mutable bytes.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let len = self.len() * self.element_width();
        // SAFETY: as above, and &mut self guarantees exclusive access.
        unsafe { slice::from_raw_parts_mut(self.elements.as_ptr(), len) }
    }

    /// Byte range of element `index`, or `IndexOutOfBounds`.
    pub fn element(&self, index: i64) -> Result<&[u8], AllocError> {
        let info = self.info();
        if index < 0 || index as u64 >= info.length {
            return Err(AllocError::IndexOutOfBounds {
                address: self.elements.as_ptr() as usize,
                index,
                length: info.length,
            });
        }
        let width = info.element_width as usize;
        let start = index as usize * width;
        Ok(&self.as_bytes()[start..start + width])
    }

    /// Release the array, reporting any header fault.
    pub fn free(self) -> Result<(), AllocError> {
        let this = ManuallyDrop::new(self);
        // SAFETY: the buffer owns a live allocation from this allocator.
        unsafe { this.allocator.free(this.elements.as_ptr()) }
    }
}

impl<B: Backend> Drop for ArrayBuffer<'_, B> {
    fn drop(&mut self) {
        // SAFETY: the buffer owns a live allocation from this allocator.
        let result = unsafe { self.allocator.free(self.elements.as_ptr()) };
        debug_assert!(result.is_ok(), "owned array failed to free: {result:?}");
    }
}

impl<B: Backend> fmt::Debug for ArrayBuffer<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = self.info();
        f.debug_struct("ArrayBuffer")
            .field("elements", &self.elements)
            .field("length", &info.length)
            .field("element_width", &info.element_width)
            .finish()
    }
}
