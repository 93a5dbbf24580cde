//! Array memory entry points.
//!
//! `_bril_alloc` and `_bril_free` are the pair compiled code uses for
//! every array. The remaining symbols expose the header metadata to
//! generated bounds checks, debuggers and test harnesses.

#![allow(unsafe_code)]

use std::ffi::c_void;

use bril_rt_alloc::{array_info, check_index, ArrayInfo};
use bril_rt_core::RuntimeError;

use crate::runtime::{allocator, config};
use crate::status::RtStatus;

const ALLOC: &str = "_bril_alloc";
const FREE: &str = "_bril_free";
const ARRAY_LEN: &str = "_bril_array_len";
const ARRAY_WIDTH: &str = "_bril_array_width";
const CHECK_INDEX: &str = "_bril_check_index";
const CHECK_LEAKS: &str = "_bril_check_leaks";

/// Allocate `length` elements of `element_width` bytes from the shared
/// allocator and return the element address.
pub fn alloc(length: i64, element_width: i64) -> Result<*mut c_void, RuntimeError> {
    allocator()
        .allocate(length, element_width)
        .map(|ptr| ptr.as_ptr().cast())
        .map_err(|e| RuntimeError::alloc(ALLOC, e))
}

/// Release an array obtained from [`alloc`].
///
/// # Safety
///
/// `ptr` must be null, or an address whose 32 preceding bytes are
/// readable. Any address returned by [`alloc`] and not yet released
/// qualifies.
pub unsafe fn free(ptr: *mut c_void) -> Result<(), RuntimeError> {
    // SAFETY: forwarded caller contract.
    unsafe { allocator().free(ptr.cast()) }.map_err(|e| RuntimeError::alloc(FREE, e))
}

/// Header metadata of a live array.
///
/// # Safety
///
/// As for [`free`].
pub unsafe fn info(ptr: *const c_void, primitive: &'static str) -> Result<ArrayInfo, RuntimeError> {
    // SAFETY: forwarded caller contract.
    unsafe { array_info(ptr.cast()) }.map_err(|e| RuntimeError::alloc(primitive, e))
}

/// Fail with `Leak` if leak checking is enabled and arrays are still live.
pub fn check_leaks() -> Result<(), RuntimeError> {
    if !config().leak_check {
        return Ok(());
    }
    allocator()
        .check_leaks()
        .map_err(|e| RuntimeError::alloc(CHECK_LEAKS, e))
}

/// Allocate an array of `size` elements, each `bytes` wide.
///
/// Never returns null: a negative size, a non-positive width, or an
/// exhausted heap terminates the program.
#[no_mangle]
pub extern "C" fn _bril_alloc(size: i64, bytes: i64) -> *mut c_void {
    ffi_fatal!(ALLOC, { alloc(size, bytes) })
}

/// Free an array returned by `_bril_alloc`.
///
/// Null, misaligned, foreign or already-freed addresses terminate the
/// program.
#[no_mangle]
pub extern "C" fn _bril_free(ptr: *mut c_void) {
    // SAFETY: ptr came from compiled code, which only holds addresses
    // returned by _bril_alloc.
    ffi_fatal!(FREE, { unsafe { free(ptr) } })
}

/// Element count of a live array.
#[no_mangle]
pub extern "C" fn _bril_array_len(ptr: *const c_void) -> i64 {
    ffi_fatal!(ARRAY_LEN, {
        // SAFETY: as for _bril_free.
        unsafe { info(ptr, ARRAY_LEN) }.map(|info| info.length as i64)
    })
}

/// Element width in bytes of a live array.
#[no_mangle]
pub extern "C" fn _bril_array_width(ptr: *const c_void) -> i64 {
    ffi_fatal!(ARRAY_WIDTH, {
        // SAFETY: as for _bril_free.
        unsafe { info(ptr, ARRAY_WIDTH) }.map(|info| info.element_width as i64)
    })
}

/// Terminate unless `0 <= idx < length` for the live array at `ptr`.
#[no_mangle]
pub extern "C" fn _bril_check_index(ptr: *const c_void, idx: i64) {
    ffi_fatal!(CHECK_INDEX, {
        // SAFETY: as for _bril_free.
        unsafe { check_index(ptr.cast(), idx) }
            .map(drop)
            .map_err(|e| RuntimeError::alloc(CHECK_INDEX, e))
    })
}

/// Classify `ptr` without terminating: `RT_STATUS_OK` for a live array,
/// otherwise the header fault.
#[no_mangle]
pub extern "C" fn _bril_array_status(ptr: *const c_void) -> i32 {
    ffi_guard!({
        // SAFETY: as for _bril_free.
        RtStatus::from(unsafe { array_info(ptr.cast()) }) as i32
    })
}

/// Free `ptr` and report the outcome as a status instead of terminating.
#[no_mangle]
pub extern "C" fn _bril_try_free(ptr: *mut c_void) -> i32 {
    ffi_guard!({
        // SAFETY: as for _bril_free.
        RtStatus::from(unsafe { allocator().free(ptr.cast()) }) as i32
    })
}

/// Number of arrays allocated and not yet freed.
#[no_mangle]
pub extern "C" fn _bril_live_allocations() -> i64 {
    i64::try_from(allocator().live()).unwrap_or(i64::MAX)
}

/// Terminate with a leak report if `BRIL_RT_LEAK_CHECK` is enabled and
/// any array is still live. Generated code calls this before returning
/// from `main`.
#[no_mangle]
pub extern "C" fn _bril_check_leaks() {
    ffi_fatal!(CHECK_LEAKS, { check_leaks() })
}
