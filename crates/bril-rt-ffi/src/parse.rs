//! Argument entry points.
//!
//! `args` is the `argv` the C `main` received, passed through unchanged,
//! and `idx` indexes it directly (index 0 is the program name).

use std::ffi::c_char;

use bril_rt_core::RuntimeError;
use bril_rt_io::{parse_bool, parse_float, parse_int, ArgSource};

use crate::argv::RawArgv;

const PARSE_INT: &str = "_bril_parse_int";
const PARSE_BOOL: &str = "_bril_parse_bool";
const PARSE_FLOAT: &str = "_bril_parse_float";

/// Decode argument `idx` as an integer, attributing errors to `_bril_parse_int`.
pub fn int_arg<A: ArgSource + ?Sized>(args: &A, idx: i64) -> Result<i64, RuntimeError> {
    parse_int(args, idx).map_err(|e| RuntimeError::arg(PARSE_INT, e))
}

/// Decode argument `idx` as a boolean, attributing errors to `_bril_parse_bool`.
pub fn bool_arg<A: ArgSource + ?Sized>(args: &A, idx: i64) -> Result<bool, RuntimeError> {
    parse_bool(args, idx).map_err(|e| RuntimeError::arg(PARSE_BOOL, e))
}

/// Decode argument `idx` as a float, attributing errors to `_bril_parse_float`.
pub fn float_arg<A: ArgSource + ?Sized>(args: &A, idx: i64) -> Result<f64, RuntimeError> {
    parse_float(args, idx).map_err(|e| RuntimeError::arg(PARSE_FLOAT, e))
}

#[allow(unsafe_code)]
unsafe fn view<'a>(args: *mut *mut c_char) -> RawArgv<'a> {
    // SAFETY: forwarded caller contract.
    unsafe { RawArgv::from_ptr(args as *const *const c_char) }
}

/// Decode `args[idx]` as a 64-bit integer.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn _bril_parse_int(args: *mut *mut c_char, idx: i64) -> i64 {
    ffi_fatal!(PARSE_INT, {
        // SAFETY: args is a NULL-terminated argv per caller contract.
        let argv = unsafe { view(args) };
        int_arg(&argv, idx)
    })
}

/// Decode `args[idx]` as `true` (1) or `false` (0).
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn _bril_parse_bool(args: *mut *mut c_char, idx: i64) -> c_char {
    ffi_fatal!(PARSE_BOOL, {
        // SAFETY: args is a NULL-terminated argv per caller contract.
        let argv = unsafe { view(args) };
        bool_arg(&argv, idx).map(c_char::from)
    })
}

/// Decode `args[idx]` as a 64-bit float.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn _bril_parse_float(args: *mut *mut c_char, idx: i64) -> f64 {
    ffi_fatal!(PARSE_FLOAT, {
        // SAFETY: args is a NULL-terminated argv per caller contract.
        let argv = unsafe { view(args) };
        float_arg(&argv, idx)
    })
}
