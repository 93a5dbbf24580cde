//! Panic containment at the C boundary.
//!
//! Two wrappers, matching the two kinds of entry point:
//!
//! - `ffi_fatal!(primitive, { ... })` runs a body producing
//!   `Result<T, RuntimeError>`. `Ok` is returned to C; `Err` terminates
//!   through [`runtime::fail`](crate::runtime::fail).
//! - `ffi_guard!({ ... })` runs a body producing an `i32` status code.
//!
//! In both, a panic is caught before it unwinds into C. A terminating
//! entry point aborts after reporting it; a status entry point returns
//! [`RtStatus::Panicked`](crate::RtStatus::Panicked).

use std::any::Any;
use std::io::Write;

use bril_rt_core::fatal::DIAGNOSTIC_PREFIX;

macro_rules! ffi_fatal {
    ($primitive:expr, $body:block) => {{
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| $body)) {
            Ok(Ok(value)) => value,
            Ok(Err(err)) => $crate::runtime::fail(&err),
            Err(payload) => $crate::guard::panicked($primitive, payload.as_ref()),
        }
    }};
}

macro_rules! ffi_guard {
    ($body:block) => {{
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| $body)) {
            Ok(status) => status,
            Err(_) => $crate::status::RtStatus::Panicked as i32,
        }
    }};
}

/// Text carried by a panic payload, if any.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

/// Report a panic caught in `primitive` and abort.
pub(crate) fn panicked(primitive: &str, payload: &(dyn Any + Send)) -> ! {
    let _ = std::io::stdout().flush();
    eprintln!(
        "{DIAGNOSTIC_PREFIX}: internal error: {primitive} panicked: {}",
        panic_message(payload)
    );
    std::process::abort()
}
