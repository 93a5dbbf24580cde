//! C-compatible status codes.
//!
//! [`RtStatus`] is a `repr(i32)` enum covering every failure the runtime
//! reports. Conversions from the Rust error types are provided.

use bril_rt_core::{AllocError, ArgError, RuntimeError};

/// Status code returned by the non-terminating entry points.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RtStatus {
    /// Success.
    Ok = 0,
    /// Negative length or non-positive element width.
    InvalidArgument = -1,
    /// The allocation could not be satisfied.
    OutOfMemory = -2,
    /// The array was already freed.
    DoubleFree = -3,
    /// The address is not an array produced by the allocator.
    InvalidAddress = -4,
    /// The array was freed before this query.
    UseAfterFree = -5,
    /// Index outside `0..length`.
    IndexOutOfBounds = -6,
    /// Arrays were still live at a leak check.
    Leak = -7,
    /// An argument was missing or malformed.
    ArgumentParse = -8,
    /// Writing to standard output failed.
    Output = -9,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&AllocError> for RtStatus {
    fn from(e: &AllocError) -> Self {
        match e {
            AllocError::NegativeLength { .. } | AllocError::InvalidElementWidth { .. } => {
                RtStatus::InvalidArgument
            }
            AllocError::CapacityOverflow { .. } | AllocError::OutOfMemory { .. } => {
                RtStatus::OutOfMemory
            }
            AllocError::DoubleFree { .. } => RtStatus::DoubleFree,
            AllocError::InvalidFree { .. } | AllocError::InvalidAddress { .. } => {
                RtStatus::InvalidAddress
            }
            AllocError::UseAfterFree { .. } => RtStatus::UseAfterFree,
            AllocError::IndexOutOfBounds { .. } => RtStatus::IndexOutOfBounds,
            AllocError::Leak { .. } => RtStatus::Leak,
        }
    }
}

impl From<&ArgError> for RtStatus {
    fn from(_e: &ArgError) -> Self {
        RtStatus::ArgumentParse
    }
}

impl From<&RuntimeError> for RtStatus {
    fn from(e: &RuntimeError) -> Self {
        match e {
            RuntimeError::Alloc { source, .. } => RtStatus::from(source),
            RuntimeError::Arg { source, .. } => RtStatus::from(source),
            RuntimeError::Output { .. } => RtStatus::Output,
        }
    }
}

impl<T> From<Result<T, AllocError>> for RtStatus {
    fn from(result: Result<T, AllocError>) -> Self {
        match result {
            Ok(_) => RtStatus::Ok,
            Err(e) => RtStatus::from(&e),
        }
    }
}
