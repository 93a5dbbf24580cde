//! Error types for the Bril runtime.
//!
//! Organised by subsystem: array allocation ([`AllocError`]), argument
//! decoding ([`ArgError`]) and the C-boundary wrapper ([`RuntimeError`])
//! that records which runtime primitive failed. Every error classifies
//! into one [`ErrorKind`]; all kinds are fatal to a compiled program.

use std::error::Error;
use std::fmt;
use std::io;

/// Fatal-error classes reported to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller-side misuse: bad allocation arguments, invalid or repeated
    /// free, out-of-bounds index, buffers still live at a leak check.
    ContractViolation,
    /// An allocation request could not be satisfied.
    OutOfMemory,
    /// An external argument was missing or could not be decoded.
    ArgumentParseError,
    /// Writing to standard output failed.
    OutputError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContractViolation => write!(f, "contract violation"),
            Self::OutOfMemory => write!(f, "out of memory"),
            Self::ArgumentParseError => write!(f, "argument parse error"),
            Self::OutputError => write!(f, "output error"),
        }
    }
}

/// Errors from the array allocator and deallocator.
///
/// Addresses are recorded as plain integers so the error stays `Send`,
/// comparable, and printable after the memory they name is gone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// `allocate` was called with a negative element count.
    NegativeLength {
        /// The requested length.
        length: i64,
    },
    /// `allocate` was called with a zero or negative element width.
    InvalidElementWidth {
        /// The requested element width in bytes.
        element_width: i64,
    },
    /// `length * element_width` plus the header does not fit in a
    /// single allocation on this platform.
    CapacityOverflow {
        /// The requested length.
        length: i64,
        /// The requested element width in bytes.
        element_width: i64,
    },
    /// The system allocator refused the request.
    OutOfMemory {
        /// Total bytes requested, header included.
        requested: usize,
    },
    /// The address was already released by a previous `free`.
    DoubleFree {
        /// The element address passed to `free`.
        address: usize,
    },
    /// The address does not name a live buffer produced by `allocate`.
    InvalidFree {
        /// The element address passed to `free`.
        address: usize,
        /// Which validation failed.
        reason: &'static str,
    },
    /// A bounds query was made on a buffer that was already freed.
    UseAfterFree {
        /// The element address queried.
        address: usize,
    },
    /// A bounds query was made on an address that is not a live buffer.
    InvalidAddress {
        /// The element address queried.
        address: usize,
        /// Which validation failed.
        reason: &'static str,
    },
    /// A bounds query rejected the index.
    IndexOutOfBounds {
        /// The element address of the buffer.
        address: usize,
        /// The rejected index.
        index: i64,
        /// The buffer's element count.
        length: u64,
    },
    /// Buffers were still live when a leak check ran.
    Leak {
        /// Number of live buffers.
        live: usize,
    },
}

impl AllocError {
    /// The fatal-error class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CapacityOverflow { .. } | Self::OutOfMemory { .. } => ErrorKind::OutOfMemory,
            _ => ErrorKind::ContractViolation,
        }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeLength { length } => {
                write!(f, "array length must be non-negative, got {length}")
            }
            Self::InvalidElementWidth { element_width } => {
                write!(f, "element width must be positive, got {element_width}")
            }
            Self::CapacityOverflow {
                length,
                element_width,
            } => write!(
                f,
                "array of {length} elements x {element_width} bytes exceeds the maximum allocation size"
            ),
            Self::OutOfMemory { requested } => {
                write!(f, "allocation of {requested} bytes failed")
            }
            Self::DoubleFree { address } => {
                write!(f, "double free of array at {address:#x}")
            }
            Self::InvalidFree { address, reason } => {
                write!(f, "invalid array address {address:#x}: {reason}")
            }
            Self::UseAfterFree { address } => {
                write!(f, "use of array at {address:#x} after it was freed")
            }
            Self::InvalidAddress { address, reason } => {
                write!(f, "{address:#x} is not a live array: {reason}")
            }
            Self::IndexOutOfBounds {
                address,
                index,
                length,
            } => write!(
                f,
                "index {index} out of bounds for array at {address:#x} of length {length}"
            ),
            Self::Leak { live } => write!(f, "{live} array(s) were never freed"),
        }
    }
}

impl Error for AllocError {}

/// Primitive type an argument was decoded as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArgType {
    /// 64-bit signed integer.
    Int,
    /// `true` / `false`.
    Bool,
    /// 64-bit IEEE float.
    Float,
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Bool => write!(f, "bool"),
            Self::Float => write!(f, "float"),
        }
    }
}

/// Errors from decoding an external argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgError {
    /// The index is negative or past the end of the argument vector.
    Missing {
        /// The requested index.
        index: i64,
        /// Number of arguments available.
        available: usize,
    },
    /// The argument is not valid UTF-8.
    NotUtf8 {
        /// The requested index.
        index: i64,
    },
    /// The argument text does not decode as the requested type.
    Malformed {
        /// The requested index.
        index: i64,
        /// The offending text.
        text: String,
        /// The type it was decoded as.
        expected: ArgType,
    },
}

impl fmt::Display for ArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { index, available } => write!(
                f,
                "argument {index} requested but only {available} argument(s) were supplied"
            ),
            Self::NotUtf8 { index } => write!(f, "argument {index} is not valid UTF-8"),
            Self::Malformed {
                index,
                text,
                expected,
            } => write!(f, "argument {index} ({text:?}) is not a valid {expected}"),
        }
    }
}

impl Error for ArgError {}

/// A failure at one of the runtime's entry points.
///
/// Carries the name of the primitive that failed so the diagnostic points
/// at the offending call emitted by the code generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuntimeError {
    /// Allocation, deallocation, or a bounds query failed.
    Alloc {
        /// The entry point, e.g. `_bril_alloc`.
        primitive: &'static str,
        /// The underlying error.
        source: AllocError,
    },
    /// Argument decoding failed.
    Arg {
        /// The entry point, e.g. `_bril_parse_int`.
        primitive: &'static str,
        /// The underlying error.
        source: ArgError,
    },
    /// Writing to standard output failed.
    Output {
        /// The entry point, e.g. `_bril_print_int`.
        primitive: &'static str,
        /// The I/O error class.
        kind: io::ErrorKind,
    },
}

impl RuntimeError {
    /// Wrap an allocator error raised by `primitive`.
    pub fn alloc(primitive: &'static str, source: AllocError) -> Self {
        Self::Alloc { primitive, source }
    }

    /// Wrap an argument error raised by `primitive`.
    pub fn arg(primitive: &'static str, source: ArgError) -> Self {
        Self::Arg { primitive, source }
    }

    /// Wrap an output failure raised by `primitive`.
    pub fn output(primitive: &'static str, err: &io::Error) -> Self {
        Self::Output {
            primitive,
            kind: err.kind(),
        }
    }

    /// The fatal-error class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Alloc { source, .. } => source.kind(),
            Self::Arg { .. } => ErrorKind::ArgumentParseError,
            Self::Output { .. } => ErrorKind::OutputError,
        }
    }

    /// The entry point that raised the error.
    pub fn primitive(&self) -> &'static str {
        match self {
            Self::Alloc { primitive, .. }
            | Self::Arg { primitive, .. }
            | Self::Output { primitive, .. } => primitive,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alloc { primitive, source } => write!(f, "{primitive}: {source}"),
            Self::Arg { primitive, source } => write!(f, "{primitive}: {source}"),
            Self::Output { primitive, kind } => {
                write!(f, "{primitive}: write to stdout failed ({kind})")
            }
        }
    }
}

impl Error for RuntimeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Alloc { source, .. } => Some(source),
            Self::Arg { source, .. } => Some(source),
            Self::Output { .. } => None,
        }
    }
}
