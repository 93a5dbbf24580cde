//! bril-rt: runtime support for compiled Bril programs.
//!
//! This is the facade crate re-exporting the public API of the sub-crates.
//! Code generators link the C symbols from [`ffi`] (or the `bril-rt-ffi`
//! static library directly); Rust hosts and tools use the safe APIs.
//!
//! # Quick start
//!
//! ```rust
//! use bril_rt::prelude::*;
//!
//! let alloc = ArrayAllocator::system();
//! let mut buf = alloc.allocate_buffer(3, 8).unwrap();
//! buf.as_bytes_mut()[..8].copy_from_slice(&7i64.to_ne_bytes());
//! assert_eq!(buf.len(), 3);
//!
//! let mut out = Printer::new(Vec::new());
//! out.print_line(&[Value::Int(buf.len() as i64), Value::Float(0.5)]).unwrap();
//! assert_eq!(out.into_inner(), b"3 0.50000000000000000\n");
//!
//! let args = ["prog", "41"];
//! assert_eq!(parse_int(&args, 1).unwrap() + 1, 42);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `bril-rt-core` | Errors, configuration, fatal reporting |
//! | [`alloc`] | `bril-rt-alloc` | Header layout, backends, `ArrayAllocator`, `ArrayBuffer` |
//! | [`io`] | `bril-rt-io` | Canonical printing and argument decoding |
//! | [`ffi`] | `bril-rt-ffi` | `_bril_*` C entry points and status codes |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Error taxonomy, runtime configuration and fatal reporting (`bril-rt-core`).
pub use bril_rt_core as types;

/// Length-prefixed array allocation (`bril-rt-alloc`).
///
/// [`alloc::ArrayAllocator`] hands out element addresses preceded by an
/// [`alloc::ArrayHeader`]; [`alloc::ArrayBuffer`] owns one array on the
/// Rust side.
pub use bril_rt_alloc as alloc;

/// Canonical printing and argument decoding (`bril-rt-io`).
pub use bril_rt_io as io;

/// C ABI entry points (`bril-rt-ffi`).
///
/// The symbols declared in the generated `rt.h`, plus
/// [`ffi::RtStatus`] and the borrowed [`ffi::RawArgv`] view.
pub use bril_rt_ffi as ffi;

/// Common imports for Rust hosts.
///
/// ```rust
/// use bril_rt::prelude::*;
/// ```
pub mod prelude {
    // Allocation
    pub use bril_rt_alloc::{ArrayAllocator, ArrayBuffer, ArrayInfo, Backend, SystemBackend};

    // I/O
    pub use bril_rt_io::{parse_bool, parse_float, parse_int, parse_value, ArgSource, Printer, Value};

    // Errors and configuration
    pub use bril_rt_core::{
        AllocError, ArgError, ArgType, ErrorKind, FatalAction, RuntimeConfig, RuntimeError,
    };
}
