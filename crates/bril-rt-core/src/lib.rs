//! Core types for the Bril runtime support library.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! fatal-error taxonomy shared by the allocator, the I/O adapters and the
//! C ABI layer, the runtime configuration, and the "report, then
//! terminate" policy applied at the C boundary.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod fatal;

pub use config::{ConfigError, FatalAction, RuntimeConfig};
pub use error::{AllocError, ArgError, ArgType, ErrorKind, RuntimeError};
pub use fatal::{diagnostic, terminate};
