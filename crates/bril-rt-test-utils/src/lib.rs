//! Test backends and fixtures for bril-rt development.
//!
//! - [`CountingBackend`] tracks outstanding blocks for leak assertions.
//! - [`QuarantineBackend`] defers real release until it is dropped, so a
//!   freed header stays readable and double frees can be observed.
//! - [`OwnedArgv`] builds a C-style, NULL-terminated `argv`.
//! - [`SharedBuf`] is a cloneable `Write` sink for capturing output.

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod argv;
pub mod backends;
pub mod output;

pub use argv::OwnedArgv;
pub use backends::{CountingBackend, QuarantineBackend};
pub use output::{FailingWriter, SharedBuf};
