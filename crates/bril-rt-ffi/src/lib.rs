//! C ABI entry points linked into compiled Bril programs.
//!
//! Every `_bril_*` symbol declared in `include/rt.h` lives here. The
//! library builds as a `staticlib` for linking with generated assembly,
//! a `cdylib` for dynamic loading, and an `rlib` for Rust hosts and tests.
//!
//! Compiled code cannot handle errors, so the entry points it calls
//! (`print`, `parse`, `alloc`, `free`) report any failure on stderr and
//! terminate the process. Each has a safe Rust
//! counterpart returning `Result<_, RuntimeError>` in the module that
//! defines it. The status-returning extras (`_bril_array_status`,
//! `_bril_try_free`) report an [`RtStatus`] instead.
//!
//! This crate is one of two that may contain `unsafe` code (along with
//! `bril-rt-alloc`).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

#[macro_use]
mod guard;

pub mod argv;
pub mod memory;
pub mod parse;
pub mod print;
pub mod runtime;
pub mod status;

pub use argv::RawArgv;
pub use status::RtStatus;
