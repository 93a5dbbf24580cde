//! Length-prefixed array allocation for compiled Bril programs.
//!
//! Every array handed to compiled code is a single heap allocation: a
//! fixed 32-byte [`ArrayHeader`] followed by the element region. Callers
//! only ever see the element address; length, element width and the
//! live/freed tag are recovered from a fixed negative offset, so release
//! and bounds checks never need the caller to resupply them. This crate
//! is one of two that may contain `unsafe` code (along with `bril-rt-ffi`).
//!
//! # Layout
//!
//! ```text
//!  header start                                element pointer
//!  │                                           │
//!  ▼                                           ▼
//!  ┌──────────────┬────────────┬───────┬────────┬───────────────────┐
//!  │ element_width│ alloc_size │ state │ length │ elements ...      │
//!  └──────────────┴────────────┴───────┴────────┴───────────────────┘
//!   -32            -24          -16     -8       0
//! ```
//!
//! The allocation is 16-byte aligned, so the element region is 16-byte
//! aligned for every element width.
//!
//! # Misuse detection
//!
//! `free` validates the header tag before releasing. A second `free` of
//! the same address is reported as [`AllocError::DoubleFree`] as long as
//! the backend has not handed the memory out again; beyond that point the
//! behaviour is undefined. There is no registry of live addresses.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod allocator;
pub mod backend;
pub mod buffer;
pub mod layout;
mod raw;
pub mod stats;

pub use allocator::{array_info, check_index, ArrayAllocator};
pub use backend::{Backend, SystemBackend};
pub use bril_rt_core::AllocError;
pub use buffer::ArrayBuffer;
pub use layout::{ArrayHeader, ArrayInfo, HEADER_ALIGN, HEADER_SIZE, LENGTH_OFFSET};
pub use stats::{AllocStats, StatsSnapshot};
