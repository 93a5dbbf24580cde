//! Canonical printing and argument decoding for compiled Bril programs.
//!
//! Both halves are stateless: [`Printer`] renders values to any
//! [`std::io::Write`], and the `parse_*` functions decode one entry of an
//! [`ArgSource`]. The C ABI layer binds them to stdout and `argv`.
//!
//! # Canonical forms
//!
//! | value | text |
//! |-------|------|
//! | int   | signed decimal, `-42`, `0` |
//! | bool  | `true` / `false` |
//! | float | 17 fractional digits, `3.00000000000000000` |
//! | float, non-finite | `NaN`, `Infinity`, `-Infinity` |
//! | float, `abs >= 1e21` | shortest exponent form, `1e+21` |
//!
//! Negative zero prints as `0.00000000000000000`. Values are separated by
//! a single space and lines end with `\n`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod args;
pub mod format;
pub mod printer;
pub mod value;

pub use args::{parse_bool, parse_float, parse_int, parse_value, ArgSource};
pub use format::{bool_text, float_text, int_text};
pub use printer::Printer;
pub use value::Value;
