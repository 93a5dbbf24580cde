//! Print entry points.
//!
//! Each call writes one token to stdout and flushes, so output written
//! before a fatal error or a C-level `exit` is never lost.

use std::ffi::c_char;
use std::io::{self, Write};

use bril_rt_core::RuntimeError;
use bril_rt_io::Printer;

const PRINT_INT: &str = "_bril_print_int";
const PRINT_BOOL: &str = "_bril_print_bool";
const PRINT_FLOAT: &str = "_bril_print_float";
const PRINT_SEP: &str = "_bril_print_sep";
const PRINT_END: &str = "_bril_print_end";

/// Run `f` on a printer over `out`, then flush.
///
/// A write or flush failure becomes an output error attributed to
/// `primitive`.
pub fn emit<W, F>(out: W, primitive: &'static str, f: F) -> Result<(), RuntimeError>
where
    W: Write,
    F: FnOnce(&mut Printer<W>) -> io::Result<()>,
{
    let mut printer = Printer::new(out);
    f(&mut printer)
        .and_then(|()| printer.flush())
        .map_err(|e| RuntimeError::output(primitive, &e))
}

fn to_stdout<F>(primitive: &'static str, f: F) -> Result<(), RuntimeError>
where
    F: FnOnce(&mut Printer<io::StdoutLock<'static>>) -> io::Result<()>,
{
    emit(io::stdout().lock(), primitive, f)
}

/// Print a 64-bit integer.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn _bril_print_int(i: i64) {
    ffi_fatal!(PRINT_INT, { to_stdout(PRINT_INT, |p| p.print_int(i)) })
}

/// Print `true` for any non-zero `i`, `false` otherwise.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn _bril_print_bool(i: c_char) {
    ffi_fatal!(PRINT_BOOL, { to_stdout(PRINT_BOOL, |p| p.print_bool(i != 0)) })
}

/// Print a float in canonical form.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn _bril_print_float(f: f64) {
    ffi_fatal!(PRINT_FLOAT, { to_stdout(PRINT_FLOAT, |p| p.print_float(f)) })
}

/// Print the value separator (one space).
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn _bril_print_sep() {
    ffi_fatal!(PRINT_SEP, { to_stdout(PRINT_SEP, Printer::sep) })
}

/// End the line.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn _bril_print_end() {
    ffi_fatal!(PRINT_END, { to_stdout(PRINT_END, Printer::end) })
}
