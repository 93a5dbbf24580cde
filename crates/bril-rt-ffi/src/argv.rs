//! Borrowed view of a C `argv`.

#![allow(unsafe_code)]

use std::ffi::{c_char, CStr};
use std::fmt;
use std::slice;

use bril_rt_io::ArgSource;

/// A NULL-terminated `char **` as an [`ArgSource`].
///
/// The entry count is fixed when the view is created by scanning to the
/// terminator. A null `argv` is treated as empty.
#[derive(Clone, Copy)]
pub struct RawArgv<'a> {
    entries: &'a [*const c_char],
}

impl<'a> RawArgv<'a> {
    /// View `argv`.
    ///
    /// # Safety
    ///
    /// `argv` must be null, or point to a table of pointers ending in a
    /// null entry, each non-null entry a NUL-terminated string. The
    /// table and the strings must stay valid and unmodified for `'a`.
    pub unsafe fn from_ptr(argv: *const *const c_char) -> Self {
        if argv.is_null() {
            return Self { entries: &[] };
        }
        let mut len = 0;
        // SAFETY: the table is NULL-terminated per the caller contract, so
        // every slot up to and including the terminator is readable.
        while !unsafe { *argv.add(len) }.is_null() {
            len += 1;
        }
        // SAFETY: the first `len` slots were just read and are valid for 'a.
        let entries = unsafe { slice::from_raw_parts(argv, len) };
        Self { entries }
    }
}

impl ArgSource for RawArgv<'_> {
    fn arg(&self, index: usize) -> Option<&[u8]> {
        let ptr = *self.entries.get(index)?;
        // SAFETY: every entry before the terminator is a valid C string
        // for the lifetime of the view.
        Some(unsafe { CStr::from_ptr(ptr) }.to_bytes())
    }

    fn count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Debug for RawArgv<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries((0..self.count()).filter_map(|i| self.arg(i)).map(String::from_utf8_lossy))
            .finish()
    }
}
