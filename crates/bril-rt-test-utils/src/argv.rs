//! C-style argument vectors.

use std::ffi::{c_char, CString};

/// A NULL-terminated `argv` that owns its strings.
///
/// The pointer table stays valid as long as the `OwnedArgv` is alive.
pub struct OwnedArgv {
    strings: Vec<CString>,
    pointers: Vec<*const c_char>,
}

impl OwnedArgv {
    /// Build from `args`. Panics if an argument contains an interior NUL.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        let strings: Vec<CString> = args
            .into_iter()
            .map(|s| CString::new(s).expect("argument contains NUL"))
            .collect();
        let mut pointers: Vec<*const c_char> = strings.iter().map(|s| s.as_ptr()).collect();
        pointers.push(std::ptr::null());
        Self { strings, pointers }
    }

    /// `argv` as compiled code receives it.
    pub fn as_ptr(&self) -> *const *const c_char {
        self.pointers.as_ptr()
    }

    /// `argv` in the mutable form declared by the C header.
    pub fn as_mut_ptr(&mut self) -> *mut *mut c_char {
        self.pointers.as_mut_ptr() as *mut *mut c_char
    }

    /// Number of arguments, excluding the NULL terminator.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argv_is_null_terminated() {
        let argv = OwnedArgv::new(["prog", "12"]);
        assert_eq!(argv.len(), 2);
        // SAFETY: the table has len() + 1 entries.
        let last = unsafe { *argv.as_ptr().add(2) };
        assert!(last.is_null());
    }
}
