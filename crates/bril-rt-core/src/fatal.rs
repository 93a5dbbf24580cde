//! Fatal-error reporting.
//!
//! Compiled Bril code cannot catch anything, so every error that reaches
//! the C boundary ends the process: standard output is flushed first so
//! the program's own output is not lost, then a one-line diagnostic goes
//! to standard error.

use std::io::Write;

use crate::config::{FatalAction, RuntimeConfig};
use crate::error::RuntimeError;

/// Prefix of every diagnostic line.
pub const DIAGNOSTIC_PREFIX: &str = "bril-rt";

/// Render the diagnostic line for `err` (without trailing newline).
pub fn diagnostic(err: &RuntimeError) -> String {
    format!("{DIAGNOSTIC_PREFIX}: {}: {err}", err.kind())
}

/// Report `err` on standard error and terminate according to `config`.
pub fn terminate(err: &RuntimeError, config: &RuntimeConfig) -> ! {
    let _ = std::io::stdout().flush();
    eprintln!("{}", diagnostic(err));
    match config.fatal_action {
        FatalAction::Exit => std::process::exit(config.exit_code),
        FatalAction::Abort => std::process::abort(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AllocError, ArgError};

    #[test]
    fn diagnostic_names_kind_primitive_and_detail() {
        let err = RuntimeError::alloc(
            "_bril_alloc",
            AllocError::NegativeLength { length: -1 },
        );
        assert_eq!(
            diagnostic(&err),
            "bril-rt: contract violation: _bril_alloc: array length must be non-negative, got -1"
        );
    }

    #[test]
    fn diagnostic_for_missing_argument() {
        let err = RuntimeError::arg(
            "_bril_parse_bool",
            ArgError::Missing {
                index: 3,
                available: 1,
            },
        );
        let line = diagnostic(&err);
        assert!(line.starts_with("bril-rt: argument parse error: _bril_parse_bool:"));
        assert!(!line.ends_with('\n'));
    }
}
