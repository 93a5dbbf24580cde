//! Runtime configuration, validation, and error types.
//!
//! [`RuntimeConfig`] controls how fatal errors terminate the process and
//! how the allocator initialises element memory. Compiled programs have
//! no way to pass options, so the C ABI layer reads it once from the
//! environment via [`RuntimeConfig::from_env`].

use std::error::Error;
use std::fmt;

// ── FatalAction ────────────────────────────────────────────────────

/// How the process terminates after a fatal error has been reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FatalAction {
    /// `exit(exit_code)`: runs C `atexit` handlers and flushes stdio.
    Exit,
    /// `abort()`: raises `SIGABRT`, useful under a debugger.
    Abort,
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while loading or validating a [`RuntimeConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable holds an unrecognised value.
    InvalidValue {
        /// The variable name.
        var: &'static str,
        /// The rejected value.
        value: String,
    },
    /// `exit_code` is outside `1..=255`.
    ExitCodeOutOfRange {
        /// The configured code.
        code: i32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { var, value } => {
                write!(f, "invalid value {value:?} for {var}")
            }
            Self::ExitCodeOutOfRange { code } => {
                write!(f, "exit code must be in 1..=255, got {code}")
            }
        }
    }
}

impl Error for ConfigError {}

// ── RuntimeConfig ──────────────────────────────────────────────────

/// Complete runtime configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Termination mode after a fatal error. Default: [`FatalAction::Exit`].
    pub fatal_action: FatalAction,
    /// Process exit status used by [`FatalAction::Exit`]. Default: 2.
    pub exit_code: i32,
    /// Zero the element region of every new array. Default: true.
    pub zero_init: bool,
    /// Treat live arrays at a leak check as a fatal error. Default: false.
    pub leak_check: bool,
}

impl RuntimeConfig {
    /// Selects [`FatalAction`]: `exit` or `abort`.
    pub const ENV_FATAL: &'static str = "BRIL_RT_FATAL";
    /// Overrides [`RuntimeConfig::exit_code`].
    pub const ENV_EXIT_CODE: &'static str = "BRIL_RT_EXIT_CODE";
    /// Overrides [`RuntimeConfig::zero_init`].
    pub const ENV_ZERO_INIT: &'static str = "BRIL_RT_ZERO_INIT";
    /// Overrides [`RuntimeConfig::leak_check`].
    pub const ENV_LEAK_CHECK: &'static str = "BRIL_RT_LEAK_CHECK";

    /// Default exit status for fatal errors.
    pub const DEFAULT_EXIT_CODE: i32 = 2;

    /// Load from the process environment, falling back to defaults for
    /// unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(Self::ENV_FATAL) {
            config.fatal_action = match value.trim().to_ascii_lowercase().as_str() {
                "exit" => FatalAction::Exit,
                "abort" => FatalAction::Abort,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: Self::ENV_FATAL,
                        value,
                    })
                }
            };
        }
        if let Some(value) = lookup(Self::ENV_EXIT_CODE) {
            config.exit_code = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    var: Self::ENV_EXIT_CODE,
                    value: value.clone(),
                })?;
        }
        if let Some(value) = lookup(Self::ENV_ZERO_INIT) {
            config.zero_init = parse_flag(Self::ENV_ZERO_INIT, value)?;
        }
        if let Some(value) = lookup(Self::ENV_LEAK_CHECK) {
            config.leak_check = parse_flag(Self::ENV_LEAK_CHECK, value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate all invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 0 would report success after a fatal error.
        if !(1..=255).contains(&self.exit_code) {
            return Err(ConfigError::ExitCodeOutOfRange {
                code: self.exit_code,
            });
        }
        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            fatal_action: FatalAction::Exit,
            exit_code: Self::DEFAULT_EXIT_CODE,
            zero_init: true,
            leak_check: false,
        }
    }
}

fn parse_flag(var: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue { var, value }),
    }
}
