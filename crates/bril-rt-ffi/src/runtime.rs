//! Process-wide runtime state behind the C entry points.
//!
//! Configuration is read from the environment on first use and never
//! again. The allocator is created on first use from that configuration.
//! Both live for the rest of the process.

use std::sync::OnceLock;

use bril_rt_alloc::{ArrayAllocator, SystemBackend};
use bril_rt_core::fatal::DIAGNOSTIC_PREFIX;
use bril_rt_core::{terminate, RuntimeConfig, RuntimeError};

static CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();
static ALLOCATOR: OnceLock<ArrayAllocator> = OnceLock::new();

/// The runtime configuration.
///
/// An invalid environment is reported on stderr once and the defaults
/// are used instead.
pub fn config() -> &'static RuntimeConfig {
    CONFIG.get_or_init(|| {
        RuntimeConfig::from_env().unwrap_or_else(|e| {
            eprintln!("{DIAGNOSTIC_PREFIX}: ignoring invalid configuration: {e}");
            RuntimeConfig::default()
        })
    })
}

/// The allocator shared by `_bril_alloc` and `_bril_free`.
pub fn allocator() -> &'static ArrayAllocator {
    ALLOCATOR.get_or_init(|| ArrayAllocator::with_backend(SystemBackend, config().zero_init))
}

/// Report `err` and end the process as configured.
pub fn fail(err: &RuntimeError) -> ! {
    terminate(err, config())
}
