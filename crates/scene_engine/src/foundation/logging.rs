//! Logging utilities
//!
//! Thin wrappers around `env_logger` so binaries and tests initialize
//! logging the same way. Library code logs through the `log` macros and
//! never initializes a logger itself.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system for a binary
///
/// Reads the `RUST_LOG` environment variable for filtering.
/// Panics if a logger was already installed.
pub fn init() {
    env_logger::init();
}

/// Initialize logging for tests
///
/// Captures output per test and tolerates repeated initialization, so any
/// test may call this without coordinating with the others.
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
