//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`.
///
/// Panics if a logger is already installed; use [`try_init`] when that can
/// happen (tests, demos that may be embedded).
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system, ignoring an already-installed logger
pub fn try_init() {
    let _ = env_logger::builder().is_test(cfg!(test)).try_init();
}
