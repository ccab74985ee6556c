//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
///
/// Reads the filter from `RUST_LOG`. Calling it twice is harmless.
pub fn init() {
    if env_logger::try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

/// Initialize logging for unit tests (captured by the test harness)
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
