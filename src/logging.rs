//! Logging setup.
//!
//! The planner emits `tracing` events; hosts decide where they go. These
//! helpers install a `tracing-subscriber` fmt subscriber for binaries and
//! tests.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber.
///
/// # Environment
/// - `RUST_LOG`: filter directive (default: `info`),
///   e.g. `RUST_LOG=grading_planner=debug`
///
/// Does nothing if a global subscriber is already installed.
///
/// # Example
/// ```no_run
/// grading_planner::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .try_init();
}

/// Installs a debug-level subscriber writing through the test harness.
///
/// Safe to call from every test.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
