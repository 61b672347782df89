//! Unified test logging initialization
//!
//! Used by the backend's `#[ctor]` hooks in both unit tests and integration
//! test binaries.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Initialize structured logging for tests.
///
/// Idempotent and race-safe. The filter is read from `TEST_LOG`, then
/// `RUST_LOG`, and falls back to `"warn"`.
///
/// ```bash
/// TEST_LOG=session_backend=debug cargo test -p session-backend
/// ```
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // cargo/nextest capture
            .without_time()
            .try_init()
            .ok();
    });
}
