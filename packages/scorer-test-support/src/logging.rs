//! Test logging shared by the scorer's unit tests, its integration tests
//! and the CLI tests.
//!
//! ```bash
//! TEST_LOG=scorer=debug cargo test -p scorer
//! ```

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INSTALLED: OnceCell<()> = OnceCell::new();

fn filter() -> EnvFilter {
    ["TEST_LOG", "RUST_LOG"]
        .iter()
        .find_map(|key| std::env::var(key).ok())
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

/// Install a compact subscriber writing through the test harness.
///
/// Idempotent. `TEST_LOG` wins over `RUST_LOG`; both unset means `warn`.
pub fn init() {
    INSTALLED.get_or_init(|| {
        fmt()
            .compact()
            .with_env_filter(filter())
            .with_test_writer()
            .without_time()
            .with_target(false)
            .try_init()
            .ok();
    });
}
