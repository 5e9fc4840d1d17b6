use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Level used when the requested filter cannot be parsed.
pub const DEFAULT_LEVEL: &str = "info";

/// Installs the global `fmt` subscriber once.
///
/// `level` is an `EnvFilter` directive such as `debug` or
/// `nt_scrappers=debug,info`; an invalid directive falls back to
/// [`DEFAULT_LEVEL`]. Later calls, and calls after another subscriber was
/// set, do nothing.
pub fn init_logging(level: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    INIT.call_once(|| {
        let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    });
}
