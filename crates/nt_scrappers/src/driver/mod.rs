use nt_core::{DriverLauncher, Error, Result};
use std::time::Duration;

pub mod http;
#[cfg(feature = "chromium")]
pub mod chromium;

pub use http::{HttpDriver, HttpLauncher};
#[cfg(feature = "chromium")]
pub use chromium::{ChromiumDriver, ChromiumLauncher};

/// Page drivers the CLI can select by name.
pub const DRIVERS: &[&str] = &["http", "chromium"];

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Window scroll used while waiting for lazily rendered sections.
pub const SCROLL_SCRIPT: &str = "window.scrollBy(0, window.innerHeight)";

/// Builds the launcher named by `kind`.
pub fn create_launcher(kind: &str, headless: bool) -> Result<Box<dyn DriverLauncher>> {
    match kind {
        "http" => Ok(Box::new(HttpLauncher::new(CONNECT_TIMEOUT)?)),
        #[cfg(feature = "chromium")]
        "chromium" => Ok(Box::new(ChromiumLauncher::new(headless))),
        #[cfg(not(feature = "chromium"))]
        "chromium" => {
            let _ = headless;
            Err(Error::Config(
                "driver 'chromium' was not compiled in; rebuild with --features chromium".to_string(),
            ))
        }
        other => Err(Error::Config(format!(
            "unknown driver '{}', expected one of: {}",
            other,
            DRIVERS.join(", ")
        ))),
    }
}
