use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use crate::Result;

/// Page lifecycle event a navigation waits for before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitUntil {
    #[default]
    DomContentLoaded,
    Load,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationOptions {
    pub wait_until: WaitUntil,
    pub timeout: Duration,
}

impl NavigationOptions {
    pub fn dom_content_loaded(timeout: Duration) -> Self {
        Self {
            wait_until: WaitUntil::DomContentLoaded,
            timeout,
        }
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

/// A single browser page driven by the crawler.
///
/// Every call is a suspension point; implementations are used by one task at
/// a time and never see concurrent navigations.
#[async_trait]
pub trait PageDriver: Send {
    /// Short name used in log lines
    fn name(&self) -> &str;

    /// Navigate to `url`, failing with `NavigationTimeout` past `options.timeout`
    async fn goto(&mut self, url: &str, options: &NavigationOptions) -> Result<()>;

    /// Whether an element matching `selector` is currently rendered and visible
    async fn is_visible(&mut self, selector: &str) -> Result<bool>;

    /// Click the first element matching `selector`
    async fn click(&mut self, selector: &str) -> Result<()>;

    /// Whether at least one element matches `selector`
    async fn query_exists(&mut self, selector: &str) -> Result<bool>;

    /// Evaluate a script in the page and return its JSON result
    async fn evaluate(&mut self, script: &str) -> Result<Value>;

    /// Serialized HTML of the current page
    async fn content(&mut self) -> Result<String>;

    /// Release the page and any browser process behind it
    async fn close(&mut self) -> Result<()>;
}

/// Opens a fresh [`PageDriver`]; a batch launches exactly one.
#[async_trait]
pub trait DriverLauncher: Send + Sync {
    fn name(&self) -> &str;

    async fn launch(&self) -> Result<Box<dyn PageDriver>>;
}
