use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{EventDomContentEventFired, NavigateParams};
use chromiumoxide::Page;
use futures::StreamExt;
use nt_core::{DriverLauncher, Error, NavigationOptions, PageDriver, Result, WaitUntil};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

fn driver_error(e: impl std::fmt::Display) -> Error {
    Error::Driver(e.to_string())
}

/// A single tab in a locally launched Chromium.
pub struct ChromiumDriver {
    browser: Browser,
    page: Option<Page>,
    handler: JoinHandle<()>,
}

impl ChromiumDriver {
    pub async fn launch(headless: bool) -> Result<Self> {
        let mut builder = BrowserConfig::builder();
        if !headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(Error::Driver)?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(driver_error)?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "Browser handler stopped");
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await.map_err(driver_error)?;
        Ok(Self {
            browser,
            page: Some(page),
            handler,
        })
    }

    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| Error::Driver("page already closed".to_string()))
    }

    async fn eval_bool(&self, script: String) -> Result<bool> {
        self.page()?
            .evaluate(script)
            .await
            .map_err(driver_error)?
            .into_value::<bool>()
            .map_err(driver_error)
    }
}

/// Navigates `page` and returns once the event named by `wait_until` fired.
async fn navigate(page: &Page, url: &str, wait_until: WaitUntil) -> Result<()> {
    match wait_until {
        WaitUntil::Load => {
            page.goto(url).await.map_err(|e| Error::navigation(url, e))?;
        }
        WaitUntil::DomContentLoaded => {
            // Subscribe first so the event cannot fire before we listen
            let mut loaded = page
                .event_listener::<EventDomContentEventFired>()
                .await
                .map_err(driver_error)?;
            let response = page
                .execute(NavigateParams::new(url))
                .await
                .map_err(|e| Error::navigation(url, e))?;
            if let Some(reason) = &response.result.error_text {
                return Err(Error::navigation(url, reason));
            }
            loaded
                .next()
                .await
                .ok_or_else(|| Error::navigation(url, "page closed before DOMContentLoaded"))?;
        }
    }
    Ok(())
}

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    fn name(&self) -> &str {
        "chromium"
    }

    async fn goto(&mut self, url: &str, options: &NavigationOptions) -> Result<()> {
        let page = self.page()?;
        match tokio::time::timeout(options.timeout, navigate(page, url, options.wait_until)).await {
            Ok(result) => result,
            Err(_) => Err(Error::NavigationTimeout {
                url: url.to_string(),
                timeout_ms: options.timeout_ms(),
            }),
        }
    }

    async fn is_visible(&mut self, selector: &str) -> Result<bool> {
        let script = format!(
            "(() => {{ const el = document.querySelector({}); if (!el) return false; \
             const style = window.getComputedStyle(el); const rect = el.getBoundingClientRect(); \
             return style.display !== 'none' && style.visibility !== 'hidden' && rect.width > 0 && rect.height > 0; }})()",
            js_string(selector)
        );
        self.eval_bool(script).await
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        let element = self
            .page()?
            .find_element(selector)
            .await
            .map_err(|_| Error::SelectorNotFound(selector.to_string()))?;
        element.click().await.map_err(driver_error)?;
        Ok(())
    }

    async fn query_exists(&mut self, selector: &str) -> Result<bool> {
        let script = format!("document.querySelector({}) !== null", js_string(selector));
        self.eval_bool(script).await
    }

    async fn evaluate(&mut self, script: &str) -> Result<Value> {
        let result = self.page()?.evaluate(script).await.map_err(driver_error)?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn content(&mut self) -> Result<String> {
        self.page()?.content().await.map_err(driver_error)
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                warn!(error = %e, "Failed to close page");
            }
        }
        self.browser.close().await.map_err(driver_error)?;
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "Browser process did not exit cleanly");
        }
        self.handler.abort();
        Ok(())
    }
}

/// Launches one Chromium per batch, headful unless asked otherwise.
pub struct ChromiumLauncher {
    headless: bool,
}

impl ChromiumLauncher {
    pub fn new(headless: bool) -> Self {
        Self { headless }
    }
}

#[async_trait]
impl DriverLauncher for ChromiumLauncher {
    fn name(&self) -> &str {
        "chromium"
    }

    async fn launch(&self) -> Result<Box<dyn PageDriver>> {
        debug!(headless = self.headless, "Launching Chromium");
        Ok(Box::new(ChromiumDriver::launch(self.headless).await?))
    }
}
