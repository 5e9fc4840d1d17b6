use async_trait::async_trait;
use nt_core::{DriverLauncher, Error, NavigationOptions, PageDriver, Result};
use scraper::Html;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::extract::parse_selector;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Driver that fetches pages over plain HTTP and queries the static markup.
///
/// Nothing is rendered: scripts never run, so `evaluate` and `click` are
/// unsupported and visibility is approximated by presence.
pub struct HttpDriver {
    client: reqwest::Client,
    current: Option<String>,
}

impl HttpDriver {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            current: None,
        }
    }

    fn page(&self) -> Result<&str> {
        self.current
            .as_deref()
            .ok_or_else(|| Error::Driver("no page loaded".to_string()))
    }

    fn matches(&self, selector: &str) -> Result<bool> {
        let parsed = parse_selector(selector)?;
        let document = Html::parse_document(self.page()?);
        let found = document.select(&parsed).next().is_some();
        Ok(found)
    }
}

#[async_trait]
impl PageDriver for HttpDriver {
    fn name(&self) -> &str {
        "http"
    }

    async fn goto(&mut self, url: &str, options: &NavigationOptions) -> Result<()> {
        // The whole response body is the page, so every wait condition holds once it arrives
        debug!(url, wait_until = ?options.wait_until, timeout_ms = options.timeout_ms(), "Fetching page");
        let request = async {
            let response = self
                .client
                .get(url)
                .send()
                .await?
                .error_for_status()?;
            response.text().await
        };

        let html = tokio::time::timeout(options.timeout, request)
            .await
            .map_err(|_| Error::NavigationTimeout {
                url: url.to_string(),
                timeout_ms: options.timeout_ms(),
            })?
            .map_err(|e| Error::navigation(url, e))?;

        self.current = Some(html);
        Ok(())
    }

    async fn is_visible(&mut self, selector: &str) -> Result<bool> {
        self.matches(selector)
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        Err(Error::Driver(format!(
            "cannot click {} on a static page",
            selector
        )))
    }

    async fn query_exists(&mut self, selector: &str) -> Result<bool> {
        self.matches(selector)
    }

    async fn evaluate(&mut self, _script: &str) -> Result<Value> {
        Err(Error::Driver(
            "script evaluation needs a browser driver".to_string(),
        ))
    }

    async fn content(&mut self) -> Result<String> {
        self.page().map(str::to_string)
    }

    async fn close(&mut self) -> Result<()> {
        self.current = None;
        Ok(())
    }
}

/// Launches [`HttpDriver`]s sharing one connection pool.
pub struct HttpLauncher {
    client: reqwest::Client,
}

impl HttpLauncher {
    pub fn new(connect_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DriverLauncher for HttpLauncher {
    fn name(&self) -> &str {
        "http"
    }

    async fn launch(&self) -> Result<Box<dyn PageDriver>> {
        Ok(Box::new(HttpDriver::new(self.client.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(html: &str) -> HttpDriver {
        let mut driver = HttpDriver::new(reqwest::Client::new());
        driver.current = Some(html.to_string());
        driver
    }

    #[tokio::test]
    async fn test_queries_static_markup() {
        let mut driver = loaded(r#"<section class="trending-articles"><ul><li>a</li></ul></section>"#);
        assert!(driver.query_exists(".trending-articles").await.unwrap());
        assert!(driver.is_visible(".trending-articles li").await.unwrap());
        assert!(!driver.query_exists("#onetrust-accept-btn-handler").await.unwrap());
    }

    #[tokio::test]
    async fn test_unsupported_operations() {
        let mut driver = loaded("<p></p>");
        assert!(matches!(driver.evaluate("1 + 1").await, Err(Error::Driver(_))));
        assert!(matches!(driver.click("p").await, Err(Error::Driver(_))));
    }

    #[tokio::test]
    async fn test_content_requires_navigation() {
        let mut driver = HttpDriver::new(reqwest::Client::new());
        assert!(matches!(driver.content().await, Err(Error::Driver(_))));

        let mut driver = loaded("<p>hi</p>");
        assert_eq!(driver.content().await.unwrap(), "<p>hi</p>");
        driver.close().await.unwrap();
        assert!(driver.content().await.is_err());
    }
}
