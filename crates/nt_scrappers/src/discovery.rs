use nt_core::{Candidate, Error, NavigationOptions, PageDriver, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::driver::SCROLL_SCRIPT;
use crate::extract::{absolutize, parse_selector, visible_text, Page};
use crate::scrapers::SiteProfile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    pub navigation_timeout: Duration,
    pub poll_interval: Duration,
    /// Presence checks before giving up on the trending section
    pub max_polls: u32,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(1),
            max_polls: 30,
        }
    }
}

/// Finds the candidates listed in a site's trending section.
pub struct ArticleDiscoverer<'a> {
    profile: &'a SiteProfile,
    config: DiscoveryConfig,
}

impl<'a> ArticleDiscoverer<'a> {
    pub fn new(profile: &'a SiteProfile, config: DiscoveryConfig) -> Self {
        Self { profile, config }
    }

    /// Loads the index page and reads the trending list.
    ///
    /// Fails when the index cannot be loaded or the trending section does not
    /// show up within `max_polls` checks.
    pub async fn discover(&self, driver: &mut dyn PageDriver) -> Result<Vec<Candidate>> {
        let url = &self.profile.index_url;
        info!("{} Loading index {}", self.profile.metadata.emoji, url);

        let options = NavigationOptions::dom_content_loaded(self.config.navigation_timeout);
        driver
            .goto(url, &options)
            .await
            .map_err(|e| Error::Discovery(format!("index unreachable: {}", e)))?;

        self.dismiss_cookie_banner(driver).await;
        self.wait_for_trending(driver).await?;

        let html = driver.content().await?;
        let candidates = parse_trending(&html, self.profile)?;
        info!(count = candidates.len(), "Found trending articles");
        Ok(candidates)
    }

    /// Clicks the consent button when it is showing. Never fails.
    async fn dismiss_cookie_banner(&self, driver: &mut dyn PageDriver) {
        let Some(button) = &self.profile.cookie_banner else {
            return;
        };

        match driver.is_visible(button).await {
            Ok(true) => match driver.click(button).await {
                Ok(()) => info!("Cookie banner accepted"),
                Err(e) => warn!(error = %e, "Failed to accept cookie banner"),
            },
            Ok(false) => debug!("No cookie banner found"),
            Err(e) => warn!(error = %e, "Could not look for cookie banner"),
        }
    }

    async fn wait_for_trending(&self, driver: &mut dyn PageDriver) -> Result<()> {
        let container = &self.profile.trending.container;

        for poll in 1..=self.config.max_polls {
            let present = driver
                .query_exists(container)
                .await
                .map_err(|e| Error::Discovery(format!("could not query {}: {}", container, e)))?;
            if present {
                debug!(poll, "Trending section present");
                return Ok(());
            }
            if poll == self.config.max_polls {
                break;
            }

            debug!(poll, "Trending section not rendered yet, scrolling");
            if let Err(e) = driver.evaluate(SCROLL_SCRIPT).await {
                debug!(error = %e, "Scroll failed");
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }

        Err(Error::DiscoveryTimeout {
            selector: container.clone(),
            attempts: self.config.max_polls,
        })
    }
}

/// Reads candidates from the trending list of an index page.
///
/// Items without a headline or link, or whose headline yields no slug, are
/// skipped.
pub fn parse_trending(html: &str, profile: &SiteProfile) -> Result<Vec<Candidate>> {
    let selectors = &profile.trending;
    let item = parse_selector(&selectors.item)?;
    let headline = parse_selector(&selectors.headline)?;
    let link = parse_selector(&selectors.link)?;

    let page = Page::parse(html, &profile.origin);
    let mut candidates = Vec::new();

    for (i, element) in page.document().select(&item).enumerate() {
        let Some(title) = element
            .select(&headline)
            .next()
            .map(|el| visible_text(el, &[]))
            .filter(|t| !t.is_empty())
        else {
            warn!(item = i, "Skipping trending item without headline");
            continue;
        };

        let Some(href) = element
            .select(&link)
            .next()
            .and_then(|el| el.value().attr("href"))
        else {
            warn!(item = i, headline = %title, "Skipping trending item without link");
            continue;
        };

        let url = match absolutize(&profile.origin, href) {
            Ok(url) => url,
            Err(e) => {
                warn!(item = i, error = %e, "Skipping trending item with bad link");
                continue;
            }
        };

        match Candidate::new(title, url) {
            Some(candidate) => candidates.push(candidate),
            None => warn!(item = i, "Skipping trending item whose headline has no letters"),
        }
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::aljazeera;

    const TRENDING: &str = r#"
        <div class="trending-articles">
          <ol class="trending-articles__list">
            <li><a class="article-trending__title-link" href="/news/2024/10/12/storm"><h3 class="article-trending__title"><span>Storm hits coastal city</span></h3></a></li>
            <li><a class="article-trending__title-link" href="/news/2024/10/12/no-headline"></a></li>
            <li><h3 class="article-trending__title"><span>Missing link here</span></h3></li>
            <li><a class="article-trending__title-link" href="/news/2024"><h3 class="article-trending__title"><span>2024 2025 2026</span></h3></a></li>
            <li><a class="article-trending__title-link" href="https://www.aljazeera.com/sport/final"><h3 class="article-trending__title"><span>Cup final ends</span></h3></a></li>
          </ol>
        </div>
    "#;

    #[test]
    fn test_parse_trending_skips_incomplete_items() {
        let profile = aljazeera::profile();
        let candidates = parse_trending(TRENDING, &profile).unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].headline, "Storm hits coastal city");
        assert_eq!(candidates[0].link, "https://www.aljazeera.com/news/2024/10/12/storm");
        assert_eq!(candidates[0].slug, "stormhitscoastal");
        assert_eq!(candidates[1].link, "https://www.aljazeera.com/sport/final");
        assert_eq!(candidates[1].slug, "cupfinalends");
    }

    #[test]
    fn test_parse_trending_without_section() {
        let profile = aljazeera::profile();
        assert!(parse_trending("<p>nothing</p>", &profile).unwrap().is_empty());
    }
}
