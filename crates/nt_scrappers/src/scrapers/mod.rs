use nt_core::{Error, FieldDefaults, Result};
use regex::Regex;
use url::Url;

use crate::extract::FieldExtractor;

pub mod aljazeera;

/// Display data about a news source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMetadata {
    /// Written verbatim to `Article.resource`
    pub name: &'static str,
    pub emoji: &'static str,
    /// Shorthand names accepted on the command line
    pub cli_names: &'static [&'static str],
    pub domain: &'static str,
}

/// Selectors locating the trending list on the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingSelectors {
    pub container: String,
    pub item: String,
    pub headline: String,
    pub link: String,
}

/// Where an article's lead image comes from, in order of preference.
#[derive(Debug, Clone)]
pub struct MediaRules {
    pub images: FieldExtractor,
    pub pattern: Option<Regex>,
    pub placeholder: String,
}

/// Everything the crawler needs to know about one site: where to start, how
/// to find candidates and how to fill each article field.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    pub metadata: SourceMetadata,
    pub index_url: String,
    pub origin: Url,
    pub cookie_banner: Option<String>,
    pub trending: TrendingSelectors,
    pub summary: FieldExtractor,
    pub body: FieldExtractor,
    pub author: FieldExtractor,
    pub date: FieldExtractor,
    pub media: MediaRules,
}

impl SiteProfile {
    pub fn resource(&self) -> &'static str {
        self.metadata.name
    }

    /// Whether `url` points somewhere on this site.
    pub fn can_handle(&self, url: &str) -> bool {
        let domain = self.metadata.domain;
        Url::parse(url)
            .ok()
            .and_then(|u| {
                u.host_str()
                    .map(|h| h == domain || h.ends_with(&format!(".{}", domain)))
            })
            .unwrap_or(false)
    }

    pub fn matches_name(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.metadata.name.to_lowercase() == name || self.metadata.cli_names.contains(&name.as_str())
    }

    /// Field values every draft starts from.
    pub fn defaults(&self) -> FieldDefaults {
        FieldDefaults {
            summary: self.summary.default.clone(),
            body: self.body.default.clone(),
            author: self.author.default.clone(),
            media: self.media.placeholder.clone(),
            date: self.date.default.clone(),
        }
    }
}

/// All sites the crawler knows about.
pub fn get_profiles() -> Vec<SiteProfile> {
    vec![aljazeera::profile()]
}

/// Looks a site up by one of its names or by a URL on it.
pub fn find_profile(name: &str) -> Result<SiteProfile> {
    get_profiles()
        .into_iter()
        .find(|p| p.matches_name(name) || p.can_handle(name))
        .ok_or_else(|| Error::Config(format!("Scraper not found: {}", name)))
}
