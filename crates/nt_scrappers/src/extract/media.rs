use nt_core::{Error, Result};
use tracing::{debug, warn};
use url::{ParseError, Url};

use super::Page;
use crate::scrapers::MediaRules;

/// Makes `src` absolute: values that already parse as URLs are kept, the
/// rest are resolved against `base`.
pub fn absolutize(base: &Url, src: &str) -> Result<String> {
    let src = src.trim();
    if src.is_empty() {
        return Err(Error::InvalidUrl("empty url".to_string()));
    }
    let resolved = match Url::parse(src) {
        Ok(url) => Ok(url),
        Err(ParseError::RelativeUrlWithoutBase) => base.join(src),
        Err(e) => Err(e),
    };
    resolved
        .map(String::from)
        .map_err(|e| Error::InvalidUrl(format!("{}: {}", src, e)))
}

/// Picks the lead image of an article. Never fails: DOM image strategies
/// first, then the upload pattern over the raw markup, then the placeholder.
pub fn resolve_media(page: &Page<'_>, rules: &MediaRules) -> String {
    let from_dom = rules.images.extract(page);
    if !from_dom.used_default {
        return from_dom.value;
    }
    debug!("No media element found, scanning page source");

    if let Some(pattern) = &rules.pattern {
        if let Some(found) = pattern.find(page.raw()) {
            match absolutize(page.base(), found.as_str()) {
                Ok(url) => return url,
                Err(e) => warn!(error = %e, "Discarding media pattern match"),
            }
        }
    }

    debug!("Using placeholder media");
    rules.placeholder.clone()
}
