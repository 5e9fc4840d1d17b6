//! Field extraction from a rendered article page.
//!
//! Each field is described by a [`FieldExtractor`]: an ordered list of
//! `(selector, transform)` strategies plus a default. Strategies are tried in
//! order and the first one that produces a value wins; when all of them fail
//! the default is used. Failures are logged and never abort the article.

use nt_core::{ArticleDraft, Error, Result};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

pub mod body;
pub mod date;
pub mod media;
pub mod text;

pub use body::wrap_body;
pub use date::parse_display_date;
pub use media::{absolutize, resolve_media};
pub use text::{truncate_words, visible_text};

use crate::scrapers::SiteProfile;

pub(crate) fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| Error::Extraction(format!("Invalid selector {}: {}", selector, e)))
}

/// A parsed page together with the raw markup it came from and the URL it
/// was loaded from, which relative links resolve against.
///
/// Holds a `scraper::Html`, so it lives inside synchronous code only and is
/// dropped before the next driver call.
pub struct Page<'a> {
    document: Html,
    raw: &'a str,
    base: &'a Url,
}

impl<'a> Page<'a> {
    pub fn parse(raw: &'a str, base: &'a Url) -> Self {
        Self {
            document: Html::parse_document(raw),
            raw,
            base,
        }
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    pub fn raw(&self) -> &str {
        self.raw
    }

    pub fn base(&self) -> &Url {
        self.base
    }

    /// First element matching `selector`.
    pub fn first(&self, selector: &str) -> Result<ElementRef<'_>> {
        let parsed = parse_selector(selector)?;
        self.document
            .select(&parsed)
            .next()
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }
}

/// How a matched element becomes a field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transform {
    /// Rendered text, trimmed
    Text,
    /// First `words` whitespace-separated tokens of the rendered text
    Truncate { words: usize },
    /// Rendered text with the subtrees matching `remove` left out
    VisibleText { remove: Vec<String> },
    /// A URL attribute, made absolute against the page URL
    AbsoluteUrl { attr: String },
    /// A display date, normalised to an ISO-8601 UTC timestamp
    Date,
}

impl Transform {
    pub fn apply(&self, element: ElementRef<'_>, page: &Page<'_>) -> Result<String> {
        match self {
            Transform::Text => Ok(visible_text(element, &[])),
            Transform::Truncate { words } => Ok(truncate_words(&visible_text(element, &[]), *words)),
            Transform::VisibleText { remove } => {
                let selectors = remove
                    .iter()
                    .map(|s| parse_selector(s))
                    .collect::<Result<Vec<_>>>()?;
                Ok(visible_text(element, &selectors))
            }
            Transform::AbsoluteUrl { attr } => {
                let value = element.value().attr(attr).ok_or_else(|| {
                    Error::Extraction(format!("element has no {} attribute", attr))
                })?;
                absolutize(page.base(), value)
            }
            Transform::Date => {
                let raw = visible_text(element, &[]);
                parse_display_date(&raw)
                    .ok_or_else(|| Error::Extraction(format!("unparseable date: {:?}", raw)))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStrategy {
    pub selector: String,
    pub transform: Transform,
}

impl ExtractionStrategy {
    /// Fails only when the selector matches nothing or the transform fails.
    /// A matched element whose text comes out empty is still a success.
    pub fn apply(&self, page: &Page<'_>) -> Result<String> {
        let element = page.first(&self.selector)?;
        self.transform.apply(element, page)
    }
}

/// Result of running a strategy list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub value: String,
    pub used_default: bool,
    /// Index of the strategy that produced `value`
    pub strategy: Option<usize>,
}

/// Tries `strategies` in order against `page`; the first success wins and is
/// not checked against the others. Falls back to `default` when all fail.
pub fn extract_field(page: &Page<'_>, strategies: &[ExtractionStrategy], default: &str) -> Extracted {
    for (i, strategy) in strategies.iter().enumerate() {
        match strategy.apply(page) {
            Ok(value) => {
                return Extracted {
                    value,
                    used_default: false,
                    strategy: Some(i),
                }
            }
            Err(e) => debug!(selector = %strategy.selector, error = %e, "Strategy failed"),
        }
    }

    Extracted {
        value: default.to_string(),
        used_default: true,
        strategy: None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldExtractor {
    pub field: String,
    pub strategies: Vec<ExtractionStrategy>,
    pub default: String,
}

impl FieldExtractor {
    pub fn new(field: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            strategies: Vec::new(),
            default: default.into(),
        }
    }

    pub fn strategy(mut self, selector: impl Into<String>, transform: Transform) -> Self {
        self.strategies.push(ExtractionStrategy {
            selector: selector.into(),
            transform,
        });
        self
    }

    pub fn extract(&self, page: &Page<'_>) -> Extracted {
        extract_field(page, &self.strategies, &self.default)
    }
}

/// Fills every enrichable field of `draft` from the article page `html`.
///
/// Stages run in a fixed order and each one only replaces its own field, so a
/// failing stage leaves the default in place and the others still run.
pub fn extract_article(draft: ArticleDraft, html: &str, profile: &SiteProfile) -> ArticleDraft {
    let slug = draft.candidate().slug.clone();
    let link = draft.candidate().link.clone();
    let base = Url::parse(&link).unwrap_or_else(|_| profile.origin.clone());
    let page = Page::parse(html, &base);

    let field = |extractor: &FieldExtractor| {
        let extracted = extractor.extract(&page);
        if extracted.used_default {
            warn!(slug = %slug, field = %extractor.field, "No strategy matched, keeping default");
        }
        extracted.value
    };

    let summary = field(&profile.summary);
    let body = wrap_body(&field(&profile.body), &link, profile.resource());
    let author = field(&profile.author);
    let media = resolve_media(&page, &profile.media);
    let date = field(&profile.date);

    draft
        .with_summary(summary)
        .with_body(body)
        .with_author(author)
        .with_media(media)
        .with_date(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::aljazeera;
    use nt_core::{Candidate, DEFAULT_AUTHOR};

    fn origin() -> Url {
        Url::parse("https://www.aljazeera.com").unwrap()
    }

    #[test]
    fn test_first_success_wins() {
        let html = r#"<div class="subhead"><em>Lead in</em></div><p>Paragraph</p>"#;
        let origin = origin();
        let page = Page::parse(html, &origin);
        let extractor = FieldExtractor::new("summary", "")
            .strategy("#missing li", Transform::Text)
            .strategy(".subhead em", Transform::Text)
            .strategy("p", Transform::Text);

        let extracted = extractor.extract(&page);
        assert_eq!(extracted.value, "Lead in");
        assert_eq!(extracted.strategy, Some(1));
    }

    #[test]
    fn test_default_when_all_fail() {
        let origin = origin();
        let page = Page::parse("<p>nothing here</p>", &origin);
        let extractor = FieldExtractor::new("author", DEFAULT_AUTHOR)
            .strategy("a.author-link", Transform::Text);

        let extracted = extractor.extract(&page);
        assert!(extracted.used_default);
        assert_eq!(extracted.value, DEFAULT_AUTHOR);
    }

    #[test]
    fn test_failing_transform_falls_through() {
        let html = r#"<span class="date">sometime soon</span><time>2024-10-12</time>"#;
        let origin = origin();
        let page = Page::parse(html, &origin);
        let extractor = FieldExtractor::new("date", "")
            .strategy(".date", Transform::Date)
            .strategy("time", Transform::Date);

        let extracted = extractor.extract(&page);
        assert_eq!(extracted.value, "2024-10-12T00:00:00.000Z");
        assert_eq!(extracted.strategy, Some(1));
    }

    #[test]
    fn test_invalid_selector_is_a_failed_strategy() {
        let origin = origin();
        let page = Page::parse("<p>text</p>", &origin);
        let extractor = FieldExtractor::new("summary", "fallback")
            .strategy("p[", Transform::Text);
        assert_eq!(extractor.extract(&page).value, "fallback");
    }

    #[test]
    fn test_matched_but_empty_element_wins() {
        let html = r#"
            <div id="wysiwyg"><ul><li></li></ul><div class="ad">Buy now</div></div>
            <p class="article__subhead"><em>Subhead text</em></p>
            <div class="wysiwyg--all-content"><p>Other container text</p></div>
        "#;
        let profile = aljazeera::profile();
        let page = Page::parse(html, &profile.origin);

        let summary = profile.summary.extract(&page);
        assert_eq!(summary.value, "");
        assert_eq!(summary.strategy, Some(0));
        assert!(!summary.used_default);

        let body = profile.body.extract(&page);
        assert_eq!(body.value, "");
        assert_eq!(body.strategy, Some(0));
    }

    #[test]
    fn test_truncate_transform() {
        let words: Vec<String> = (1..=50).map(|i| format!("w{}", i)).collect();
        let html = format!("<ul id=\"wysiwyg\"><li>{}</li></ul>", words.join(" "));
        let origin = origin();
        let page = Page::parse(&html, &origin);
        let extractor = FieldExtractor::new("summary", "")
            .strategy("#wysiwyg li", Transform::Truncate { words: 40 });

        let value = extractor.extract(&page).value;
        assert_eq!(value.split_whitespace().count(), 40);
        assert!(value.ends_with("w40"));
    }

    #[test]
    fn test_extract_article_fills_every_field() {
        let html = r#"
            <html><body>
              <p class="article__subhead"><em>Heavy rain floods the coast.</em></p>
              <div class="article-author-name-item"><a class="author-link" href="/author/jane">Jane Doe</a></div>
              <div class="date-simple"><span aria-hidden="true">12 Oct 2024</span></div>
              <div class="featured-media__image-wrap"><img src="/wp-content/uploads/2024/10/storm.jpg"></div>
              <div id="wysiwyg">
                <p>First paragraph.</p>
                <div class="more-on">More on this story</div>
                <p>Second paragraph.</p>
              </div>
            </body></html>
        "#;
        let profile = aljazeera::profile();
        let candidate = Candidate::new(
            "Storm hits coastal city",
            "https://www.aljazeera.com/news/2024/10/12/storm",
        )
        .unwrap();
        let draft = ArticleDraft::new(candidate, &profile.defaults());

        let article = extract_article(draft, html, &profile).build(profile.resource());
        assert_eq!(article.summary, "Heavy rain floods the coast.");
        assert_eq!(article.author, "Jane Doe");
        assert_eq!(article.date, "2024-10-12T00:00:00.000Z");
        assert_eq!(
            article.media,
            "https://www.aljazeera.com/wp-content/uploads/2024/10/storm.jpg"
        );
        assert_eq!(
            article.body,
            "<p>First paragraph.\nSecond paragraph.</p><br><br><ul><li><a href='https://www.aljazeera.com/news/2024/10/12/storm'>Visit Al Jazeera</a></li></ul>"
        );
        assert_eq!(article.resource, "Al Jazeera");
    }

    #[test]
    fn test_relative_media_resolves_against_article_url() {
        let html = r#"<div class="featured-media__image-wrap"><img src="images/storm.jpg"></div>"#;
        let profile = aljazeera::profile();
        let candidate = Candidate::new(
            "Storm hits coastal city",
            "https://www.aljazeera.com/news/2024/10/12/storm",
        )
        .unwrap();
        let draft = ArticleDraft::new(candidate, &profile.defaults());

        let article = extract_article(draft, html, &profile).build(profile.resource());
        assert_eq!(article.media, "https://www.aljazeera.com/news/2024/10/12/images/storm.jpg");
    }

    #[test]
    fn test_extract_article_on_empty_page_keeps_defaults() {
        let profile = aljazeera::profile();
        let candidate = Candidate::new(
            "Storm hits coastal city",
            "https://www.aljazeera.com/news/storm",
        )
        .unwrap();
        let draft = ArticleDraft::new(candidate, &profile.defaults());

        let article = extract_article(draft, "<html><body></body></html>", &profile)
            .build(profile.resource());
        assert_eq!(article.summary, "");
        assert_eq!(article.author, DEFAULT_AUTHOR);
        assert_eq!(article.date, "");
        assert_eq!(article.media, profile.media.placeholder);
        assert_eq!(
            article.body,
            "<br><br><ul><li><a href='https://www.aljazeera.com/news/storm'>Visit Al Jazeera</a></li></ul>"
        );
    }
}
