use nt_core::DEFAULT_AUTHOR;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::{MediaRules, SiteProfile, SourceMetadata, TrendingSelectors};
use crate::extract::{FieldExtractor, Transform};

const INDEX_URL: &str = "https://www.aljazeera.com";
const SUMMARY_WORDS: usize = 40;
const PLACEHOLDER: &str = "https://upload.wikimedia.org/wikipedia/en/thumb/8/8f/Al_Jazeera_Media_Network_Logo.svg/1200px-Al_Jazeera_Media_Network_Logo.svg.png";

/// Elements inside the article body that are not part of the story.
const NOISE: &[&str] = &[
    ".more-on",
    ".sib-newsletter-form",
    ".advertisement",
    ".ad-container",
    ".widget",
    ".ad",
    ".ads",
];

static ORIGIN: Lazy<Url> = Lazy::new(|| Url::parse(INDEX_URL).unwrap());

static UPLOADED_JPEG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"/wp-content/uploads/\d{4}/\d{2}/[^\s"]+\.jpg\?resize=\d+%2C\d+&quality=\d+"#).unwrap()
});

pub fn profile() -> SiteProfile {
    let noise: Vec<String> = NOISE.iter().map(|s| s.to_string()).collect();

    SiteProfile {
        metadata: SourceMetadata {
            name: "Al Jazeera",
            emoji: "🌍",
            cli_names: &["aljazeera", "aj"],
            domain: "aljazeera.com",
        },
        index_url: INDEX_URL.to_string(),
        origin: ORIGIN.clone(),
        cookie_banner: Some("#onetrust-accept-btn-handler".to_string()),
        trending: TrendingSelectors {
            container: ".trending-articles".to_string(),
            item: ".trending-articles__list li".to_string(),
            headline: ".article-trending__title span".to_string(),
            link: ".article-trending__title-link".to_string(),
        },
        summary: FieldExtractor::new("summary", "")
            .strategy("#wysiwyg li", Transform::Truncate { words: SUMMARY_WORDS })
            .strategy(".article__subhead em", Transform::Text)
            .strategy("#wysiwyg p", Transform::Truncate { words: SUMMARY_WORDS }),
        body: FieldExtractor::new("body", "")
            .strategy("#wysiwyg", Transform::VisibleText { remove: noise.clone() })
            .strategy(".wysiwyg--all-content", Transform::VisibleText { remove: noise.clone() })
            .strategy(".wysiwyg ul", Transform::VisibleText { remove: noise }),
        author: FieldExtractor::new("author", DEFAULT_AUTHOR)
            .strategy(".article-author-name-item a.author-link", Transform::Text),
        date: FieldExtractor::new("date", "")
            .strategy(r#".date-simple span[aria-hidden="true"]"#, Transform::Date),
        media: MediaRules {
            images: FieldExtractor::new("media", PLACEHOLDER)
                .strategy(
                    ".featured-media__image-wrap img",
                    Transform::AbsoluteUrl { attr: "src".to_string() },
                )
                .strategy(
                    ".responsive-image img",
                    Transform::AbsoluteUrl { attr: "src".to_string() },
                ),
            pattern: Some(UPLOADED_JPEG.clone()),
            placeholder: PLACEHOLDER.to_string(),
        },
    }
}
