use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author recorded when no byline can be found on the page.
pub const DEFAULT_AUTHOR: &str = "See article for details";

/// Number of headline words that make up a slug.
const SLUG_WORDS: usize = 3;

/// Derives a slug from the first three words of a headline: concatenated,
/// lowercased and stripped of everything outside `a-z`.
///
/// The result may be empty (e.g. a headline made only of digits); callers
/// must treat that as an unusable headline.
pub fn slugify(headline: &str) -> String {
    headline
        .split_whitespace()
        .take(SLUG_WORDS)
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect()
}

/// A trending-list entry discovered on a site's index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub headline: String,
    pub link: String,
    pub slug: String,
}

impl Candidate {
    /// Builds a candidate, returning `None` when the headline yields no slug.
    pub fn new(headline: impl Into<String>, link: impl Into<String>) -> Option<Self> {
        let headline = headline.into();
        let slug = slugify(&headline);
        if slug.is_empty() {
            return None;
        }
        Some(Self {
            headline,
            link: link.into(),
            slug,
        })
    }
}

/// A fully enriched article, one row of the `"Article"` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub slug: String,
    pub headline: String,
    pub summary: String,
    pub body: String,
    pub author: String,
    pub resource: String,
    pub media: String,
    pub link: String,
    pub date: String,
}

/// Values a draft starts from, so every field is defined before any stage runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefaults {
    pub summary: String,
    pub body: String,
    pub author: String,
    pub media: String,
    pub date: String,
}

impl FieldDefaults {
    pub fn with_media(placeholder: impl Into<String>) -> Self {
        Self {
            summary: String::new(),
            body: String::new(),
            author: DEFAULT_AUTHOR.to_string(),
            media: placeholder.into(),
            date: String::new(),
        }
    }
}

/// Builder threaded through the extraction stages of one candidate.
///
/// Each stage consumes the draft and returns it with exactly one field
/// replaced; `build` stamps the id and resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    candidate: Candidate,
    summary: String,
    body: String,
    author: String,
    media: String,
    date: String,
}

impl ArticleDraft {
    pub fn new(candidate: Candidate, defaults: &FieldDefaults) -> Self {
        Self {
            candidate,
            summary: defaults.summary.clone(),
            body: defaults.body.clone(),
            author: defaults.author.clone(),
            media: defaults.media.clone(),
            date: defaults.date.clone(),
        }
    }

    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    pub fn with_summary(mut self, summary: String) -> Self {
        self.summary = summary;
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = body;
        self
    }

    pub fn with_author(mut self, author: String) -> Self {
        self.author = author;
        self
    }

    pub fn with_media(mut self, media: String) -> Self {
        self.media = media;
        self
    }

    pub fn with_date(mut self, date: String) -> Self {
        self.date = date;
        self
    }

    pub fn build(self, resource: &str) -> Article {
        Article {
            id: Uuid::new_v4().to_string(),
            slug: self.candidate.slug,
            headline: self.candidate.headline,
            summary: self.summary,
            body: self.body,
            author: self.author,
            resource: resource.to_string(),
            media: self.media,
            link: self.candidate.link,
            date: self.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Storm hits coastal city hard"), "stormhitscoastal");
        assert_eq!(slugify("Gaza: UN says 'enough'"), "gazaunsays");
        assert_eq!(slugify("  Two   words "), "twowords");
        assert_eq!(slugify("2024 in 10"), "in");
        assert_eq!(slugify("123 456 789 Later"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_candidate_requires_slug() {
        let candidate = Candidate::new("Storm hits coastal city", "https://example.com/a").unwrap();
        assert_eq!(candidate.slug, "stormhitscoastal");
        assert!(Candidate::new("2024", "https://example.com/b").is_none());
    }

    #[test]
    fn test_draft_starts_from_defaults() {
        let candidate = Candidate::new("Storm hits coastal city", "https://example.com/a").unwrap();
        let defaults = FieldDefaults::with_media("https://example.com/logo.png");
        let article = ArticleDraft::new(candidate, &defaults).build("Example");

        assert_eq!(article.summary, "");
        assert_eq!(article.body, "");
        assert_eq!(article.author, DEFAULT_AUTHOR);
        assert_eq!(article.media, "https://example.com/logo.png");
        assert_eq!(article.date, "");
        assert_eq!(article.resource, "Example");
        assert!(Uuid::parse_str(&article.id).is_ok());
    }

    #[test]
    fn test_draft_stages_replace_fields() {
        let candidate = Candidate::new("Storm hits coastal city", "https://example.com/a").unwrap();
        let defaults = FieldDefaults::with_media("https://example.com/logo.png");
        let article = ArticleDraft::new(candidate, &defaults)
            .with_summary("Short".to_string())
            .with_author("Jane Doe".to_string())
            .with_date("2024-10-12T00:00:00.000Z".to_string())
            .build("Example");

        assert_eq!(article.summary, "Short");
        assert_eq!(article.author, "Jane Doe");
        assert_eq!(article.date, "2024-10-12T00:00:00.000Z");
        assert_eq!(article.headline, "Storm hits coastal city");
        assert_eq!(article.link, "https://example.com/a");
    }

    #[test]
    fn test_ids_are_unique() {
        let candidate = Candidate::new("Storm hits coastal city", "https://example.com/a").unwrap();
        let defaults = FieldDefaults::with_media("https://example.com/logo.png");
        let a = ArticleDraft::new(candidate.clone(), &defaults).build("Example");
        let b = ArticleDraft::new(candidate, &defaults).build("Example");
        assert_ne!(a.id, b.id);
    }
}
