use nt_core::{Article, ArticleDraft, ArticleRepository, Candidate, NavigationOptions, PageDriver, Result};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::extract::extract_article;
use crate::scrapers::SiteProfile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub navigation_timeout: Duration,
    /// Attempts per candidate, counting the first one
    pub max_attempts: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(10),
            max_attempts: 3,
        }
    }
}

/// Where a candidate is in its journey to a stored article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateState {
    Pending,
    Loading,
    Extracting,
    Persisted,
    Failed,
}

impl CandidateState {
    pub fn can_transition_to(self, next: CandidateState) -> bool {
        use CandidateState::*;
        matches!(
            (self, next),
            (Pending, Loading)
                | (Loading, Extracting)
                | (Loading, Loading)
                | (Extracting, Loading)
                | (Extracting, Persisted)
                | (Loading, Failed)
                | (Extracting, Failed)
        )
    }
}

/// Final state of one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CandidateOutcome {
    Persisted {
        #[serde(flatten)]
        article: Article,
        attempts: u32,
    },
    Failed {
        #[serde(flatten)]
        candidate: Candidate,
        /// Last extracted version of the page, when one was loaded
        #[serde(skip_serializing_if = "Option::is_none")]
        article: Option<Article>,
        attempts: u32,
        error: String,
    },
}

impl CandidateOutcome {
    pub fn state(&self) -> CandidateState {
        match self {
            CandidateOutcome::Persisted { .. } => CandidateState::Persisted,
            CandidateOutcome::Failed { .. } => CandidateState::Failed,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            CandidateOutcome::Persisted { attempts, .. } | CandidateOutcome::Failed { attempts, .. } => *attempts,
        }
    }
}

struct Tracker<'c> {
    slug: &'c str,
    state: CandidateState,
}

impl Tracker<'_> {
    fn advance(&mut self, next: CandidateState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!(slug = self.slug, from = ?self.state, to = ?next, "Candidate state");
        self.state = next;
    }
}

/// Turns candidates into stored articles, one at a time, on a shared driver.
pub struct ArticlePipeline<'a> {
    profile: &'a SiteProfile,
    config: PipelineConfig,
}

impl<'a> ArticlePipeline<'a> {
    pub fn new(profile: &'a SiteProfile, config: PipelineConfig) -> Self {
        Self { profile, config }
    }

    /// Runs `candidate` to a terminal state.
    ///
    /// Navigation and insert failures restart the candidate from loading
    /// until `max_attempts` is spent. Any other error gives up straight away.
    /// Nothing is returned as an error.
    pub async fn process(
        &self,
        driver: &mut dyn PageDriver,
        repository: &dyn ArticleRepository,
        candidate: Candidate,
    ) -> CandidateOutcome {
        let mut tracker = Tracker {
            slug: &candidate.slug,
            state: CandidateState::Pending,
        };
        let mut last_error = String::from("no attempt made");
        let mut enriched = None;
        let mut attempts = 0;

        for attempt in 1..=self.config.max_attempts {
            attempts = attempt;
            let e = match self.enrich(driver, &candidate, &mut tracker).await {
                Ok(article) => match repository.insert(&article).await {
                    Ok(()) => {
                        tracker.advance(CandidateState::Persisted);
                        info!("✅ Stored {} ({}) on attempt {}", article.headline, article.slug, attempt);
                        return CandidateOutcome::Persisted {
                            article,
                            attempts: attempt,
                        };
                    }
                    Err(e) => {
                        enriched = Some(article);
                        e
                    }
                },
                Err(e) => e,
            };

            warn!(
                slug = %candidate.slug,
                attempt,
                max_attempts = self.config.max_attempts,
                error = %e,
                "Attempt failed"
            );
            last_error = e.to_string();
            if !e.is_candidate_level() {
                break;
            }
        }

        if tracker.state != CandidateState::Pending {
            tracker.advance(CandidateState::Failed);
        }
        error!(
            "❌ Giving up on {} after {} attempts: {}",
            candidate.link, attempts, last_error
        );
        CandidateOutcome::Failed {
            candidate,
            article: enriched,
            attempts,
            error: last_error,
        }
    }

    /// Loads the candidate's page and extracts every field from it.
    async fn enrich(
        &self,
        driver: &mut dyn PageDriver,
        candidate: &Candidate,
        tracker: &mut Tracker<'_>,
    ) -> Result<Article> {
        tracker.advance(CandidateState::Loading);
        let options = NavigationOptions::dom_content_loaded(self.config.navigation_timeout);
        driver.goto(&candidate.link, &options).await?;
        let html = driver.content().await?;

        tracker.advance(CandidateState::Extracting);
        let draft = ArticleDraft::new(candidate.clone(), &self.profile.defaults());
        Ok(extract_article(draft, &html, self.profile).build(self.profile.resource()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        use CandidateState::*;
        assert!(Pending.can_transition_to(Loading));
        assert!(Extracting.can_transition_to(Persisted));
        assert!(Extracting.can_transition_to(Loading));
        assert!(!Pending.can_transition_to(Persisted));
        assert!(!Persisted.can_transition_to(Loading));
        assert!(!Failed.can_transition_to(Loading));
    }

    #[test]
    fn test_failed_outcome_serializes_with_status() {
        let candidate = Candidate::new("Storm hits coastal city", "https://example.com/storm").unwrap();
        let outcome = CandidateOutcome::Failed {
            candidate,
            article: None,
            attempts: 3,
            error: "timed out".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["slug"], "stormhitscoastal");
        assert_eq!(json["attempts"], 3);
        assert!(json.get("article").is_none());
        assert_eq!(outcome.state(), CandidateState::Failed);
    }
}
