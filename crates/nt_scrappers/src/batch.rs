use nt_core::{Article, ArticleRepository, Candidate, DriverLauncher, PageDriver, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::discovery::{ArticleDiscoverer, DiscoveryConfig};
use crate::pipeline::{ArticlePipeline, CandidateOutcome, PipelineConfig};
use crate::scrapers::SiteProfile;
use crate::snapshot::{write_snapshot, DEFAULT_SNAPSHOT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub discovery: DiscoveryConfig,
    pub pipeline: PipelineConfig,
    /// Where to dump the outcomes; `None` skips the snapshot
    pub snapshot: Option<PathBuf>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            discovery: DiscoveryConfig::default(),
            pipeline: PipelineConfig::default(),
            snapshot: Some(PathBuf::from(DEFAULT_SNAPSHOT)),
        }
    }
}

/// A candidate that never made it into the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub attempts: u32,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub resource: String,
    /// Rows of the previous batch removed before crawling
    pub deleted_count: u64,
    pub persisted_count: usize,
    pub failed_count: usize,
    pub failures: Vec<FailedCandidate>,
    pub articles: Vec<Article>,
}

impl BatchResult {
    fn from_outcomes(resource: &str, deleted_count: u64, outcomes: Vec<CandidateOutcome>) -> Self {
        let mut articles = Vec::new();
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                CandidateOutcome::Persisted { article, .. } => articles.push(article),
                CandidateOutcome::Failed {
                    candidate,
                    attempts,
                    error,
                    ..
                } => failures.push(FailedCandidate {
                    candidate,
                    attempts,
                    reason: error,
                }),
            }
        }

        Self {
            resource: resource.to_string(),
            deleted_count,
            persisted_count: articles.len(),
            failed_count: failures.len(),
            failures,
            articles,
        }
    }
}

/// Replaces one site's articles with a fresh crawl.
///
/// The repository is expected to be connected already; the runner deletes the
/// site's old rows, launches a driver, discovers and processes candidates in
/// order, writes the snapshot and releases both the driver and the repository
/// whatever happens. Old rows stay deleted when the crawl fails.
pub struct BatchRunner {
    repository: Arc<dyn ArticleRepository>,
    launcher: Box<dyn DriverLauncher>,
    config: BatchConfig,
}

impl BatchRunner {
    pub fn new(
        repository: Arc<dyn ArticleRepository>,
        launcher: Box<dyn DriverLauncher>,
        config: BatchConfig,
    ) -> Self {
        Self {
            repository,
            launcher,
            config,
        }
    }

    pub async fn run(self, profile: &SiteProfile) -> Result<BatchResult> {
        info!(
            "{} Starting batch for {} with the {} driver",
            profile.metadata.emoji,
            profile.resource(),
            self.launcher.name()
        );

        let result = self.run_batch(profile).await;

        if let Err(e) = self.repository.close().await {
            warn!(error = %e, "Failed to close repository");
        }

        match &result {
            Ok(batch) => info!(
                persisted = batch.persisted_count,
                failed = batch.failed_count,
                "🏁 Batch finished for {}",
                batch.resource
            ),
            Err(e) => error!(error = %e, "Batch aborted for {}", profile.resource()),
        }
        result
    }

    async fn run_batch(&self, profile: &SiteProfile) -> Result<BatchResult> {
        let resource = profile.resource();
        let deleted = self.repository.delete_by_resource(resource).await?;
        info!(deleted, "🗑️ Removed previous articles for {}", resource);

        let mut driver = self.launcher.launch().await?;
        let crawl = self.crawl(profile, driver.as_mut()).await;
        if let Err(e) = driver.close().await {
            warn!(driver = driver.name(), error = %e, "Failed to release driver");
        }

        Ok(BatchResult::from_outcomes(resource, deleted, crawl?))
    }

    async fn crawl(&self, profile: &SiteProfile, driver: &mut dyn PageDriver) -> Result<Vec<CandidateOutcome>> {
        let candidates = ArticleDiscoverer::new(profile, self.config.discovery.clone())
            .discover(driver)
            .await?;

        let pipeline = ArticlePipeline::new(profile, self.config.pipeline.clone());
        let total = candidates.len();
        let mut outcomes = Vec::with_capacity(total);
        for (i, candidate) in candidates.into_iter().enumerate() {
            info!("📰 [{}/{}] {}", i + 1, total, candidate.headline);
            outcomes.push(pipeline.process(driver, self.repository.as_ref(), candidate).await);
        }

        if let Some(path) = &self.config.snapshot {
            if let Err(e) = write_snapshot(path, &outcomes).await {
                error!(path = %path.display(), error = %e, "Failed to write snapshot");
            }
        }

        Ok(outcomes)
    }
}
