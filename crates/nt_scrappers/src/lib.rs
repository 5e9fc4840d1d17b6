pub mod batch;
pub mod cli;
pub mod discovery;
pub mod driver;
pub mod extract;
pub mod logging;
pub mod pipeline;
pub mod scrapers;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use batch::{BatchConfig, BatchResult, BatchRunner, FailedCandidate};
pub use cli::{handle_command, CrawlArgs, ScraperArgs, ScraperCommands, StorageArgs};
pub use discovery::{ArticleDiscoverer, DiscoveryConfig};
pub use pipeline::{ArticlePipeline, CandidateOutcome, CandidateState, PipelineConfig};
pub use scrapers::{find_profile, get_profiles, SiteProfile};

pub mod prelude {
    pub use super::scrapers::SiteProfile;
    pub use super::{BatchConfig, BatchResult, BatchRunner};
    pub use nt_core::{Article, ArticleRepository, Error, PageDriver, Result};
}
