use clap::{Args, Subcommand};
use nt_core::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::batch::{BatchConfig, BatchRunner};
use crate::discovery::DiscoveryConfig;
use crate::driver::create_launcher;
use crate::pipeline::PipelineConfig;
use crate::scrapers::{find_profile, get_profiles};
use crate::snapshot::DEFAULT_SNAPSHOT;

/// Where articles are stored.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct StorageArgs {
    /// Storage backend: memory, sqlite or postgres
    #[arg(long, default_value = "memory", global = true)]
    pub storage: String,

    /// Connection string for the storage backend (sqlite path or postgres url)
    #[arg(long, env = "POSTGRES_CONNECTION_STRING", global = true, hide_env_values = true)]
    pub database_url: Option<String>,
}

/// How a crawl behaves.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CrawlArgs {
    /// Page driver: http or chromium
    #[arg(long, default_value = "http")]
    pub driver: String,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// File the enriched articles are dumped to
    #[arg(long, default_value = DEFAULT_SNAPSHOT)]
    pub snapshot: PathBuf,

    /// Do not write the snapshot file
    #[arg(long)]
    pub no_snapshot: bool,

    /// Attempts per article before giving up
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: u32,

    /// Checks for the trending section before giving up
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_polls: u32,

    /// Seconds to wait between trending section checks
    #[arg(long, default_value_t = 1)]
    pub poll_interval: u64,

    /// Index page navigation timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub index_timeout: u64,

    /// Article page navigation timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub article_timeout: u64,
}

impl Default for CrawlArgs {
    fn default() -> Self {
        Self {
            driver: "http".to_string(),
            headless: false,
            snapshot: PathBuf::from(DEFAULT_SNAPSHOT),
            no_snapshot: false,
            max_attempts: 3,
            max_polls: 30,
            poll_interval: 1,
            index_timeout: 60,
            article_timeout: 10,
        }
    }
}

impl CrawlArgs {
    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            discovery: DiscoveryConfig {
                navigation_timeout: Duration::from_secs(self.index_timeout),
                poll_interval: Duration::from_secs(self.poll_interval),
                max_polls: self.max_polls,
            },
            pipeline: PipelineConfig {
                navigation_timeout: Duration::from_secs(self.article_timeout),
                max_attempts: self.max_attempts,
            },
            snapshot: (!self.no_snapshot).then(|| self.snapshot.clone()),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ScraperArgs {
    #[command(subcommand)]
    pub command: ScraperCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ScraperCommands {
    /// Crawl a source and replace its stored articles
    Source {
        /// Source name (see `list`)
        #[arg(default_value = "aljazeera")]
        source: String,
        #[command(flatten)]
        crawl: CrawlArgs,
    },
    /// List available scrapers
    List,
    /// Print the articles stored for a source
    Show {
        #[arg(default_value = "aljazeera")]
        source: String,
    },
}

pub async fn handle_command(args: ScraperArgs, storage: &StorageArgs) -> Result<()> {
    match args.command {
        ScraperCommands::Source { source, crawl } => {
            let profile = find_profile(&source)?;
            // Nothing may fail between opening the repository and handing it to the runner
            let launcher = create_launcher(&crawl.driver, crawl.headless)?;
            let repository =
                nt_storage::create_repository(&storage.storage, storage.database_url.as_deref()).await?;

            let result = BatchRunner::new(repository, launcher, crawl.batch_config())
                .run(&profile)
                .await?;

            println!(
                "{} {}: {} stored, {} failed ({} previous rows replaced)",
                profile.metadata.emoji,
                result.resource,
                result.persisted_count,
                result.failed_count,
                result.deleted_count
            );
            for article in &result.articles {
                println!("🆕 {} - {}", article.headline, article.link);
            }
            for failure in &result.failures {
                println!(
                    "⚠️ {} - {} ({} attempts: {})",
                    failure.candidate.headline, failure.candidate.link, failure.attempts, failure.reason
                );
            }
        }
        ScraperCommands::List => {
            println!("Available scrapers:");
            for profile in get_profiles() {
                println!(
                    "  {} {} ({}) - {}",
                    profile.metadata.emoji,
                    profile.metadata.name,
                    profile.metadata.cli_names.join(", "),
                    profile.index_url
                );
            }
        }
        ScraperCommands::Show { source } => {
            let profile = find_profile(&source)?;
            let repository =
                nt_storage::create_repository(&storage.storage, storage.database_url.as_deref()).await?;
            let articles = repository.get_by_resource(profile.resource()).await;
            repository.close().await?;

            let articles = articles?;
            info!(count = articles.len(), "Loaded stored articles");
            for article in &articles {
                println!("{} [{}] {} - {}", article.date, article.slug, article.headline, article.link);
            }
        }
    }
    Ok(())
}
