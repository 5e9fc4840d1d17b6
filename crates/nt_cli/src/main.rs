use clap::Parser;
use nt_core::Result;
use nt_scrappers::cli::{handle_command, CrawlArgs, ScraperArgs, ScraperCommands, StorageArgs};
use nt_scrappers::logging::{init_logging, DEFAULT_LEVEL};
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    /// Parses `1h15m30s`-style durations; a number without a unit is seconds.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut digits = String::new();

        // `None` marks the end of input and closes a trailing bare number
        let tokens = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(Some)
            .chain(std::iter::once(None));

        for token in tokens {
            if let Some(c) = token.filter(char::is_ascii_digit) {
                digits.push(c);
                continue;
            }
            if digits.is_empty() {
                match token {
                    Some(c) => return Err(format!("Duration unit {} has no number", c)),
                    None => break,
                }
            }

            let unit = match token {
                None | Some('s') => 1,
                Some('m') => 60,
                Some('h') => 3600,
                Some('d') => 86_400,
                Some(c) => return Err(format!("Invalid duration unit: {}", c)),
            };
            let amount = digits
                .parse::<u64>()
                .ok()
                .and_then(|n| n.checked_mul(unit))
                .and_then(|n| n.checked_add(total_seconds))
                .ok_or_else(|| format!("Duration out of range: {}", s))?;
            total_seconds = amount;
            digits.clear();
        }

        if total_seconds == 0 {
            return Err("Duration must be longer than zero".to_string());
        }
        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Crawl trending news articles into a database", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    storage: StorageArgs,

    /// Log filter, e.g. info, debug or nt_scrappers=debug
    #[arg(long, env = "NT_LOG_LEVEL", default_value = DEFAULT_LEVEL, global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    Scrape {
        #[command(subcommand)]
        command: Option<ScraperCommands>,

        /// Repeat the crawl forever with this pause between runs (e.g. 1h, 30m, 1h15m30s)
        #[arg(long)]
        interval: Option<HumanDuration>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Scrape { command, interval } => {
            let args = ScraperArgs {
                command: command.unwrap_or_else(|| ScraperCommands::Source {
                    source: "aljazeera".to_string(),
                    crawl: CrawlArgs::default(),
                }),
            };

            match interval {
                Some(interval) if matches!(args.command, ScraperCommands::Source { .. }) => {
                    info!("Running in periodic mode with {}s interval", interval.0.as_secs());
                    loop {
                        info!("Starting scrape cycle");
                        if let Err(e) = handle_command(args.clone(), &cli.storage).await {
                            error!(error = %e, "Scrape cycle failed");
                        }
                        info!("Waiting {}s before next scrape", interval.0.as_secs());
                        tokio::time::sleep(interval.0).await;
                    }
                }
                _ => handle_command(args, &cli.storage).await?,
            }
        }
    }

    Ok(())
}
