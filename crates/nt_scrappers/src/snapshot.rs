use nt_core::Result;
use std::path::Path;
use tracing::info;

use crate::pipeline::CandidateOutcome;

/// File the crawler dumps its outcomes to unless told otherwise.
pub const DEFAULT_SNAPSHOT: &str = "enriched-articles.json";

/// Writes every outcome, stored or failed, as a pretty-printed JSON array.
pub async fn write_snapshot(path: &Path, outcomes: &[CandidateOutcome]) -> Result<()> {
    let json = serde_json::to_string_pretty(outcomes)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, json).await?;
    info!("💾 Saved {} entries to {}", outcomes.len(), path.display());
    Ok(())
}
