use nt_core::{ArticleRepository, Error};
use nt_storage::MemoryRepository;
use serde_json::Value;
use std::sync::Arc;
use tempfile::tempdir;

use super::mock::*;
use crate::batch::{BatchConfig, BatchRunner};
use crate::scrapers::aljazeera;

fn config() -> BatchConfig {
    BatchConfig {
        discovery: fast_discovery(),
        pipeline: pipeline_config(),
        snapshot: None,
    }
}

#[tokio::test]
async fn test_one_stored_one_failed() {
    let profile = aljazeera::profile();
    let driver = ScriptedDriver::site().respond(FINAL_URL, vec![Response::Fail]);
    let log = driver.log();
    let repository = MemoryRepository::new();

    let dir = tempdir().unwrap();
    let snapshot = dir.path().join("enriched-articles.json");
    let config = BatchConfig {
        snapshot: Some(snapshot.clone()),
        ..config()
    };

    let result = BatchRunner::new(
        Arc::new(repository.clone()),
        Box::new(ScriptedLauncher::new(driver)),
        config,
    )
    .run(&profile)
    .await
    .unwrap();

    assert_eq!(result.persisted_count, 1);
    assert_eq!(result.failed_count, 1);
    assert_eq!(result.failures[0].candidate.link, FINAL_URL);
    assert_eq!(result.failures[0].attempts, 3);
    assert_eq!(repository.get_by_resource("Al Jazeera").await.unwrap().len(), 1);

    let log = log.lock().unwrap();
    assert_eq!(log.visits.iter().filter(|url| url.as_str() == FINAL_URL).count(), 3);
    assert!(log.closed);
    assert!(repository.is_closed());

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&snapshot).unwrap()).unwrap();
    let entries = written.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["status"], "persisted");
    assert_eq!(entries[1]["status"], "failed");
}

#[tokio::test]
async fn test_rerun_replaces_previous_batch() {
    let profile = aljazeera::profile();
    let repository = MemoryRepository::new();

    let first = BatchRunner::new(
        Arc::new(repository.clone()),
        Box::new(ScriptedLauncher::new(ScriptedDriver::site())),
        config(),
    )
    .run(&profile)
    .await
    .unwrap();
    assert_eq!(first.deleted_count, 0);

    let second = BatchRunner::new(
        Arc::new(repository.clone()),
        Box::new(ScriptedLauncher::new(ScriptedDriver::site())),
        config(),
    )
    .run(&profile)
    .await
    .unwrap();
    assert_eq!(second.deleted_count, 2);

    let stored = repository.get_by_resource("Al Jazeera").await.unwrap();
    assert_eq!(stored.len(), 2);
    for article in &first.articles {
        assert!(stored.iter().all(|s| s.id != article.id));
    }
    for article in &second.articles {
        assert!(stored.iter().any(|s| s.id == article.id));
    }
}

#[tokio::test]
async fn test_other_sources_are_untouched() {
    let profile = aljazeera::profile();
    let repository = MemoryRepository::new();
    let mut other = second_source_article();
    other.resource = "Other".to_string();
    repository.insert(&other).await.unwrap();

    BatchRunner::new(
        Arc::new(repository.clone()),
        Box::new(ScriptedLauncher::new(ScriptedDriver::site())),
        config(),
    )
    .run(&profile)
    .await
    .unwrap();

    assert_eq!(repository.get_by_resource("Other").await.unwrap(), vec![other]);
}

#[tokio::test]
async fn test_discovery_failure_still_releases_resources() {
    let profile = aljazeera::profile();
    let repository = MemoryRepository::new();
    let mut previous = second_source_article();
    previous.resource = "Al Jazeera".to_string();
    repository.insert(&previous).await.unwrap();

    let driver = ScriptedDriver::site().trending_ready_after(u32::MAX);
    let log = driver.log();

    let err = BatchRunner::new(
        Arc::new(repository.clone()),
        Box::new(ScriptedLauncher::new(driver)),
        config(),
    )
    .run(&profile)
    .await
    .unwrap_err();

    assert!(matches!(err, Error::DiscoveryTimeout { .. }));
    assert!(log.lock().unwrap().closed);
    assert!(repository.is_closed());
    // The delete is not rolled back.
    assert!(repository.get_by_resource("Al Jazeera").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_launch_failure_closes_repository() {
    let profile = aljazeera::profile();
    let repository = MemoryRepository::new();

    let err = BatchRunner::new(
        Arc::new(repository.clone()),
        Box::new(ScriptedLauncher::broken()),
        config(),
    )
    .run(&profile)
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Driver(_)));
    assert!(repository.is_closed());
}

fn second_source_article() -> nt_core::Article {
    nt_core::Article {
        id: "existing".to_string(),
        slug: "olderstory".to_string(),
        headline: "Older story".to_string(),
        summary: String::new(),
        body: String::new(),
        author: nt_core::DEFAULT_AUTHOR.to_string(),
        resource: String::new(),
        media: "https://example.com/logo.png".to_string(),
        link: "https://example.com/older".to_string(),
        date: String::new(),
    }
}
