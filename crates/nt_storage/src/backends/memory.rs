use async_trait::async_trait;
use nt_core::{Article, ArticleRepository, Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::StorageBackend;

#[derive(Default)]
pub struct MemoryStore {
    articles: Vec<Article>,
}

impl MemoryStore {
    pub fn delete_by_resource(&mut self, resource: &str) -> u64 {
        let before = self.articles.len();
        self.articles.retain(|article| article.resource != resource);
        (before - self.articles.len()) as u64
    }

    pub fn insert(&mut self, article: &Article) -> Result<()> {
        if self.articles.iter().any(|a| a.id == article.id) {
            return Err(Error::Persistence(format!("duplicate article id {}", article.id)));
        }
        self.articles.push(article.clone());
        Ok(())
    }

    pub fn get_by_resource(&self, resource: &str) -> Vec<Article> {
        self.articles
            .iter()
            .filter(|article| article.resource == resource)
            .cloned()
            .collect()
    }
}

/// Process-local repository; clones share the same rows.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    store: Arc<RwLock<MemoryStore>>,
    closed: Arc<AtomicBool>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.articles.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl StorageBackend for MemoryRepository {
    fn get_error_message() -> &'static str {
        "Memory storage should be available"
    }

    async fn connect(_url: Option<&str>) -> Result<Self> {
        Ok(Self::new())
    }
}

#[async_trait]
impl ArticleRepository for MemoryRepository {
    async fn delete_by_resource(&self, resource: &str) -> Result<u64> {
        let mut store = self.store.write().await;
        Ok(store.delete_by_resource(resource))
    }

    async fn insert(&self, article: &Article) -> Result<()> {
        let mut store = self.store.write().await;
        store.insert(article)
    }

    async fn get_by_resource(&self, resource: &str) -> Result<Vec<Article>> {
        let store = self.store.read().await;
        Ok(store.get_by_resource(resource))
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
