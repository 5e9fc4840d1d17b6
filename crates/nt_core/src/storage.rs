use async_trait::async_trait;
use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Delete every stored article for a resource, returning how many were removed
    async fn delete_by_resource(&self, resource: &str) -> Result<u64>;

    /// Insert a single article row
    async fn insert(&self, article: &Article) -> Result<()>;

    /// Get all articles stored for a resource
    async fn get_by_resource(&self, resource: &str) -> Result<Vec<Article>>;

    /// Release the underlying connection
    async fn close(&self) -> Result<()>;
}
