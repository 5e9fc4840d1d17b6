use async_trait::async_trait;
use nt_core::{ArticleRepository, Error, Result};
use std::sync::Arc;
use tracing::info;

pub mod backends;

pub use backends::*;

/// Storage backends the CLI can select by name.
pub const BACKENDS: &[&str] = &["memory", "sqlite", "postgres"];

#[async_trait]
pub trait StorageBackend: ArticleRepository {
    fn get_error_message() -> &'static str
    where
        Self: Sized;

    async fn connect(url: Option<&str>) -> Result<Self>
    where
        Self: Sized;
}

async fn open<T: StorageBackend + 'static>(url: Option<&str>) -> Result<Arc<dyn ArticleRepository>> {
    match T::connect(url).await {
        Ok(backend) => Ok(Arc::new(backend)),
        Err(e) => Err(Error::Persistence(format!("{} ({})", T::get_error_message(), e))),
    }
}

#[allow(dead_code)]
fn not_compiled(kind: &str) -> Error {
    Error::Config(format!(
        "storage backend '{}' was not compiled in; rebuild with --features {}",
        kind, kind
    ))
}

/// Opens the repository named by `kind`, connecting with `url` when the backend needs one.
pub async fn create_repository(kind: &str, url: Option<&str>) -> Result<Arc<dyn ArticleRepository>> {
    let repository = match kind {
        "memory" => open::<MemoryRepository>(url).await?,
        #[cfg(feature = "sqlite")]
        "sqlite" => open::<SqliteRepository>(url).await?,
        #[cfg(feature = "postgres")]
        "postgres" => open::<PostgresRepository>(url).await?,
        #[cfg(not(feature = "sqlite"))]
        "sqlite" => return Err(not_compiled(kind)),
        #[cfg(not(feature = "postgres"))]
        "postgres" => return Err(not_compiled(kind)),
        other => {
            return Err(Error::Config(format!(
                "unknown storage backend '{}', expected one of: {}",
                other,
                BACKENDS.join(", ")
            )))
        }
    };
    info!(backend = kind, "Storage backend connected");
    Ok(repository)
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_repository, StorageBackend};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_memory_repository() {
        let repository = create_repository("memory", None).await.unwrap();
        assert!(repository.get_by_resource("anything").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_backend_is_config_error() {
        let err = create_repository("mongo", None).await.err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }
}
