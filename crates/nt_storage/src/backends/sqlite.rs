use async_trait::async_trait;
use nt_core::{Article, ArticleRepository, Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::path::Path;
use tracing::debug;
use super::row::{ArticleRow, MIGRATIONS};
use crate::StorageBackend;

pub struct SqliteRepository {
    pool: SqlitePool,
}

#[async_trait]
impl StorageBackend for SqliteRepository {
    fn get_error_message() -> &'static str {
        "SQLite database should be available at ./articles.db"
    }

    async fn connect(url: Option<&str>) -> Result<Self> {
        let path = url
            .map(|u| u.trim_start_matches("sqlite://").trim_start_matches("sqlite:"))
            .unwrap_or("articles.db");
        Self::new_with_path(Path::new(path)).await
    }
}

impl SqliteRepository {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::Persistence(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Persistence(format!("Failed to run migration {}: {}", i, e)))?;
        }
        debug!(path = %db_path.display(), "SQLite schema ready");

        Ok(Self { pool })
    }
}

#[async_trait]
impl ArticleRepository for SqliteRepository {
    async fn delete_by_resource(&self, resource: &str) -> Result<u64> {
        let result = sqlx::query(r#"DELETE FROM "Article" WHERE resource = ?"#)
            .bind(resource)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Persistence(format!("Failed to delete articles: {}", e)))?;
        Ok(result.rows_affected())
    }

    async fn insert(&self, article: &Article) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO "Article"
            (id, slug, headline, summary, body, author, resource, media, link, date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&article.id)
        .bind(&article.slug)
        .bind(&article.headline)
        .bind(&article.summary)
        .bind(&article.body)
        .bind(&article.author)
        .bind(&article.resource)
        .bind(&article.media)
        .bind(&article.link)
        .bind(&article.date)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Persistence(format!("Failed to store article: {}", e)))?;

        Ok(())
    }

    async fn get_by_resource(&self, resource: &str) -> Result<Vec<Article>> {
        let rows: Vec<ArticleRow> = sqlx::query_as(
            r#"
            SELECT id, slug, headline, summary, body, author, resource, media, link, date
            FROM "Article"
            WHERE resource = ?
            "#,
        )
        .bind(resource)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Persistence(format!("Failed to get articles by resource: {}", e)))?;

        Ok(rows.into_iter().map(Article::from).collect())
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn article(id: &str) -> Article {
        Article {
            id: id.to_string(),
            slug: "stormhitscoastal".to_string(),
            headline: "Storm hits coastal city".to_string(),
            summary: "Short summary".to_string(),
            body: String::new(),
            author: "See article for details".to_string(),
            resource: "Al Jazeera".to_string(),
            media: "https://example.com/logo.png".to_string(),
            link: "https://example.com/storm".to_string(),
            date: String::new(),
        }
    }

    #[tokio::test]
    async fn test_sqlite_repository() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let repository = SqliteRepository::new_with_path(&db_path).await.unwrap();
        repository.insert(&article("a")).await.unwrap();
        repository.insert(&article("b")).await.unwrap();

        let stored = repository.get_by_resource("Al Jazeera").await.unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().any(|a| a == &article("a")));

        assert_eq!(repository.delete_by_resource("Al Jazeera").await.unwrap(), 2);
        assert!(repository.get_by_resource("Al Jazeera").await.unwrap().is_empty());

        repository.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_id_fails() {
        let temp_dir = tempdir().unwrap();
        let repository = SqliteRepository::new_with_path(&temp_dir.path().join("dup.db"))
            .await
            .unwrap();
        repository.insert(&article("a")).await.unwrap();
        let err = repository.insert(&article("a")).await.unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
    }
}
