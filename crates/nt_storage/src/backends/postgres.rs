use async_trait::async_trait;
use nt_core::{Article, ArticleRepository, Error, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::debug;
use super::row::{ArticleRow, MIGRATIONS};
use crate::StorageBackend;

/// Repository backed by the `"Article"` table of a Postgres database.
///
/// One pool is opened per batch; a single connection is enough since the
/// crawler inserts rows one at a time.
pub struct PostgresRepository {
    pool: PgPool,
}

#[async_trait]
impl StorageBackend for PostgresRepository {
    fn get_error_message() -> &'static str {
        "Postgres should be reachable through POSTGRES_CONNECTION_STRING"
    }

    async fn connect(url: Option<&str>) -> Result<Self> {
        let url = url.ok_or_else(|| {
            Error::Config("postgres storage requires a connection string".to_string())
        })?;
        Self::connect_url(url).await
    }
}

impl PostgresRepository {
    pub async fn connect_url(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(|e| Error::Persistence(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Persistence(format!("Failed to run migration {}: {}", i, e)))?;
        }
        debug!("Postgres schema ready");

        Ok(Self { pool })
    }
}

#[async_trait]
impl ArticleRepository for PostgresRepository {
    async fn delete_by_resource(&self, resource: &str) -> Result<u64> {
        let result = sqlx::query(r#"DELETE FROM "Article" WHERE resource = $1"#)
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
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
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
            WHERE resource = $1
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
