use nt_core::Article;

/// Creates the `"Article"` table when it does not exist yet; both SQLite and
/// Postgres accept this statement as written.
pub(crate) const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS "Article" (
        id TEXT PRIMARY KEY,
        slug TEXT NOT NULL,
        headline TEXT NOT NULL,
        summary TEXT NOT NULL DEFAULT '',
        body TEXT NOT NULL DEFAULT '',
        author TEXT NOT NULL DEFAULT '',
        resource TEXT NOT NULL DEFAULT '',
        media TEXT NOT NULL DEFAULT '',
        link TEXT NOT NULL DEFAULT '',
        date TEXT NOT NULL DEFAULT ''
    )
    "#,
    // Add future migrations here
];

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ArticleRow {
    id: String,
    slug: String,
    headline: String,
    summary: Option<String>,
    body: Option<String>,
    author: Option<String>,
    resource: Option<String>,
    media: Option<String>,
    link: Option<String>,
    date: Option<String>,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Article {
            id: row.id,
            slug: row.slug,
            headline: row.headline,
            summary: row.summary.unwrap_or_default(),
            body: row.body.unwrap_or_default(),
            author: row.author.unwrap_or_default(),
            resource: row.resource.unwrap_or_default(),
            media: row.media.unwrap_or_default(),
            link: row.link.unwrap_or_default(),
            date: row.date.unwrap_or_default(),
        }
    }
}
