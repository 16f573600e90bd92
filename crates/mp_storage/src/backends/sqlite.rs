use async_trait::async_trait;
use chrono::Utc;
use mp_core::{ArticleStorage, Error, NormalizedArticle, PersistedArticle, RawArticle, Result, ScoredArticle};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use crate::{BackendConfig, StorageBackend};

pub const DEFAULT_SQLITE_PATH: &str = "marketpulse.sqlite";

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        url TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        source TEXT,
        lexicon_score REAL NOT NULL,
        nlp_score REAL NOT NULL,
        average_score REAL NOT NULL,
        normalized_sentiment REAL NOT NULL,
        sentiment_label TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    // Add future migrations here
];

const UPSERT: &str = r#"
    INSERT INTO articles
    (url, title, description, source, lexicon_score, nlp_score, average_score,
     normalized_sentiment, sentiment_label, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(url) DO UPDATE SET
        title = excluded.title,
        description = excluded.description,
        source = excluded.source,
        lexicon_score = excluded.lexicon_score,
        nlp_score = excluded.nlp_score,
        average_score = excluded.average_score,
        normalized_sentiment = excluded.normalized_sentiment,
        sentiment_label = excluded.sentiment_label,
        updated_at = excluded.updated_at
"#;

/// Row store. A batch is written in one transaction: either every article
/// lands or none do.
pub struct SQLiteStorage {
    pool: Arc<SqlitePool>,
    db_path: PathBuf,
}

#[async_trait]
impl StorageBackend for SQLiteStorage {
    fn get_error_message() -> &'static str {
        "SQLite database should be writable at the configured DATABASE_PATH"
    }

    async fn open(config: &BackendConfig) -> Result<Self> {
        Self::new_with_path(&config.get_path(DEFAULT_SQLITE_PATH)).await
    }
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("Failed to create database directory: {}", e)))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::Storage(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self {
            pool: Arc::new(pool),
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }
}

fn row_to_article(row: &SqliteRow) -> Result<PersistedArticle> {
    let get_err = |e: sqlx::Error| Error::Storage(format!("Failed to read article row: {}", e));
    let label: String = row.try_get("sentiment_label").map_err(get_err)?;

    Ok(NormalizedArticle {
        scored: ScoredArticle {
            article: RawArticle {
                title: row.try_get("title").map_err(get_err)?,
                description: row.try_get("description").map_err(get_err)?,
                url: row.try_get("url").map_err(get_err)?,
                source: row.try_get("source").map_err(get_err)?,
            },
            lexicon_score: row.try_get("lexicon_score").map_err(get_err)?,
            nlp_score: row.try_get("nlp_score").map_err(get_err)?,
            average_score: row.try_get("average_score").map_err(get_err)?,
        },
        normalized_sentiment: row.try_get("normalized_sentiment").map_err(get_err)?,
        sentiment_label: label.parse()?,
    })
}

#[async_trait]
impl ArticleStorage for SQLiteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn save(&self, articles: &[NormalizedArticle]) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::Storage(format!("Failed to begin transaction: {}", e)))?;

        for article in articles {
            let raw = &article.scored.article;
            sqlx::query(UPSERT)
                .bind(&raw.url)
                .bind(&raw.title)
                .bind(raw.description.as_deref())
                .bind(raw.source.as_deref())
                .bind(article.scored.lexicon_score)
                .bind(article.scored.nlp_score)
                .bind(article.scored.average_score)
                .bind(article.normalized_sentiment)
                .bind(article.sentiment_label.as_str())
                .bind(&updated_at)
                .execute(&mut *tx)
                .await
                .map_err(|e| Error::Storage(format!("Failed to store article {}: {}", raw.url, e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| Error::Storage(format!("Failed to commit articles: {}", e)))?;
        Ok(())
    }

    async fn load(&self) -> Result<Vec<PersistedArticle>> {
        let rows = sqlx::query(
            r#"
            SELECT url, title, description, source, lexicon_score, nlp_score,
                   average_score, normalized_sentiment, sentiment_label
            FROM articles
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Storage(format!("Failed to load articles: {}", e)))?;

        rows.iter().map(row_to_article).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::test_support::article;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_sqlite_upsert() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.sqlite");
        let storage = SQLiteStorage::new_with_path(&db_path).await.unwrap();

        storage.save(&[article("https://a", "Rally", 1.0)]).await.unwrap();
        storage
            .save(&[article("https://a", "Rally fades", -0.3), article("https://b", "Flat", 0.0)])
            .await
            .unwrap();

        let mut loaded = storage.load().await.unwrap();
        loaded.sort_by(|a, b| a.url().cmp(b.url()));
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], article("https://a", "Rally fades", -0.3));
        assert_eq!(loaded[1], article("https://b", "Flat", 0.0));
    }

    #[tokio::test]
    async fn test_sqlite_survives_reopen() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("test.sqlite");
        {
            let storage = SQLiteStorage::new_with_path(&db_path).await.unwrap();
            storage.save(&[article("https://a", "Rally", 1.0)]).await.unwrap();
        }
        let storage = SQLiteStorage::new_with_path(&db_path).await.unwrap();
        assert_eq!(storage.get_db_path(), db_path.as_path());
        assert_eq!(storage.load().await.unwrap().len(), 1);
    }
}
