use ::duckdb::{params, Connection, Row};
use async_trait::async_trait;
use chrono::Utc;
use mp_core::{ArticleStorage, Error, NormalizedArticle, PersistedArticle, RawArticle, Result, ScoredArticle};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use crate::backends::dedupe_by_url;
use crate::{BackendConfig, StorageBackend};

pub const DEFAULT_DUCKDB_PATH: &str = "marketpulse.duckdb";

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS articles (
        url VARCHAR PRIMARY KEY,
        title VARCHAR NOT NULL,
        description VARCHAR,
        source VARCHAR,
        lexicon_score DOUBLE NOT NULL,
        nlp_score DOUBLE NOT NULL,
        average_score DOUBLE NOT NULL,
        normalized_sentiment DOUBLE NOT NULL,
        sentiment_label VARCHAR NOT NULL,
        updated_at VARCHAR NOT NULL
    );
"#;

/// Embedded columnar store. The connection is synchronous, so every call
/// runs on the blocking pool.
pub struct DuckDbStorage {
    conn: Arc<Mutex<Connection>>,
    db_path: PathBuf,
}

fn db_err(context: &str) -> impl Fn(::duckdb::Error) -> Error + '_ {
    move |e| Error::Storage(format!("{}: {}", context, e))
}

#[async_trait]
impl StorageBackend for DuckDbStorage {
    fn get_error_message() -> &'static str {
        "DuckDB file should be writable at the configured DATABASE_PATH"
    }

    async fn open(config: &BackendConfig) -> Result<Self> {
        Self::new_with_path(&config.get_path(DEFAULT_DUCKDB_PATH)).await
    }
}

impl DuckDbStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let path = db_path.to_path_buf();
        let conn = tokio::task::spawn_blocking(move || -> Result<Connection> {
            let conn = Connection::open(&path).map_err(db_err("Failed to open database"))?;
            conn.execute_batch(SCHEMA).map_err(db_err("Failed to create schema"))?;
            Ok(conn)
        })
        .await
        .map_err(|e| Error::External(e.into()))??;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| Error::Storage("DuckDB connection lock poisoned".to_string()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| Error::External(e.into()))?
    }
}

fn row_to_article(row: &Row<'_>) -> ::duckdb::Result<(PersistedArticle, String)> {
    let label: String = row.get(8)?;
    let article = NormalizedArticle {
        scored: ScoredArticle {
            article: RawArticle {
                url: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                source: row.get(3)?,
            },
            lexicon_score: row.get(4)?,
            nlp_score: row.get(5)?,
            average_score: row.get(6)?,
        },
        normalized_sentiment: row.get(7)?,
        // Placeholder until the label column is parsed below
        sentiment_label: mp_core::SentimentLabel::Neutral,
    };
    Ok((article, label))
}

#[async_trait]
impl ArticleStorage for DuckDbStorage {
    fn name(&self) -> &str {
        "duckdb"
    }

    async fn save(&self, articles: &[NormalizedArticle]) -> Result<()> {
        let batch: Vec<NormalizedArticle> = dedupe_by_url(articles).into_iter().cloned().collect();
        let updated_at = Utc::now().to_rfc3339();

        self.with_conn(move |conn| {
            let tx = conn.transaction().map_err(db_err("Failed to begin transaction"))?;
            {
                let mut stmt = tx
                    .prepare(
                        "INSERT OR REPLACE INTO articles
                         (url, title, description, source, lexicon_score, nlp_score, average_score,
                          normalized_sentiment, sentiment_label, updated_at)
                         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    )
                    .map_err(db_err("Failed to prepare upsert"))?;

                for article in &batch {
                    let raw = &article.scored.article;
                    stmt.execute(params![
                        raw.url,
                        raw.title,
                        raw.description,
                        raw.source,
                        article.scored.lexicon_score,
                        article.scored.nlp_score,
                        article.scored.average_score,
                        article.normalized_sentiment,
                        article.sentiment_label.as_str(),
                        updated_at,
                    ])
                    .map_err(|e| Error::Storage(format!("Failed to store article {}: {}", raw.url, e)))?;
                }
            }
            tx.commit().map_err(db_err("Failed to commit articles"))?;
            Ok(())
        })
        .await
    }

    async fn load(&self) -> Result<Vec<PersistedArticle>> {
        let rows = self
            .with_conn(|conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT url, title, description, source, lexicon_score, nlp_score,
                                average_score, normalized_sentiment, sentiment_label
                         FROM articles",
                    )
                    .map_err(db_err("Failed to prepare load"))?;
                let rows = stmt
                    .query_map([], row_to_article)
                    .map_err(db_err("Failed to load articles"))?
                    .collect::<::duckdb::Result<Vec<_>>>()
                    .map_err(db_err("Failed to read article row"))?;
                Ok(rows)
            })
            .await?;

        rows.into_iter()
            .map(|(mut article, label)| {
                article.sentiment_label = label.parse()?;
                Ok(article)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::test_support::article;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_duckdb_upsert() {
        let temp_dir = tempdir().unwrap();
        let storage = DuckDbStorage::new_with_path(&temp_dir.path().join("test.duckdb"))
            .await
            .unwrap();

        storage.save(&[article("https://a", "Rally", 1.0)]).await.unwrap();
        storage
            .save(&[
                article("https://a", "Rally fades", -0.3),
                article("https://b", "Flat", 0.0),
                article("https://b", "Flat again", 0.1),
            ])
            .await
            .unwrap();

        let mut loaded = storage.load().await.unwrap();
        loaded.sort_by(|a, b| a.url().cmp(b.url()));
        assert_eq!(loaded, vec![
            article("https://a", "Rally fades", -0.3),
            article("https://b", "Flat again", 0.1),
        ]);
    }

    #[tokio::test]
    async fn test_duckdb_empty_load() {
        let temp_dir = tempdir().unwrap();
        let storage = DuckDbStorage::new_with_path(&temp_dir.path().join("empty.duckdb"))
            .await
            .unwrap();
        assert!(storage.load().await.unwrap().is_empty());
    }
}
