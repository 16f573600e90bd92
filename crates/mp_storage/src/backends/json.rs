use async_trait::async_trait;
use mp_core::{ArticleStorage, NormalizedArticle, PersistedArticle, Result};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use crate::{BackendConfig, StorageBackend};

pub const DEFAULT_JSON_PATH: &str = "articles.json";

/// Flat-file store: the whole collection as one JSON array.
///
/// Saves read the current file, merge by URL and replace the file through
/// a temporary sibling and a rename, so a failed save leaves the previous
/// contents intact. Writers in this process are serialised by `lock`.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStorage {
    pub async fn new_with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn get_path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<PersistedArticle>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, articles: &[PersistedArticle]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(articles)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for JsonFileStorage {
    fn get_error_message() -> &'static str {
        "JSON file storage needs a writable path"
    }

    async fn open(config: &BackendConfig) -> Result<Self> {
        Self::new_with_path(config.get_path(DEFAULT_JSON_PATH)).await
    }
}

#[async_trait]
impl ArticleStorage for JsonFileStorage {
    fn name(&self) -> &str {
        "json"
    }

    async fn save(&self, articles: &[NormalizedArticle]) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut stored = self.read_all().await?;
        let mut index: HashMap<String, usize> = stored
            .iter()
            .enumerate()
            .map(|(i, a)| (a.url().to_string(), i))
            .collect();

        for article in articles {
            match index.get(article.url()) {
                Some(&i) => stored[i] = article.clone(),
                None => {
                    index.insert(article.url().to_string(), stored.len());
                    stored.push(article.clone());
                }
            }
        }

        self.write_all(&stored).await
    }

    async fn load(&self) -> Result<Vec<PersistedArticle>> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::test_support::article;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let storage = JsonFileStorage::new_with_path(dir.path().join("nested/articles.json"))
            .await
            .unwrap();
        assert!(storage.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_upsert() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("articles.json");
        let storage = JsonFileStorage::new_with_path(&path).await.unwrap();

        storage
            .save(&[article("https://a", "Rally", 1.0), article("https://b", "Slump", -1.0)])
            .await
            .unwrap();
        storage.save(&[article("https://a", "Rally fades", 0.1)]).await.unwrap();

        let loaded = storage.load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].title(), "Rally fades");
        assert_eq!(loaded[0].normalized_sentiment, 0.1);
        assert_eq!(loaded[1].title(), "Slump");

        // a fresh handle on the same file sees the same records
        let reopened = JsonFileStorage::new_with_path(&path).await.unwrap();
        assert_eq!(reopened.load().await.unwrap(), loaded);
        assert!(!dir.path().join("articles.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("articles.json");
        std::fs::write(&path, "{ not json").unwrap();
        let storage = JsonFileStorage::new_with_path(&path).await.unwrap();
        assert!(storage.load().await.is_err());
        assert!(storage.save(&[article("https://a", "x", 0.0)]).await.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }
}
