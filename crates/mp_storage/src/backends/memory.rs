use async_trait::async_trait;
use mp_core::{ArticleStorage, NormalizedArticle, PersistedArticle, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::{BackendConfig, StorageBackend};

/// Process-local store. Contents are lost on exit.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    articles: Arc<RwLock<HashMap<String, PersistedArticle>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.articles.read().await.len()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    fn get_error_message() -> &'static str {
        "Memory storage should always be available"
    }

    async fn open(_config: &BackendConfig) -> Result<Self> {
        Ok(Self::new())
    }
}

#[async_trait]
impl ArticleStorage for InMemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    async fn save(&self, articles: &[NormalizedArticle]) -> Result<()> {
        let mut store = self.articles.write().await;
        for article in articles {
            store.insert(article.url().to_string(), article.clone());
        }
        Ok(())
    }

    async fn load(&self) -> Result<Vec<PersistedArticle>> {
        Ok(self.articles.read().await.values().cloned().collect())
    }
}
