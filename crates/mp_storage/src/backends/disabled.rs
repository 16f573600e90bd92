use async_trait::async_trait;
use mp_core::{ArticleStorage, Error, NormalizedArticle, PersistedArticle, Result};

/// Stands in when no backend is configured. Both operations fail with
/// `PersistenceDisabled` so callers decide how loud to be about it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledStorage;

#[async_trait]
impl ArticleStorage for DisabledStorage {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn save(&self, _articles: &[NormalizedArticle]) -> Result<()> {
        Err(Error::PersistenceDisabled)
    }

    async fn load(&self) -> Result<Vec<PersistedArticle>> {
        Err(Error::PersistenceDisabled)
    }
}
