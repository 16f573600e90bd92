use async_trait::async_trait;
use crate::types::{NormalizedArticle, PersistedArticle};
use crate::Result;

/// The persistence capability set. Every backend upserts by article URL:
/// a later save of the same URL overwrites the stored record.
#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// Backend name used in logs
    fn name(&self) -> &str;

    /// Insert or overwrite each article, keyed by URL
    async fn save(&self, articles: &[NormalizedArticle]) -> Result<()>;

    /// Every stored article, in no particular order
    async fn load(&self) -> Result<Vec<PersistedArticle>>;
}
