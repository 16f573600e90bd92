use async_trait::async_trait;
use crate::types::RawArticle;
use crate::Result;

/// A provider of raw article records for a query.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Short name used in logs and error messages
    fn name(&self) -> &str;

    /// Fetch the articles this source has for `query`. Sources without
    /// query support may ignore it.
    async fn fetch(&self, query: &str) -> Result<Vec<RawArticle>>;
}
