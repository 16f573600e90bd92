use mp_core::{Error, PersistedArticle, Result, SentimentReport};
use mp_sentiment::{aggregate, normalize, SentimentScorer};
use mp_storage::Persistence;
use tracing::info;
use crate::manager::SourceManager;

pub const DEFAULT_QUERY: &str = "stock market";

/// Fetch, score, normalize and aggregate; then hand the batch to the
/// persistence worker without waiting for it.
#[derive(Clone)]
pub struct Pipeline {
    sources: SourceManager,
    scorer: SentimentScorer,
    persistence: Persistence,
}

impl Pipeline {
    pub fn new(sources: SourceManager, scorer: SentimentScorer, persistence: Persistence) -> Self {
        Self {
            sources,
            scorer,
            persistence,
        }
    }

    pub fn sources(&self) -> &SourceManager {
        &self.sources
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    pub async fn analyze(&self, query: Option<&str>) -> Result<SentimentReport> {
        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or(DEFAULT_QUERY);
        info!("🔍 Analyzing news sentiment for {:?}", query);

        let raw = self.sources.fetch(query).await;
        if raw.is_empty() {
            return Err(Error::NoArticles);
        }

        let scored = self.scorer.score_all(raw);
        if scored.is_empty() {
            return Err(Error::NoScorableArticles);
        }

        let articles = normalize(scored);
        let aggregate = aggregate(&articles);
        info!(
            "📊 {} articles, market sentiment {} ({:?})",
            articles.len(),
            aggregate.market_sentiment,
            aggregate.aggregated_sentiment
        );

        self.persistence.submit(articles.clone());

        Ok(SentimentReport { articles, aggregate })
    }

    pub async fn load(&self) -> Result<Vec<PersistedArticle>> {
        self.persistence.load().await
    }
}
