use futures::future::join_all;
use mp_core::{NewsSource, RawArticle, Result};
use std::sync::Arc;
use tracing::{info, warn};
use crate::sources::{
    FinnhubConfig, FinnhubSource, GNewsConfig, GNewsSource, YahooConfig, YahooSource,
};

/// Which sources to register. Unset entries are skipped.
#[derive(Debug, Clone, Default)]
pub struct SourcesConfig {
    pub gnews: Option<GNewsConfig>,
    pub finnhub: Option<FinnhubConfig>,
    pub yahoo: Option<YahooConfig>,
}

/// Runs every registered source concurrently and waits for all of them.
#[derive(Clone, Default)]
pub struct SourceManager {
    sources: Vec<Arc<dyn NewsSource>>,
}

impl SourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers sources in a fixed order: GNews, Finnhub, Yahoo Finance.
    pub fn from_config(config: &SourcesConfig) -> Result<Self> {
        let mut manager = Self::new();
        if let Some(gnews) = &config.gnews {
            manager.add_source(Arc::new(GNewsSource::new(gnews.clone())?));
        }
        if let Some(finnhub) = &config.finnhub {
            manager.add_source(Arc::new(FinnhubSource::new(finnhub.clone())?));
        }
        if let Some(yahoo) = &config.yahoo {
            manager.add_source(Arc::new(YahooSource::new(yahoo.clone())?));
        }
        Ok(manager)
    }

    pub fn add_source(&mut self, source: Arc<dyn NewsSource>) {
        self.sources.push(source);
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Concatenates each source's articles in registration order. A failing
    /// source is logged and contributes nothing; this never fails.
    pub async fn fetch(&self, query: &str) -> Vec<RawArticle> {
        let results = join_all(self.sources.iter().map(|source| source.fetch(query))).await;

        let mut articles = Vec::new();
        for (source, result) in self.sources.iter().zip(results) {
            match result {
                Ok(mut batch) => {
                    info!("📰 {} returned {} articles", source.name(), batch.len());
                    articles.append(&mut batch);
                }
                Err(e) => warn!("⚠️ {} failed, skipping: {}", source.name(), e),
            }
        }
        articles
    }
}
