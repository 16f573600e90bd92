use async_trait::async_trait;
use mp_core::{NewsSource, RawArticle, Result};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use super::{utils, DEFAULT_TIMEOUT};

const NAME: &str = "Finnhub";

#[derive(Clone)]
pub struct FinnhubConfig {
    pub api_key: String,
    pub base_url: String,
    pub category: String,
    pub timeout: Duration,
}

impl fmt::Debug for FinnhubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinnhubConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("category", &self.category)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl FinnhubConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://finnhub.io".to_string(),
            category: "general".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct MarketNews {
    headline: Option<String>,
    summary: Option<String>,
    url: Option<String>,
    source: Option<String>,
}

/// Maps a `/api/v1/news` response body (a bare JSON array).
pub fn parse_response(body: &str) -> Result<Vec<RawArticle>> {
    let items: Vec<MarketNews> = serde_json::from_str(body)?;
    let articles = items
        .into_iter()
        .map(|item| RawArticle {
            title: utils::non_empty(item.headline).unwrap_or_default(),
            description: utils::non_empty(item.summary),
            url: item.url.unwrap_or_default(),
            source: utils::non_empty(item.source),
        })
        .collect();
    Ok(utils::keep_with_url(NAME, articles))
}

/// General market news. The query is not used: the endpoint only filters
/// by category.
pub struct FinnhubSource {
    config: FinnhubConfig,
    client: Client,
}

impl FinnhubSource {
    pub fn new(config: FinnhubConfig) -> Result<Self> {
        let client = utils::build_client(NAME, config.timeout, utils::USER_AGENT)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl NewsSource for FinnhubSource {
    fn name(&self) -> &str {
        NAME
    }

    async fn fetch(&self, _query: &str) -> Result<Vec<RawArticle>> {
        let request = self
            .client
            .get(format!("{}/api/v1/news", self.config.base_url.trim_end_matches('/')))
            .query(&[
                ("category", self.config.category.as_str()),
                ("token", self.config.api_key.as_str()),
            ]);

        let body = utils::get_text(NAME, request).await?;
        parse_response(&body).map_err(|e| mp_core::Error::source_failed(NAME, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response() {
        let body = r#"[
            {
                "category": "top news",
                "datetime": 1700000000,
                "headline": "Markets plunge amid fears",
                "id": 7,
                "image": "",
                "related": "",
                "source": "Reuters",
                "summary": "Selling accelerated late in the session.",
                "url": "https://finnhub.example/7"
            },
            { "headline": "Missing url", "summary": "", "source": "CNBC", "url": "" }
        ]"#;

        let articles = parse_response(body).unwrap();
        assert_eq!(
            articles,
            vec![RawArticle::new("Markets plunge amid fears", "https://finnhub.example/7")
                .with_description("Selling accelerated late in the session.")
                .with_source("Reuters")]
        );
    }

    #[tokio::test]
    async fn test_fetch_error_hides_key() {
        let config = FinnhubConfig::new("SUPERSECRETKEY")
            .with_base_url("http://127.0.0.1:1")
            .with_timeout(Duration::from_secs(2));
        let source = FinnhubSource::new(config).unwrap();

        let err = source.fetch("ignored").await.unwrap_err();
        assert!(!err.to_string().contains("SUPERSECRETKEY"), "{}", err);
        assert!(!format!("{:?}", err).contains("SUPERSECRETKEY"));
    }

    #[test]
    fn test_parse_response_rejects_object() {
        assert!(parse_response(r#"{"error": "Invalid API key"}"#).is_err());
    }
}
