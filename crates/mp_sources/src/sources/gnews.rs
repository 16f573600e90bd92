use async_trait::async_trait;
use mp_core::{NewsSource, RawArticle, Result};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use super::{utils, DEFAULT_TIMEOUT};

const NAME: &str = "GNews";

#[derive(Clone)]
pub struct GNewsConfig {
    pub api_key: String,
    pub base_url: String,
    pub max_results: u32,
    pub timeout: Duration,
}

impl fmt::Debug for GNewsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GNewsConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("max_results", &self.max_results)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GNewsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://gnews.io".to_string(),
            max_results: 10,
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
struct SearchResponse {
    #[serde(default)]
    articles: Vec<GNewsArticle>,
}

#[derive(Debug, Deserialize)]
struct GNewsArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    source: Option<Publisher>,
}

#[derive(Debug, Deserialize)]
struct Publisher {
    name: Option<String>,
}

/// Maps a `/api/v4/search` response body.
pub fn parse_response(body: &str) -> Result<Vec<RawArticle>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    let articles = response
        .articles
        .into_iter()
        .map(|a| RawArticle {
            title: utils::non_empty(a.title).unwrap_or_default(),
            description: utils::non_empty(a.description),
            url: a.url.unwrap_or_default(),
            source: utils::non_empty(a.source.and_then(|s| s.name)),
        })
        .collect();
    Ok(utils::keep_with_url(NAME, articles))
}

pub struct GNewsSource {
    config: GNewsConfig,
    client: Client,
}

impl GNewsSource {
    pub fn new(config: GNewsConfig) -> Result<Self> {
        let client = utils::build_client(NAME, config.timeout, utils::USER_AGENT)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl NewsSource for GNewsSource {
    fn name(&self) -> &str {
        NAME
    }

    async fn fetch(&self, query: &str) -> Result<Vec<RawArticle>> {
        let max = self.config.max_results.to_string();
        let request = self
            .client
            .get(format!("{}/api/v4/search", self.config.base_url.trim_end_matches('/')))
            .query(&[
                ("q", query),
                ("lang", "en"),
                ("country", "us"),
                ("max", max.as_str()),
                ("token", self.config.api_key.as_str()),
            ]);

        let body = utils::get_text(NAME, request).await?;
        parse_response(&body).map_err(|e| mp_core::Error::source_failed(NAME, e))
    }
}
