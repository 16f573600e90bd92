use async_trait::async_trait;
use mp_core::{Error, NewsSource, RawArticle, Result};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use url::Url;
use super::{utils, DEFAULT_TIMEOUT};

const NAME: &str = "Yahoo Finance";

const HEADLINE_SELECTOR: &str = r"h3.Mb\(5px\)";

/// Desktop browser agent; the page serves a consent wall to unknown clients.
const BROWSER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub page_url: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            page_url: "https://finance.yahoo.com/topic/latest-news/".to_string(),
            base_url: "https://finance.yahoo.com".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl YahooConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::source_failed(NAME, format!("invalid selector {}: {}", css, e)))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extracts headlines from the latest-news page. Relative links are
/// resolved against `base_url`.
pub fn parse_headlines(html: &str, base_url: &str) -> Result<Vec<RawArticle>> {
    let base = Url::parse(base_url).map_err(|e| Error::source_failed(NAME, format!("invalid base URL: {}", e)))?;
    let headline = selector(HEADLINE_SELECTOR)?;
    let link = selector("a")?;

    let document = Html::parse_document(html);
    let mut articles = Vec::new();

    for element in document.select(&headline) {
        let anchor = element.select(&link).next();
        let title = anchor.map(text_of).unwrap_or_default();
        let url = anchor
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| base.join(href).ok())
            .map(String::from)
            .unwrap_or_default();

        let description = element
            .next_siblings()
            .find_map(ElementRef::wrap)
            .filter(|sibling| sibling.value().name() == "p")
            .map(text_of)
            .filter(|d| !d.is_empty());

        articles.push(RawArticle {
            title,
            description,
            url,
            source: Some(NAME.to_string()),
        });
    }

    Ok(utils::keep_with_url(NAME, articles))
}

/// Scrapes the latest-news listing. The query is not used.
pub struct YahooSource {
    config: YahooConfig,
    client: Client,
}

impl YahooSource {
    pub fn new(config: YahooConfig) -> Result<Self> {
        let client = utils::build_client(NAME, config.timeout, BROWSER_AGENT)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl NewsSource for YahooSource {
    fn name(&self) -> &str {
        NAME
    }

    async fn fetch(&self, _query: &str) -> Result<Vec<RawArticle>> {
        let html = utils::get_text(NAME, self.client.get(&self.config.page_url)).await?;
        parse_headlines(&html, &self.config.base_url)
    }
}
