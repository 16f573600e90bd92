use std::time::Duration;

pub mod finnhub;
pub mod gnews;
pub mod yahoo;

pub use finnhub::{FinnhubConfig, FinnhubSource};
pub use gnews::{GNewsConfig, GNewsSource};
pub use yahoo::{YahooConfig, YahooSource};

/// Per-request bound applied by every client unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared plumbing for the HTTP-backed sources
pub(crate) mod utils {
    use mp_core::{Error, RawArticle, Result};
    use reqwest::{Client, RequestBuilder};
    use std::time::Duration;
    use tracing::debug;

    pub const USER_AGENT: &str = concat!("marketpulse/", env!("CARGO_PKG_VERSION"));

    pub fn build_client(source_name: &str, timeout: Duration, user_agent: &str) -> Result<Client> {
        Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::source_failed(source_name, format!("failed to build HTTP client: {}", e)))
    }

    /// Request URLs carry API keys in the query string, so they never
    /// reach error messages.
    pub fn request_failed(source_name: &str, e: reqwest::Error) -> Error {
        Error::source_failed(source_name, e.without_url())
    }

    /// Sends the request and returns the body of a 2xx response.
    pub async fn get_text(source_name: &str, request: RequestBuilder) -> Result<String> {
        let response = request
            .send()
            .await
            .map_err(|e| request_failed(source_name, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::source_failed(source_name, format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| request_failed(source_name, e))
    }

    /// Trims and drops blank strings.
    pub fn non_empty(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// URL is the persistence key, so records without one are unusable.
    pub fn keep_with_url(source_name: &str, articles: Vec<RawArticle>) -> Vec<RawArticle> {
        let total = articles.len();
        let kept: Vec<RawArticle> = articles
            .into_iter()
            .filter(|a| !a.url.trim().is_empty())
            .collect();
        if kept.len() < total {
            debug!("{}: dropped {} records without a URL", source_name, total - kept.len());
        }
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::utils;
    use mp_core::RawArticle;

    #[test]
    fn test_non_empty() {
        assert_eq!(utils::non_empty(Some("  x ".to_string())), Some("x".to_string()));
        assert_eq!(utils::non_empty(Some("   ".to_string())), None);
        assert_eq!(utils::non_empty(None), None);
    }

    #[test]
    fn test_keep_with_url() {
        let kept = utils::keep_with_url("test", vec![
            RawArticle::new("a", "https://a"),
            RawArticle::new("b", " "),
            RawArticle::new("c", "https://c"),
        ]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].title, "c");
    }
}
