use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Normalized scores strictly above this are bullish, strictly below its
/// negation bearish.
pub const LABEL_THRESHOLD: f64 = 0.2;

/// An article as handed over by a news source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl RawArticle {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            url: url.into(),
            source: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The text sentiment is computed from: the title, or the description
    /// when the title is blank.
    pub fn text(&self) -> Option<&str> {
        let title = self.title.trim();
        if !title.is_empty() {
            return Some(title);
        }
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredArticle {
    #[serde(flatten)]
    pub article: RawArticle,
    pub lexicon_score: f64,
    pub nlp_score: f64,
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedArticle {
    #[serde(flatten)]
    pub scored: ScoredArticle,
    pub normalized_sentiment: f64,
    pub sentiment_label: SentimentLabel,
}

impl NormalizedArticle {
    pub fn url(&self) -> &str {
        &self.scored.article.url
    }

    pub fn title(&self) -> &str {
        &self.scored.article.title
    }
}

/// The durable record. Identity is the article URL.
pub type PersistedArticle = NormalizedArticle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Bullish,
    Neutral,
    Bearish,
}

impl SentimentLabel {
    /// Threshold classification shared by per-article and aggregate scores.
    pub fn from_score(score: f64) -> Self {
        if score > LABEL_THRESHOLD {
            Self::Bullish
        } else if score < -LABEL_THRESHOLD {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "Bullish",
            Self::Neutral => "Neutral",
            Self::Bearish => "Bearish",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "Bullish" => Ok(Self::Bullish),
            "Neutral" => Ok(Self::Neutral),
            "Bearish" => Ok(Self::Bearish),
            other => Err(crate::Error::Storage(format!("Unknown sentiment label: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketSentiment {
    Bullish,
    Neutral,
    Bearish,
    #[serde(rename = "No data")]
    NoData,
}

impl From<SentimentLabel> for MarketSentiment {
    fn from(label: SentimentLabel) -> Self {
        match label {
            SentimentLabel::Bullish => Self::Bullish,
            SentimentLabel::Neutral => Self::Neutral,
            SentimentLabel::Bearish => Self::Bearish,
        }
    }
}

impl fmt::Display for MarketSentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bullish => f.write_str("Bullish"),
            Self::Neutral => f.write_str("Neutral"),
            Self::Bearish => f.write_str("Bearish"),
            Self::NoData => f.write_str("No data"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub aggregated_sentiment: Option<f64>,
    pub market_sentiment: MarketSentiment,
}

impl AggregateResult {
    pub fn no_data() -> Self {
        Self {
            aggregated_sentiment: None,
            market_sentiment: MarketSentiment::NoData,
        }
    }
}

/// What a sentiment run hands back to the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentReport {
    pub articles: Vec<NormalizedArticle>,
    #[serde(flatten)]
    pub aggregate: AggregateResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalized() -> NormalizedArticle {
        NormalizedArticle {
            scored: ScoredArticle {
                article: RawArticle::new("Stocks surge", "https://example.com/a")
                    .with_description("Strong earnings")
                    .with_source("gnews"),
                lexicon_score: 2.0,
                nlp_score: 1.0,
                average_score: 1.5,
            },
            normalized_sentiment: 1.0,
            sentiment_label: SentimentLabel::Bullish,
        }
    }

    #[test]
    fn test_text_prefers_title() {
        let article = RawArticle::new("  Title ", "u").with_description("Description");
        assert_eq!(article.text(), Some("Title"));

        let article = RawArticle::new("", "u").with_description("Description");
        assert_eq!(article.text(), Some("Description"));

        let article = RawArticle::new(" ", "u").with_description("  ");
        assert_eq!(article.text(), None);

        assert_eq!(RawArticle::new("", "u").text(), None);
    }

    #[test]
    fn test_label_thresholds() {
        assert_eq!(SentimentLabel::from_score(0.21), SentimentLabel::Bullish);
        assert_eq!(SentimentLabel::from_score(0.2), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(0.0), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-0.2), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-0.21), SentimentLabel::Bearish);
        assert_eq!(SentimentLabel::from_score(1.0), SentimentLabel::Bullish);
        assert_eq!(SentimentLabel::from_score(-1.0), SentimentLabel::Bearish);
    }

    #[test]
    fn test_article_wire_shape() {
        let value = serde_json::to_value(normalized()).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Stocks surge",
                "description": "Strong earnings",
                "url": "https://example.com/a",
                "source": "gnews",
                "lexiconScore": 2.0,
                "nlpScore": 1.0,
                "averageScore": 1.5,
                "normalizedSentiment": 1.0,
                "sentimentLabel": "Bullish"
            })
        );

        let back: NormalizedArticle = serde_json::from_value(value).unwrap();
        assert_eq!(back, normalized());
    }

    #[test]
    fn test_report_wire_shape() {
        let report = SentimentReport {
            articles: vec![],
            aggregate: AggregateResult::no_data(),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({ "articles": [], "aggregatedSentiment": null, "marketSentiment": "No data" })
        );
    }

    #[test]
    fn test_market_sentiment_from_label() {
        assert_eq!(MarketSentiment::from(SentimentLabel::Bearish), MarketSentiment::Bearish);
        assert_eq!(MarketSentiment::NoData.to_string(), "No data");
    }
}
