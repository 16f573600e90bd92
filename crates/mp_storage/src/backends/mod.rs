use std::collections::HashMap;
use mp_core::NormalizedArticle;

pub mod disabled;
pub mod json;
pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "duckdb")]
pub mod duckdb;

#[cfg(feature = "qdrant")]
pub mod qdrant;

pub use disabled::DisabledStorage;
pub use json::JsonFileStorage;
pub use memory::InMemoryStorage;

#[cfg(feature = "sqlite")]
pub use sqlite::SQLiteStorage;

#[cfg(feature = "duckdb")]
pub use self::duckdb::DuckDbStorage;

#[cfg(feature = "qdrant")]
pub use qdrant::QdrantStorage;

/// Collapses a batch to one article per URL, the last occurrence winning,
/// keeping first-seen order.
pub(crate) fn dedupe_by_url(articles: &[NormalizedArticle]) -> Vec<&NormalizedArticle> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<&NormalizedArticle> = Vec::with_capacity(articles.len());
    for article in articles {
        match index.get(article.url()) {
            Some(&i) => out[i] = article,
            None => {
                index.insert(article.url(), out.len());
                out.push(article);
            }
        }
    }
    out
}

#[cfg(test)]
pub(crate) mod test_support {
    use mp_core::{NormalizedArticle, RawArticle, ScoredArticle, SentimentLabel};

    pub fn article(url: &str, title: &str, normalized: f64) -> NormalizedArticle {
        NormalizedArticle {
            scored: ScoredArticle {
                article: RawArticle::new(title, url)
                    .with_description(format!("{} description", title))
                    .with_source("test"),
                lexicon_score: normalized * 4.0,
                nlp_score: normalized,
                average_score: normalized * 2.5,
            },
            normalized_sentiment: normalized,
            sentiment_label: SentimentLabel::from_score(normalized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::test_support::article;

    #[test]
    fn test_dedupe_keeps_last_value_first_position() {
        let batch = vec![
            article("https://a", "first a", 0.1),
            article("https://b", "b", 0.2),
            article("https://a", "second a", 0.9),
        ];
        let deduped = dedupe_by_url(&batch);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].title(), "second a");
        assert_eq!(deduped[1].title(), "b");
    }
}
