pub mod error;
pub mod source;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use source::NewsSource;
pub use storage::ArticleStorage;
pub use types::{
    AggregateResult, MarketSentiment, NormalizedArticle, PersistedArticle, RawArticle,
    ScoredArticle, SentimentLabel, SentimentReport, LABEL_THRESHOLD,
};
