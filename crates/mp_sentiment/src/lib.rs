pub mod aggregate;
pub mod lexicon;
pub mod normalize;
pub mod scorer;
pub mod strategies;
pub mod tokenize;

pub use aggregate::aggregate;
pub use lexicon::Lexicon;
pub use normalize::normalize;
pub use scorer::SentimentScorer;
pub use strategies::{AfinnStrategy, ScoringStrategy, StemmedStrategy};

pub mod prelude {
    pub use super::{aggregate, normalize, Lexicon, ScoringStrategy, SentimentScorer};
    pub use mp_core::{AggregateResult, NormalizedArticle, RawArticle, Result, ScoredArticle};
}

#[cfg(test)]
mod tests {
    use super::*;
    use mp_core::{MarketSentiment, RawArticle, SentimentLabel};

    #[test]
    fn test_scoring_pipeline() {
        let scorer = SentimentScorer::default();
        let scored = scorer.score_all(vec![
            RawArticle::new("Stocks surge on strong earnings", "https://a"),
            RawArticle::new("Markets plunge amid fears", "https://b"),
            RawArticle::new("Markets trade flat", "https://c"),
        ]);
        let normalized = normalize(scored);

        assert_eq!(normalized[0].normalized_sentiment, 1.0);
        assert_eq!(normalized[0].sentiment_label, SentimentLabel::Bullish);
        assert_eq!(normalized[1].normalized_sentiment, -1.0);
        assert_eq!(normalized[1].sentiment_label, SentimentLabel::Bearish);
        assert_eq!(normalized[2].normalized_sentiment, 0.0);
        assert_eq!(normalized[2].sentiment_label, SentimentLabel::Neutral);

        let result = aggregate(&normalized);
        assert_eq!(result.aggregated_sentiment, Some(0.0));
        assert_eq!(result.market_sentiment, MarketSentiment::Neutral);
    }
}
