use mp_core::{AggregateResult, MarketSentiment, NormalizedArticle, SentimentLabel};

/// Mean normalized sentiment of the batch, labelled with the same thresholds
/// used per article. An empty batch has no data.
pub fn aggregate(articles: &[NormalizedArticle]) -> AggregateResult {
    let values: Vec<f64> = articles
        .iter()
        .map(|a| a.normalized_sentiment)
        .filter(|v| !v.is_nan())
        .collect();

    if values.is_empty() {
        return AggregateResult::no_data();
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    AggregateResult {
        aggregated_sentiment: Some(mean),
        market_sentiment: MarketSentiment::from(SentimentLabel::from_score(mean)),
    }
}
