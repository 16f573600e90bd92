use mp_core::{NormalizedArticle, ScoredArticle, SentimentLabel};
use crate::scorer::finite_or_zero;

/// Rescales average scores into [-1, 1] relative to the most extreme score
/// on the same side of zero, then labels each article.
///
/// The extremes are floored at 1 and -1, so a batch whose strongest signal
/// is weaker than one lexicon point is not stretched to the full range.
/// Outside that case the most bullish article maps to exactly 1.0 and the
/// most bearish to exactly -1.0.
pub fn normalize(articles: Vec<ScoredArticle>) -> Vec<NormalizedArticle> {
    if articles.is_empty() {
        return Vec::new();
    }

    let scores = articles.iter().map(|a| finite_or_zero(a.average_score));
    let max_positive = scores.clone().filter(|s| *s > 0.0).fold(1.0, f64::max);
    let max_negative = scores.filter(|s| *s < 0.0).fold(-1.0, f64::min);

    articles
        .into_iter()
        .map(|scored| {
            let score = finite_or_zero(scored.average_score);
            let normalized_sentiment = if score > 0.0 {
                score / max_positive
            } else if score < 0.0 {
                score / max_negative.abs()
            } else {
                0.0
            };
            NormalizedArticle {
                scored,
                normalized_sentiment,
                sentiment_label: SentimentLabel::from_score(normalized_sentiment),
            }
        })
        .collect()
}
