use std::sync::Arc;
use mp_core::{RawArticle, ScoredArticle};
use tracing::debug;
use crate::lexicon::Lexicon;
use crate::strategies::{AfinnStrategy, ScoringStrategy, StemmedStrategy};

/// Runs two independent scoring strategies over an article's text and
/// averages them.
#[derive(Debug, Clone)]
pub struct SentimentScorer {
    lexicon: Arc<dyn ScoringStrategy>,
    nlp: Arc<dyn ScoringStrategy>,
}

impl SentimentScorer {
    pub fn new(lexicon: Arc<dyn ScoringStrategy>, nlp: Arc<dyn ScoringStrategy>) -> Self {
        Self { lexicon, nlp }
    }

    /// Both default strategies over the same word list.
    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        let nlp = StemmedStrategy::new(&lexicon);
        Self::new(Arc::new(AfinnStrategy::new(lexicon)), Arc::new(nlp))
    }

    pub fn strategy_names(&self) -> (&str, &str) {
        (self.lexicon.name(), self.nlp.name())
    }

    /// Returns `None` when the article has neither a title nor a description.
    pub fn score(&self, article: RawArticle) -> Option<ScoredArticle> {
        let Some(text) = article.text() else {
            debug!("🕳️ Dropping article without text: {}", article.url);
            return None;
        };

        let lexicon_score = finite_or_zero(self.lexicon.score(text));
        let nlp_score = finite_or_zero(self.nlp.score(text));
        let average_score = finite_or_zero((lexicon_score + nlp_score) / 2.0);

        Some(ScoredArticle {
            article,
            lexicon_score,
            nlp_score,
            average_score,
        })
    }

    pub fn score_all(&self, articles: Vec<RawArticle>) -> Vec<ScoredArticle> {
        articles.into_iter().filter_map(|a| self.score(a)).collect()
    }
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::with_lexicon(Lexicon::builtin())
    }
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Fixed(&'static str, f64);

    impl ScoringStrategy for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn score(&self, _text: &str) -> f64 {
            self.1
        }
    }

    #[test]
    fn test_average_of_both_strategies() {
        let scorer = SentimentScorer::default();
        let scored = scorer
            .score(RawArticle::new("Stocks surge on strong earnings", "https://a"))
            .unwrap();
        assert_eq!(scored.lexicon_score, 4.0);
        assert!((scored.nlp_score - 0.8).abs() < 1e-9);
        assert!((scored.average_score - 2.4).abs() < 1e-9);
        assert_eq!(scored.article.url, "https://a");
    }

    #[test]
    fn test_description_used_when_title_blank() {
        let scorer = SentimentScorer::default();
        let scored = scorer
            .score(RawArticle::new("", "https://a").with_description("Markets plunge amid fears"))
            .unwrap();
        assert_eq!(scored.lexicon_score, -4.0);
    }

    #[test]
    fn test_missing_text_is_dropped() {
        let scorer = SentimentScorer::default();
        assert!(scorer.score(RawArticle::new("  ", "https://a")).is_none());

        let kept = scorer.score_all(vec![
            RawArticle::new("", "https://a"),
            RawArticle::new("Markets trade flat", "https://b"),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].article.url, "https://b");
    }

    #[test]
    fn test_non_finite_scores_become_zero() {
        let scorer = SentimentScorer::new(
            Arc::new(Fixed("broken", f64::NAN)),
            Arc::new(Fixed("fine", 3.0)),
        );
        let scored = scorer.score(RawArticle::new("anything", "https://a")).unwrap();
        assert_eq!(scored.lexicon_score, 0.0);
        assert_eq!(scored.nlp_score, 3.0);
        assert_eq!(scored.average_score, 1.5);

        let scorer = SentimentScorer::new(
            Arc::new(Fixed("up", f64::INFINITY)),
            Arc::new(Fixed("down", f64::NEG_INFINITY)),
        );
        let scored = scorer.score(RawArticle::new("anything", "https://a")).unwrap();
        assert_eq!(scored.average_score, 0.0);
        assert_eq!(scorer.strategy_names(), ("up", "down"));
    }
}
