use crate::lexicon::Lexicon;
use crate::tokenize::{is_negator, lexicon_tokens};
use super::ScoringStrategy;

/// Sums lexicon weights over the raw tokens. A negator directly before a
/// scored word flips that word's sign.
#[derive(Debug, Clone)]
pub struct AfinnStrategy {
    lexicon: Lexicon,
}

impl AfinnStrategy {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }
}

impl Default for AfinnStrategy {
    fn default() -> Self {
        Self::new(Lexicon::builtin())
    }
}

impl ScoringStrategy for AfinnStrategy {
    fn name(&self) -> &str {
        "afinn"
    }

    fn score(&self, text: &str) -> f64 {
        let tokens = lexicon_tokens(text);
        let mut total = 0;
        for (i, token) in tokens.iter().enumerate() {
            if let Some(weight) = self.lexicon.weight(token) {
                let negated = i > 0 && is_negator(&tokens[i - 1]);
                total += if negated { -weight } else { weight };
            }
        }
        total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sums_weights() {
        let strategy = AfinnStrategy::default();
        assert_eq!(strategy.score("Stocks surge on strong earnings"), 4.0);
        assert_eq!(strategy.score("Markets plunge amid fears"), -4.0);
        assert_eq!(strategy.score("Markets trade flat"), 0.0);
        assert_eq!(strategy.score(""), 0.0);
    }

    #[test]
    fn test_negation_flips_next_word() {
        let strategy = AfinnStrategy::default();
        assert_eq!(strategy.score("not good"), -3.0);
        assert_eq!(strategy.score("Earnings don't disappoint"), 2.0);
        assert_eq!(strategy.score("not a good day"), 3.0);
    }

    #[test]
    fn test_custom_lexicon() {
        let lexicon = Lexicon::from_afinn("moon\t5\nrug\t-5").unwrap();
        let strategy = AfinnStrategy::new(lexicon);
        assert_eq!(strategy.score("Token to the moon after rug fears"), 0.0);
        assert_eq!(strategy.score("MOON moon"), 10.0);
    }
}
