use std::collections::HashMap;
use std::fmt;
use rust_stemmers::{Algorithm, Stemmer};
use crate::lexicon::Lexicon;
use crate::tokenize::{is_negator, is_split_negator, word_tokens};
use super::ScoringStrategy;

/// Scores stemmed word tokens against a stemmed copy of the lexicon and
/// divides by the token count, so long texts are not favoured over short
/// ones the way a plain sum favours them.
pub struct StemmedStrategy {
    stemmer: Stemmer,
    stems: HashMap<String, i32>,
}

impl StemmedStrategy {
    pub fn new(lexicon: &Lexicon) -> Self {
        let stemmer = Stemmer::create(Algorithm::English);
        let mut stems: HashMap<String, i32> = HashMap::new();
        for (word, weight) in lexicon.iter() {
            // Single words only; phrases never match a word token.
            if word.contains(char::is_whitespace) {
                continue;
            }
            let stem = stemmer.stem(word).into_owned();
            // Words sharing a stem keep the strongest weight, so the table
            // does not depend on hash iteration order.
            stems
                .entry(stem)
                .and_modify(|current| {
                    if (weight.abs(), weight) > (current.abs(), *current) {
                        *current = weight;
                    }
                })
                .or_insert(weight);
        }
        Self { stemmer, stems }
    }

    fn stem_weight(&self, token: &str) -> Option<i32> {
        self.stems.get(self.stemmer.stem(token).as_ref()).copied()
    }
}

impl Default for StemmedStrategy {
    fn default() -> Self {
        Self::new(&Lexicon::builtin())
    }
}

impl fmt::Debug for StemmedStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StemmedStrategy")
            .field("stemmer", &"<english snowball>")
            .field("stems", &self.stems.len())
            .finish()
    }
}

impl ScoringStrategy for StemmedStrategy {
    fn name(&self) -> &str {
        "stemmed"
    }

    fn score(&self, text: &str) -> f64 {
        let tokens = word_tokens(text);
        if tokens.is_empty() {
            return 0.0;
        }

        let mut total = 0;
        let mut negate = false;
        let mut prev: Option<&str> = None;
        for token in &tokens {
            let split_negator = is_split_negator(prev, token);
            prev = Some(token);
            if split_negator || is_negator(token) {
                negate = true;
                continue;
            }
            if let Some(weight) = self.stem_weight(token) {
                total += if negate { -weight } else { weight };
                negate = false;
            }
        }
        total as f64 / tokens.len() as f64
    }
}
