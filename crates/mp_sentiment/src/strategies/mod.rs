use std::fmt;

pub mod afinn;
pub mod stemmed;

pub use afinn::AfinnStrategy;
pub use stemmed::StemmedStrategy;

/// One independent way of turning text into a polarity score.
pub trait ScoringStrategy: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Polarity of `text`. Positive is bullish, negative bearish.
    fn score(&self, text: &str) -> f64;
}
