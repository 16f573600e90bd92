use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A single source failed. Never fatal to a fetch.
    #[error("Source {source_name} failed: {message}")]
    Source { source_name: String, message: String },

    #[error("No news articles found.")]
    NoArticles,

    #[error("No valid articles for sentiment analysis.")]
    NoScorableArticles,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database functionality is disabled. Set the DATABASE configuration value to enable it.")]
    PersistenceDisabled,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Lexicon error: {0}")]
    Lexicon(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    pub fn source_failed(source_name: impl Into<String>, message: impl ToString) -> Self {
        Self::Source {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    pub fn storage(message: impl ToString) -> Self {
        Self::Storage(message.to_string())
    }

    /// True for the empty-batch conditions the boundary reports as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoArticles | Self::NoScorableArticles)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(Error::NoArticles.is_not_found());
        assert!(Error::NoScorableArticles.is_not_found());
        assert!(!Error::PersistenceDisabled.is_not_found());
        assert!(!Error::storage("disk full").is_not_found());
    }

    #[test]
    fn test_source_error_message() {
        let err = Error::source_failed("gnews", "timed out");
        assert_eq!(err.to_string(), "Source gnews failed: timed out");
    }
}
