pub mod logging;
pub mod manager;
pub mod pipeline;
pub mod sources;

pub use logging::init_logging;
pub use manager::{SourceManager, SourcesConfig};
pub use pipeline::{Pipeline, DEFAULT_QUERY};

pub mod prelude {
    pub use super::sources::{FinnhubConfig, GNewsConfig, YahooConfig, DEFAULT_TIMEOUT};
    pub use super::{Pipeline, SourceManager, SourcesConfig};
    pub use mp_core::{Error, NewsSource, RawArticle, Result};
}
