use async_trait::async_trait;
use mp_core::{ArticleStorage, Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

pub mod backends;
pub mod persistence;

pub use backends::*;
pub use persistence::{Persistence, SaveOutcome};

/// A backend that can be opened from configuration.
#[async_trait]
pub trait StorageBackend: ArticleStorage + Sized {
    /// Hint appended to open failures
    fn get_error_message() -> &'static str;

    async fn open(config: &BackendConfig) -> Result<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    Sqlite,
    DuckDb,
    Qdrant,
    Json,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
            Self::DuckDb => "duckdb",
            Self::Qdrant => "qdrant",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            "duckdb" => Ok(Self::DuckDb),
            "qdrant" => Ok(Self::Qdrant),
            "json" => Ok(Self::Json),
            other => Err(Error::Configuration(format!(
                "Unsupported DATABASE value: {:?} (expected memory, sqlite, duckdb, qdrant or json)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BackendConfig {
    /// `None` disables persistence
    pub kind: Option<StorageKind>,
    pub path: Option<PathBuf>,
    pub url: Option<String>,
    pub collection: Option<String>,
}

impl BackendConfig {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn new(kind: StorageKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Parses the configured backend name. Unset or blank disables
    /// persistence; anything unrecognised is a configuration error.
    pub fn from_name(name: Option<&str>) -> Result<Self> {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            None => Ok(Self::disabled()),
            Some(name) => Ok(Self::new(name.parse()?)),
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn get_path(&self, default: &str) -> PathBuf {
        self.path.clone().unwrap_or_else(|| PathBuf::from(default))
    }

    pub fn get_url(&self, default: &str) -> String {
        self.url.clone().unwrap_or_else(|| default.to_string())
    }

    pub fn get_collection(&self) -> String {
        self.collection.clone().unwrap_or_else(|| "articles".to_string())
    }
}

/// Builds the configured backend once, at startup.
pub async fn create_storage(config: &BackendConfig) -> Result<Arc<dyn ArticleStorage>> {
    let Some(kind) = config.kind else {
        info!("💤 Database functionality is disabled. Set DATABASE to enable it.");
        return Ok(Arc::new(DisabledStorage));
    };

    match kind {
        StorageKind::Memory => open::<InMemoryStorage>(config).await,
        StorageKind::Json => open::<JsonFileStorage>(config).await,
        #[cfg(feature = "sqlite")]
        StorageKind::Sqlite => open::<SQLiteStorage>(config).await,
        #[cfg(feature = "duckdb")]
        StorageKind::DuckDb => open::<DuckDbStorage>(config).await,
        #[cfg(feature = "qdrant")]
        StorageKind::Qdrant => open::<QdrantStorage>(config).await,
        #[allow(unreachable_patterns)]
        other => Err(Error::Configuration(format!(
            "Storage backend {} is not compiled in; rebuild with `--features {}`",
            other, other
        ))),
    }
}

async fn open<T: StorageBackend + 'static>(config: &BackendConfig) -> Result<Arc<dyn ArticleStorage>> {
    let storage = T::open(config)
        .await
        .map_err(|e| Error::Storage(format!("{} ({})", e, T::get_error_message())))?;
    info!("🏦 Storage backend initialized successfully (using {})", storage.name());
    Ok(Arc::new(storage))
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, BackendConfig, Persistence, SaveOutcome, StorageKind};
}
