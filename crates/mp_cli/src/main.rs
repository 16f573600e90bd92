use clap::{Parser, Subcommand};
use mp_core::{ArticleStorage, Error, Result};
use mp_sentiment::{Lexicon, SentimentScorer};
use mp_sources::sources::{FinnhubConfig, GNewsConfig, YahooConfig};
use mp_sources::{Pipeline, SourceManager, SourcesConfig};
use mp_storage::{BackendConfig, Persistence};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const STORAGE_RETRIES: u32 = 3;

/// A duration such as `10`, `10s`, `1m30s` or `2h`. Bare numbers are seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if !current_number.is_empty() {
                let num = current_number
                    .parse::<u64>()
                    .map_err(|_| "Invalid number in duration".to_string())?;
                let unit = match c {
                    's' => 1,
                    'm' => 60,
                    'h' => 3600,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                };
                total_seconds = num
                    .checked_mul(unit)
                    .and_then(|secs| total_seconds.checked_add(secs))
                    .ok_or_else(|| format!("Duration too large: {}", s))?;
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        if !current_number.is_empty() {
            total_seconds = current_number
                .parse::<u64>()
                .ok()
                .and_then(|secs| total_seconds.checked_add(secs))
                .ok_or_else(|| format!("Invalid number in duration: {}", s))?;
            has_unit = true;
        }

        if !has_unit {
            return Err("Duration must include a number".to_string());
        }
        if total_seconds == 0 {
            return Err("Duration must be greater than zero".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(name = "mp", author, version, about = "Market news sentiment aggregator", long_about = None)]
struct Cli {
    /// Storage backend: memory, sqlite, duckdb, qdrant or json. Unset disables persistence.
    #[arg(long, env = "DATABASE")]
    storage: Option<String>,
    /// File location for sqlite, duckdb and json backends
    #[arg(long, env = "DATABASE_PATH")]
    storage_path: Option<PathBuf>,
    #[arg(long, env = "QDRANT_URL")]
    qdrant_url: Option<String>,
    /// Collection name for the qdrant backend
    #[arg(long, env = "DATABASE_COLLECTION")]
    collection: Option<String>,
    #[arg(long, env = "GNEWS_API_KEY", hide_env_values = true)]
    gnews_api_key: Option<String>,
    #[arg(long, env = "FINNHUB_API_KEY", hide_env_values = true)]
    finnhub_api_key: Option<String>,
    /// Skip the Yahoo Finance scraper
    #[arg(long)]
    no_scrape: bool,
    /// Per-source request timeout (e.g. 10, 10s, 1m)
    #[arg(long, env = "SOURCE_TIMEOUT_SECS", default_value = "10")]
    source_timeout: HumanDuration,
    /// AFINN-format lexicon file replacing the built-in table
    #[arg(long, env = "LEXICON_PATH")]
    lexicon: Option<PathBuf>,
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve {
        #[arg(long, env = "PORT", default_value_t = 3001)]
        port: u16,
    },
    /// Fetch and score news once, printing the result
    Analyze {
        /// Search query, defaults to "stock market"
        #[arg(long, short)]
        query: Option<String>,
    },
    /// Print every stored article
    Load,
}

impl Cli {
    fn backend_config(&self) -> Result<BackendConfig> {
        let mut config = BackendConfig::from_name(self.storage.as_deref())?;
        config.path = self.storage_path.clone();
        config.url = self.qdrant_url.clone();
        config.collection = self.collection.clone();
        Ok(config)
    }

    fn sources_config(&self) -> SourcesConfig {
        let timeout = self.source_timeout.0;
        SourcesConfig {
            gnews: self
                .gnews_api_key
                .as_ref()
                .filter(|k| !k.trim().is_empty())
                .map(|k| GNewsConfig::new(k.trim()).with_timeout(timeout)),
            finnhub: self
                .finnhub_api_key
                .as_ref()
                .filter(|k| !k.trim().is_empty())
                .map(|k| FinnhubConfig::new(k.trim()).with_timeout(timeout)),
            yahoo: (!self.no_scrape).then(|| YahooConfig::default().with_timeout(timeout)),
        }
    }

    fn scorer(&self) -> Result<SentimentScorer> {
        match &self.lexicon {
            Some(path) => {
                let lexicon = Lexicon::load(path)?;
                info!("📖 Loaded {} lexicon entries from {}", lexicon.len(), path.display());
                Ok(SentimentScorer::with_lexicon(lexicon))
            }
            None => Ok(SentimentScorer::default()),
        }
    }
}

/// Opens the configured backend, retrying transient storage failures.
/// Configuration errors fail immediately.
async fn create_storage_with_retry(config: &BackendConfig) -> Result<Arc<dyn ArticleStorage>> {
    let mut attempt = 1;
    loop {
        match mp_storage::create_storage(config).await {
            Ok(storage) => return Ok(storage),
            Err(e @ Error::Storage(_)) if attempt < STORAGE_RETRIES => {
                warn!("Storage initialization failed ({}), retrying {}/{}...", e, attempt, STORAGE_RETRIES);
                attempt += 1;
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

fn print_articles(articles: &[mp_core::NormalizedArticle]) {
    for article in articles {
        println!(
            "{:>8} {:>6.2}  {}",
            article.sentiment_label.as_str(),
            article.normalized_sentiment,
            article.title()
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(Error::Configuration(format!("Failed to read .env: {}", e)));
        }
    }
    let cli = Cli::parse();
    mp_sources::init_logging(&cli.log_level);

    let backend = cli.backend_config()?;
    let storage = create_storage_with_retry(&backend).await?;
    let persistence = Persistence::spawn(storage);

    let sources = SourceManager::from_config(&cli.sources_config())?;
    if sources.is_empty() {
        warn!("⚠️ No news sources configured; set GNEWS_API_KEY, FINNHUB_API_KEY or drop --no-scrape");
    } else {
        info!("🦗 Sources initialized: {}", sources.source_names().join(", "));
    }

    let pipeline = Pipeline::new(sources, cli.scorer()?, persistence.clone());

    match cli.command {
        Commands::Serve { port } => {
            mp_web::serve(mp_web::AppState::new(pipeline), port).await?;
        }
        Commands::Analyze { query } => {
            let mut outcomes = persistence.subscribe();
            let report = pipeline.analyze(query.as_deref()).await?;
            print_articles(&report.articles);
            match report.aggregate.aggregated_sentiment {
                Some(score) => println!("Market sentiment: {} ({:.3})", report.aggregate.market_sentiment, score),
                None => println!("Market sentiment: {}", report.aggregate.market_sentiment),
            }
            // Let the background save finish before the runtime shuts down
            if let Ok(outcome) = outcomes.recv().await {
                info!("Persistence outcome: {:?}", outcome);
            }
        }
        Commands::Load => {
            let articles = pipeline.load().await?;
            if articles.is_empty() {
                println!("No articles found");
            } else {
                print_articles(&articles);
            }
        }
    }

    Ok(())
}
