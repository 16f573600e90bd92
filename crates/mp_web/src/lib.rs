use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::health))
        .route("/api/news-sentiment", get(handlers::news_sentiment))
        .route("/api/load-news", get(handlers::load_news))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Binds and serves until the process is stopped.
pub async fn serve(state: AppState, port: u16) -> mp_core::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("🚀 Server is running on http://localhost:{}", port);
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}

pub mod prelude {
    pub use crate::{create_app, serve, AppState};
    pub use mp_core::{Error, Result};
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use mp_core::{ArticleStorage, NewsSource, RawArticle, Result};
    use mp_sentiment::SentimentScorer;
    use mp_sources::{Pipeline, SourceManager};
    use mp_storage::{DisabledStorage, InMemoryStorage, Persistence, SaveOutcome};
    use serde_json::Value;
    use tower::ServiceExt;

    struct StaticSource(Vec<RawArticle>);

    #[async_trait]
    impl NewsSource for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        async fn fetch(&self, _query: &str) -> Result<Vec<RawArticle>> {
            Ok(self.0.clone())
        }
    }

    fn state_with(articles: Vec<RawArticle>, storage: Arc<dyn ArticleStorage>) -> AppState {
        let mut sources = SourceManager::new();
        sources.add_source(Arc::new(StaticSource(articles)));
        AppState::new(Pipeline::new(sources, SentimentScorer::default(), Persistence::spawn(storage)))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_app(state_with(vec![], Arc::new(InMemoryStorage::new())));
        let (status, body) = get_json(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Market Pulse is running");
        assert!(body["startedAt"].is_string());
    }

    #[tokio::test]
    async fn test_news_sentiment() {
        let state = state_with(
            vec![
                RawArticle::new("Stocks surge on strong earnings", "https://a"),
                RawArticle::new("Markets plunge amid fears", "https://b"),
            ],
            Arc::new(InMemoryStorage::new()),
        );
        let mut outcomes = state.pipeline.persistence().subscribe();
        let app = create_app(state);

        let (status, body) = get_json(app.clone(), "/api/news-sentiment?q=earnings").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["articles"].as_array().unwrap().len(), 2);
        assert_eq!(body["articles"][0]["sentimentLabel"], "Bullish");
        assert_eq!(body["articles"][0]["normalizedSentiment"], 1.0);
        assert_eq!(body["aggregatedSentiment"], 0.0);
        assert_eq!(body["marketSentiment"], "Neutral");

        assert_eq!(outcomes.recv().await.unwrap(), SaveOutcome::Saved { count: 2 });
        let (status, body) = get_json(app, "/api/load-news").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["articles"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_news_sentiment_not_found() {
        let app = create_app(state_with(vec![], Arc::new(InMemoryStorage::new())));
        let (status, body) = get_json(app, "/api/news-sentiment").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No news articles found.");

        let app = create_app(state_with(
            vec![RawArticle::new("", "https://blank")],
            Arc::new(InMemoryStorage::new()),
        ));
        let (status, body) = get_json(app, "/api/news-sentiment").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No valid articles for sentiment analysis.");
    }

    #[tokio::test]
    async fn test_load_news_empty_and_disabled() {
        let app = create_app(state_with(vec![], Arc::new(InMemoryStorage::new())));
        let (status, body) = get_json(app, "/api/load-news").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No articles found");

        let app = create_app(state_with(vec![], Arc::new(DisabledStorage)));
        let (status, body) = get_json(app, "/api/load-news").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().contains("disabled"));
    }
}
