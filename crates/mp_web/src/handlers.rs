use axum::{
    extract::{Query, State},
    Json,
};
use mp_core::{PersistedArticle, SentimentReport};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use crate::{ApiError, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime: String,
    pub started_at: String,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Health> {
    let secs = state.uptime().as_secs();
    Json(Health {
        status: "Market Pulse is running",
        version: env!("CARGO_PKG_VERSION"),
        uptime: format!("{} minutes {} seconds", secs / 60, secs % 60),
        started_at: state.started_at.to_rfc3339(),
    })
}

#[derive(Debug, Deserialize)]
pub struct SentimentQuery {
    pub q: Option<String>,
}

pub async fn news_sentiment(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SentimentQuery>,
) -> Result<Json<SentimentReport>, ApiError> {
    let report = state.pipeline.analyze(params.q.as_deref()).await?;
    Ok(Json(report))
}

#[derive(Debug, Serialize)]
pub struct LoadedArticles {
    pub articles: Vec<PersistedArticle>,
}

pub async fn load_news(State(state): State<Arc<AppState>>) -> Result<Json<LoadedArticles>, ApiError> {
    let articles = state.pipeline.load().await?;
    if articles.is_empty() {
        return Err(ApiError::NotFound("No articles found".to_string()));
    }
    Ok(Json(LoadedArticles { articles }))
}
