use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mp_core::Error;
use serde_json::json;
use tracing::error;

/// Maps pipeline errors onto the HTTP contract: empty batches are
/// `404 {message}`, everything else `{error}` with a 5xx status.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Pipeline(Error),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        if err.is_not_found() {
            Self::NotFound(err.to_string())
        } else {
            Self::Pipeline(err)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
            }
            Self::Pipeline(err) => {
                let status = match err {
                    Error::PersistenceDisabled => StatusCode::SERVICE_UNAVAILABLE,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                error!("❌ Request failed: {}", err);
                (status, Json(json!({ "error": err.to_string() }))).into_response()
            }
        }
    }
}
