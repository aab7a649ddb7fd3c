use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::analysis::AnalysisPipeline;
use crate::error::Error;
use crate::models::ScoreReport;

pub struct AppState {
    pub pipeline: AnalysisPipeline,
}

pub fn build_router(state: Arc<AppState>, cors_origin: &str) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/analyze", post(analyze))
        .layer(cors_layer(cors_origin))
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin {
        "*" => base.allow_origin(Any),
        exact => match exact.parse::<HeaderValue>() {
            Ok(value) => base.allow_origin(value),
            Err(_) => {
                tracing::warn!("Invalid CORS_ORIGIN '{}', allowing any origin", exact);
                base.allow_origin(Any)
            }
        },
    }
}

async fn health() -> &'static str {
    "GitHub Portfolio Analyzer API is running"
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    #[serde(rename = "profileUrl", default)]
    profile_url: Option<String>,
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<ScoreReport>, ApiError> {
    let Some(profile_url) = request.profile_url.as_deref().filter(|url| !url.is_empty()) else {
        return Err(ApiError::BadRequest("Profile URL is required".to_string()));
    };

    let report = state.pipeline.analyze(profile_url).await?;
    Ok(Json(report))
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// Analysis failures keep the legacy behavior of a 500 carrying the
    /// underlying error message, including user-not-found.
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
