use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vidmeta_common::{EXTRACT_DETAILS_PATH, ErrorBody, ExtractionResult};
use vidmeta_config::ServerConfig;

use crate::youtube::{YoutubeClient, extract_video_id};

#[derive(Clone)]
pub struct AppState {
    youtube: Option<Arc<YoutubeClient>>,
}

impl AppState {
    /// `None` keeps the server up but answers every extraction with a 500.
    pub fn new(youtube: Option<YoutubeClient>) -> Self {
        Self {
            youtube: youtube.map(Arc::new),
        }
    }

    pub fn from_config(cfg: &ServerConfig) -> anyhow::Result<Self> {
        let Some(key) = cfg.api_key() else {
            tracing::warn!("server.youtube_api_key.missing");
            return Ok(Self::new(None));
        };
        let client = YoutubeClient::new(&cfg.youtube_api_base, &key, &cfg.thumbnail_size)?;
        Ok(Self::new(Some(client)))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(EXTRACT_DETAILS_PATH, post(extract_details))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ExtractPayload {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
}

async fn extract_details(
    State(state): State<AppState>,
    payload: Result<Json<ExtractPayload>, JsonRejection>,
) -> Result<Json<ExtractionResult>, ApiError> {
    let youtube = state.youtube.as_ref().ok_or(ApiError::MissingApiKey)?;
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let url = payload
        .url
        .ok_or_else(|| ApiError::BadRequest("missing field `url`".into()))?;

    let video_id = extract_video_id(&url).ok_or(ApiError::InvalidUrl)?;
    tracing::info!(%video_id, "server.extract_details");

    match youtube.video_details(&video_id).await {
        Ok(Some(details)) => Ok(Json(details)),
        Ok(None) => Err(ApiError::NotFound),
        Err(err) => {
            tracing::error!(%video_id, error = %err, "server.youtube.failed");
            Err(ApiError::Upstream(err.to_string()))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("API Key not configured on the server.")]
    MissingApiKey,
    #[error("Invalid request body: {0}")]
    BadRequest(String),
    #[error("Invalid YouTube URL provided.")]
    InvalidUrl,
    #[error("Video not found or is private.")]
    NotFound,
    #[error("An API error occurred: {0}")]
    Upstream(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingApiKey | ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) | ApiError::InvalidUrl => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
