//! Shared wire types and utilities for the vidmeta crates.
//!
//! Both sides of the `/extract_details` exchange depend on this crate: the
//! server serializes [`ExtractionResult`] and [`ErrorBody`], the view layer
//! deserializes them. It also carries the [`observability`] setup that every
//! binary and integration test shares.
//!
//! # Examples
//!
//! ```rust
//! use vidmeta_common::{ExtractionResult, DEFAULT_WATCH_HOST};
//!
//! let json = r#"{
//!     "title": "T",
//!     "thumbnail_url": "https://img/x.jpg",
//!     "videoId": "abc123",
//!     "description": "D",
//!     "duration_formatted": "3:45",
//!     "publishedAt": "2023-05-01T00:00:00Z"
//! }"#;
//! let result: ExtractionResult = serde_json::from_str(json).unwrap();
//! assert_eq!(
//!     result.watch_url(DEFAULT_WATCH_HOST),
//!     "https://www.youtube.com/watch?v=abc123"
//! );
//! ```
use serde::{Deserialize, Serialize};

pub mod observability;

/// Path of the single extraction endpoint.
pub const EXTRACT_DETAILS_PATH: &str = "/extract_details";

/// Host used to build canonical watch links.
pub const DEFAULT_WATCH_HOST: &str = "www.youtube.com";

/// Body of `POST /extract_details`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractRequest {
    pub url: String,
}

/// Metadata returned for one video. Every field is display-ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub title: String,
    pub thumbnail_url: String,
    #[serde(rename = "videoId")]
    pub video_id: String,
    pub description: String,
    /// Already formatted by the server, e.g. `00:03:45`.
    pub duration_formatted: String,
    /// ISO-8601 timestamp or bare `YYYY-MM-DD` date.
    #[serde(rename = "publishedAt")]
    pub published_at: String,
}

impl ExtractionResult {
    /// Canonical watch link for this video on `host`.
    pub fn watch_url(&self, host: &str) -> String {
        watch_url(host, &self.video_id)
    }
}

/// Error payload of a non-2xx response. `error` may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
        }
    }
}

/// `https://<host>/watch?v=<video_id>`
pub fn watch_url(host: &str, video_id: &str) -> String {
    format!("https://{host}/watch?v={video_id}")
}
