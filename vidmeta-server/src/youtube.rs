//! YouTube Data API lookup and the helpers that shape its answer.

use regex::Regex;
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use vidmeta_common::ExtractionResult;
use vidmeta_http::{Auth, HttpClient, HttpError, RequestOpts};

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:v=|youtu\.be/)([A-Za-z0-9_-]+)").expect("video id pattern compiles")
});

const FALLBACK_THUMBNAILS: [&str; 3] = ["medium", "high", "default"];
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(15);

/// Video id from a watch (`...?v=ID`) or short (`youtu.be/ID`) link.
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Total whole seconds of an ISO-8601 duration such as `PT1H2M3S` or `P1DT2H`.
///
/// Weeks and days are accepted; years and months are not, since their length
/// is ambiguous. Fractional seconds are truncated.
pub fn parse_iso8601_duration(raw: &str) -> Option<u64> {
    let rest = raw.trim().strip_prefix('P')?;
    let mut total = 0f64;
    let mut in_time = false;
    let mut saw_component = false;
    let mut num = String::new();

    for c in rest.chars() {
        match c {
            'T' => {
                if in_time || !num.is_empty() {
                    return None;
                }
                in_time = true;
            }
            '0'..='9' | '.' => num.push(c),
            ',' => num.push('.'),
            unit => {
                let value: f64 = num.parse().ok()?;
                num.clear();
                let scale = match (in_time, unit) {
                    (false, 'W') => 7.0 * 86_400.0,
                    (false, 'D') => 86_400.0,
                    (true, 'H') => 3_600.0,
                    (true, 'M') => 60.0,
                    (true, 'S') => 1.0,
                    _ => return None,
                };
                total += value * scale;
                saw_component = true;
            }
        }
    }

    if !num.is_empty() || !saw_component {
        return None;
    }
    Some(total.floor() as u64)
}

/// `HH:MM:SS` with two-digit fields; hours are not capped at 24.
pub fn format_duration(iso: &str) -> Option<String> {
    let total = parse_iso8601_duration(iso)?;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    Some(format!("{hours:02}:{minutes:02}:{seconds:02}"))
}

#[derive(Debug, Error)]
pub enum YoutubeError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("unsupported duration {0:?}")]
    Duration(String),
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Snippet,
    #[serde(rename = "contentDetails")]
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "publishedAt")]
    published_at: String,
    #[serde(default)]
    thumbnails: HashMap<String, Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: String,
}

/// Client for `videos.list` with `part=snippet,contentDetails`.
#[derive(Clone, Debug)]
pub struct YoutubeClient {
    http: HttpClient,
    api_key: String,
    thumbnail_size: String,
}

impl YoutubeClient {
    pub fn new(api_base: &str, api_key: &str, thumbnail_size: &str) -> Result<Self, HttpError> {
        let http = HttpClient::new(api_base)?
            .with_timeout(UPSTREAM_TIMEOUT)
            .with_retries(1);
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            thumbnail_size: thumbnail_size.to_string(),
        })
    }

    /// `Ok(None)` when the API knows no public video with this id.
    pub async fn video_details(
        &self,
        video_id: &str,
    ) -> Result<Option<ExtractionResult>, YoutubeError> {
        let opts = RequestOpts {
            query: Some(vec![
                ("part", Cow::Borrowed("snippet,contentDetails")),
                ("id", Cow::Borrowed(video_id)),
            ]),
            auth: Some(Auth::Query {
                name: "key",
                value: Cow::Borrowed(self.api_key.as_str()),
            }),
            ..Default::default()
        };
        let resp: VideoListResponse = self.http.get_json("videos", opts).await?;

        let Some(item) = resp.items.into_iter().next() else {
            return Ok(None);
        };

        let duration_formatted = format_duration(&item.content_details.duration)
            .ok_or_else(|| YoutubeError::Duration(item.content_details.duration.clone()))?;
        let thumbnail_url = self.pick_thumbnail(&item.snippet.thumbnails);
        let published_at = item
            .snippet
            .published_at
            .get(..10)
            .unwrap_or(item.snippet.published_at.as_str())
            .to_string();

        Ok(Some(ExtractionResult {
            title: item.snippet.title,
            thumbnail_url,
            video_id: video_id.to_string(),
            description: item.snippet.description,
            duration_formatted,
            published_at,
        }))
    }

    fn pick_thumbnail(&self, thumbs: &HashMap<String, Thumbnail>) -> String {
        std::iter::once(self.thumbnail_size.as_str())
            .chain(FALLBACK_THUMBNAILS)
            .find_map(|size| thumbs.get(size))
            .map(|t| t.url.clone())
            .unwrap_or_default()
    }
}
