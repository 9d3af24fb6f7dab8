use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use vidmeta_common::{ExtractRequest, ExtractionResult};
use vidmeta_http::{HttpClient, HttpError, RequestOpts};

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a valid YouTube URL.";

/// Why a submission produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// Input was empty after trimming; nothing was sent.
    #[error("{}", EMPTY_INPUT_MESSAGE)]
    EmptyInput,
    /// Non-2xx status. `message` is the server's `error` field, or a generic
    /// text naming the status when the body had none.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),
    /// A 2xx response whose body was not an extraction result.
    #[error("{0}")]
    Decode(String),
}

impl ExtractError {
    /// `error` is the body's `error` field; an empty one counts as absent.
    pub fn rejected(status: u16, error: Option<String>) -> Self {
        let message = error
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Server error! Status: {status}"));
        ExtractError::Rejected { status, message }
    }

    /// Text for the error banner.
    pub fn banner_text(&self) -> String {
        match self {
            ExtractError::EmptyInput => EMPTY_INPUT_MESSAGE.to_string(),
            other => format!("Error: {other}. Please check URL and API status."),
        }
    }
}

impl From<HttpError> for ExtractError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Api { status, .. } => {
                ExtractError::rejected(status.as_u16(), err.error_field())
            }
            HttpError::Decode(reason, _) => ExtractError::Decode(reason),
            other @ (HttpError::Network(_) | HttpError::Url(_) | HttpError::Build(_)) => {
                ExtractError::Transport(other.to_string())
            }
        }
    }
}

/// One extraction call. This is the only place a submission waits.
#[async_trait]
pub trait ExtractBackend: Send + Sync {
    async fn extract(&self, url: &str) -> Result<ExtractionResult, ExtractError>;
}

/// Backend that POSTs `{ "url": ... }` to the metadata server.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: HttpClient,
    endpoint: String,
}

impl HttpBackend {
    /// `timeout: None` lets a request wait as long as the server takes.
    pub fn new(
        server_url: &str,
        endpoint: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, HttpError> {
        let mut client = HttpClient::new(server_url)?.with_retries(0);
        if let Some(t) = timeout {
            client = client.with_timeout(t);
        }
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl ExtractBackend for HttpBackend {
    async fn extract(&self, url: &str) -> Result<ExtractionResult, ExtractError> {
        let body = ExtractRequest {
            url: url.to_string(),
        };
        let opts = RequestOpts {
            retries: Some(0),
            ..Default::default()
        };
        self.client
            .post_json::<_, ExtractionResult>(&self.endpoint, &body, opts)
            .await
            .map_err(ExtractError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_prefers_server_message() {
        let e = ExtractError::rejected(400, Some("Invalid URL".into()));
        assert_eq!(
            e.banner_text(),
            "Error: Invalid URL. Please check URL and API status."
        );
    }

    #[test]
    fn rejected_without_message_names_status() {
        let e = ExtractError::rejected(503, None);
        assert!(e.banner_text().contains("503"));
        assert_eq!(
            e,
            ExtractError::Rejected {
                status: 503,
                message: "Server error! Status: 503".into()
            }
        );
    }

    #[test]
    fn rejected_with_empty_error_names_status() {
        let e = ExtractError::rejected(500, Some(String::new()));
        assert!(e.banner_text().contains("500"));
        let e = ExtractError::rejected(500, Some("  ".into()));
        assert_eq!(e.banner_text(), "Error:   . Please check URL and API status.");
    }

    #[test]
    fn api_error_uses_only_the_error_field() {
        let err = HttpError::Api {
            status: vidmeta_http::StatusCode::SERVICE_UNAVAILABLE,
            server_message: Some("detail text".into()),
            request_id: "-".into(),
            body: r#"{"detail":"detail text"}"#.into(),
        };
        assert_eq!(
            ExtractError::from(err),
            ExtractError::Rejected {
                status: 503,
                message: "Server error! Status: 503".into()
            }
        );
    }

    #[test]
    fn empty_input_banner_is_plain() {
        assert_eq!(
            ExtractError::EmptyInput.banner_text(),
            "Please enter a valid YouTube URL."
        );
    }

    #[test]
    fn transport_banner_wraps_cause() {
        let e = ExtractError::from(HttpError::Network("connection refused".into()));
        let banner = e.banner_text();
        assert!(banner.starts_with("Error: network error: connection refused"));
        assert!(banner.ends_with("Please check URL and API status."));
    }

    #[test]
    fn decode_error_keeps_reason_only() {
        let e = ExtractError::from(HttpError::Decode(
            "missing field `title`".into(),
            "{}".into(),
        ));
        assert_eq!(e, ExtractError::Decode("missing field `title`".into()));
    }
}
