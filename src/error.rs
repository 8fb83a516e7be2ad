//! Error types for upstream fetches, API responses and configuration loading.
//!
//! Only [`ApiError`] ever reaches a client; the others are logged and folded
//! into a soft outcome (an early pagination stop, an unhealthy report) or
//! abort startup.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Failure to retrieve a page body from the upstream site.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Errors surfaced to API clients as JSON `{"error": ...}` bodies.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Invalid region")]
    InvalidRegion,

    #[error("Failed to fetch server status data")]
    UpstreamUnavailable,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRegion => StatusCode::BAD_REQUEST,
            ApiError::UpstreamUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Problems reading or validating the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("setting `{field}` is not a valid url: {source}")]
    InvalidUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("setting `{0}` must be greater than zero")]
    Zero(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(ApiError::InvalidRegion.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::UpstreamUnavailable.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_api_error_messages() {
        assert_eq!(ApiError::InvalidRegion.to_string(), "Invalid region");
        assert_eq!(
            ApiError::UpstreamUnavailable.to_string(),
            "Failed to fetch server status data"
        );
    }

    #[test]
    fn test_fetch_error_status_display() {
        let e = FetchError::Status {
            url: "https://example.com/x".to_string(),
            status: 503,
        };
        assert_eq!(e.to_string(), "https://example.com/x answered with HTTP 503");
    }
}
