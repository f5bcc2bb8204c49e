//! Error types for Google Tasks API calls.

use reqwest::StatusCode;
use task_bridge_core::{ProviderError, ProviderKind};
use thiserror::Error;

/// Failures below the provider boundary.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure (DNS, TLS, connection, body read).
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Message extracted from the error body.
        message: String,
    },

    /// The token endpoint refused to issue an access token.
    #[error("token refresh failed: {0}")]
    TokenRefresh(String),

    /// No credentials were supplied and no account is configured.
    #[error("no credentials available")]
    MissingCredentials,

    /// A timestamp could not be rendered as RFC 3339.
    #[error("invalid timestamp: {0}")]
    Timestamp(#[from] time::error::Format),

    /// The configured base URL cannot carry path segments.
    #[error("invalid API base URL: {0}")]
    BaseUrl(String),
}

impl ApiError {
    /// Convert into a provider error carrying the operation prefix.
    pub(crate) fn into_provider(self, context: impl Into<String>) -> ProviderError {
        match self {
            Self::MissingCredentials => ProviderError::MissingCredentials(ProviderKind::Google),
            other => ProviderError::request(context, other),
        }
    }
}

/// Extract a readable message from a Google error body.
///
/// The REST API nests it under `error.message`; the OAuth token endpoint
/// uses `error` plus `error_description`.
pub(crate) fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_owned();
    };
    let error = &value["error"];
    if let Some(message) = error["message"].as_str() {
        return message.to_owned();
    }
    match (error.as_str(), value["error_description"].as_str()) {
        (Some(code), Some(description)) => format!("{code}: {description}"),
        (Some(code), None) => code.to_owned(),
        _ => body.trim().to_owned(),
    }
}
