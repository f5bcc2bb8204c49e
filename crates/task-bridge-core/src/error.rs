//! Error types shared by provider adapters and their callers.

use crate::model::ProviderKind;
use thiserror::Error;

/// Result alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors surfaced by the provider layer.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No adapter is registered for the requested provider.
    #[error("Provider not found: {0}")]
    NotFound(ProviderKind),

    /// The adapter was constructed without required client credentials.
    #[error("{0}")]
    AuthNotConfigured(String),

    /// Neither per-call credentials nor a configured account are available.
    #[error("No credentials supplied for {0} and no account is configured")]
    MissingCredentials(ProviderKind),

    /// A backend call failed. `context` names the operation.
    #[error("{context}: {message}")]
    Request {
        /// Operation-specific prefix.
        context: String,
        /// Message from the transport or the backend.
        message: String,
    },
}

impl ProviderError {
    /// Wrap a lower-level failure with an operation prefix.
    pub fn request(context: impl Into<String>, source: impl std::fmt::Display) -> Self {
        Self::Request {
            context: context.into(),
            message: source.to_string(),
        }
    }
}
