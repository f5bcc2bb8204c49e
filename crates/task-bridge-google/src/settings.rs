use serde::Deserialize;
use std::fmt;

/// Default REST endpoint of the Google Tasks API.
pub const DEFAULT_API_URL: &str = "https://tasks.googleapis.com/tasks/v1";
/// Default OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// `[google]` configuration block.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    /// Register the adapter at startup.
    pub enabled: bool,
    /// OAuth client id.
    pub client_id: Option<String>,
    /// OAuth client secret.
    pub client_secret: Option<String>,
    /// Refresh token of the account used when callers pass no credentials.
    pub refresh_token: Option<String>,
    /// Override for the REST endpoint.
    pub api_url: Option<String>,
    /// Override for the token endpoint.
    pub token_url: Option<String>,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            client_id: None,
            client_secret: None,
            refresh_token: None,
            api_url: None,
            token_url: None,
        }
    }
}

impl fmt::Debug for GoogleSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("GoogleSettings")
            .field("enabled", &self.enabled)
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("api_url", &self.api_url)
            .field("token_url", &self.token_url)
            .finish()
    }
}
