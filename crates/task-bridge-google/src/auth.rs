//! OAuth token handling for the Google adapter.
//!
//! Only the refresh-token exchange is implemented here; issuing the first
//! refresh token (the interactive consent flow) happens outside this crate.

use reqwest::Client;
use serde::Deserialize;
use task_bridge_core::ProviderAuth;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{ApiError, error_message};

/// Tokens are refreshed this long before Google says they expire.
const EXPIRY_MARGIN: Duration = Duration::seconds(60);
/// Assumed lifetime when the token endpoint omits `expires_in`.
const DEFAULT_LIFETIME: Duration = Duration::seconds(3600);

/// OAuth client registration used for refresh-token exchanges.
#[derive(Clone)]
pub struct OAuthClient {
    client_id: String,
    client_secret: String,
    token_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Access token together with the instant it stops being usable.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub secret: String,
    pub expires_at: OffsetDateTime,
}

impl AccessToken {
    fn is_fresh(&self, now: OffsetDateTime) -> bool {
        now + EXPIRY_MARGIN < self.expires_at
    }
}

impl OAuthClient {
    pub fn new(client_id: String, client_secret: String, token_url: String) -> Self {
        Self {
            client_id,
            client_secret,
            token_url,
        }
    }

    /// Exchange a refresh token for a new access token.
    pub async fn refresh(&self, http: &Client, refresh_token: &str) -> Result<AccessToken, ApiError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        let response = http.post(&self.token_url).form(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::TokenRefresh(format!("{status}: {}", error_message(&body))));
        }

        let token: TokenResponse = response.json().await?;
        let lifetime = token.expires_in.map_or(DEFAULT_LIFETIME, Duration::seconds);
        debug!(expires_in = lifetime.whole_seconds(), "refreshed Google access token");
        Ok(AccessToken {
            secret: token.access_token,
            expires_at: OffsetDateTime::now_utc() + lifetime,
        })
    }
}

/// Account configured at startup: a refresh token plus the cached access token.
pub struct StaticAccount {
    refresh_token: String,
    cached: Mutex<Option<AccessToken>>,
}

impl StaticAccount {
    pub fn new(refresh_token: String) -> Self {
        Self {
            refresh_token,
            cached: Mutex::new(None),
        }
    }

    /// Current access token, refreshing it when missing or about to expire.
    pub async fn access_token(&self, http: &Client, oauth: &OAuthClient) -> Result<String, ApiError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh(OffsetDateTime::now_utc())) {
            return Ok(token.secret.clone());
        }
        let token = oauth.refresh(http, &self.refresh_token).await?;
        let secret = token.secret.clone();
        *cached = Some(token);
        Ok(secret)
    }
}

/// Pick the bearer token for a call.
///
/// Per-call credentials win: a non-empty access token is used as is, an
/// empty one is minted from the accompanying refresh token. Without per-call
/// credentials the configured account is used.
pub async fn resolve_bearer(
    http: &Client,
    oauth: &OAuthClient,
    account: Option<&StaticAccount>,
    auth: Option<&ProviderAuth>,
) -> Result<String, ApiError> {
    match auth {
        Some(auth) if !auth.access_token.is_empty() => Ok(auth.access_token.clone()),
        Some(auth) => match auth.refresh_token.as_deref().filter(|token| !token.is_empty()) {
            Some(refresh_token) => Ok(oauth.refresh(http, refresh_token).await?.secret),
            None => Err(ApiError::MissingCredentials),
        },
        None => match account {
            Some(account) => account.access_token(http, oauth).await,
            None => Err(ApiError::MissingCredentials),
        },
    }
}
