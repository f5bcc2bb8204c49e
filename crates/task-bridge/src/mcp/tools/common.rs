//! Shared helpers for MCP tool implementations.

use rmcp::ErrorData as McpError;
use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use task_bridge_core::{ProviderAuth, ProviderError, ProviderKind};
use thiserror::Error;
use tracing::warn;

use crate::mcp::params::ParamsError;

/// Failure of a tool call, reported to the client as an `isError` result.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Params(#[from] ParamsError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Resolve the `provider` parameter, defaulting to Google.
pub fn provider_kind(raw: Option<&str>) -> Result<ProviderKind, ParamsError> {
    raw.map_or(Ok(ProviderKind::Google), |value| {
        value
            .parse()
            .map_err(|_| ParamsError::UnknownProvider(value.to_owned()))
    })
}

/// Per-call credentials, or `None` to use the configured account.
pub fn call_auth(
    provider: ProviderKind,
    access_token: Option<String>,
    refresh_token: Option<String>,
) -> Option<ProviderAuth> {
    if access_token.is_none() && refresh_token.is_none() {
        return None;
    }
    Some(ProviderAuth::new(provider, access_token.unwrap_or_default(), refresh_token))
}

/// Serialize `payload` as a pretty-printed text result.
pub fn json_result<T: Serialize>(payload: &T) -> Result<CallToolResult, McpError> {
    let json_str =
        serde_json::to_string_pretty(payload).map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json_str)]))
}

/// Tool failures are results the model can read, not protocol errors.
#[must_use]
pub fn tool_failure(err: &ToolError) -> CallToolResult {
    warn!(error = %err, "tool call failed");
    let body = serde_json::json!({ "error": err.to_string() });
    CallToolResult::error(vec![Content::text(body.to_string())])
}

/// Shape a tool outcome into a result.
pub fn respond<T, P, F>(outcome: Result<T, ToolError>, shape: F) -> Result<CallToolResult, McpError>
where
    P: Serialize,
    F: FnOnce(T) -> P,
{
    match outcome {
        Ok(value) => json_result(&shape(value)),
        Err(err) => Ok(tool_failure(&err)),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;

    #[test]
    fn provider_defaults_to_google() {
        assert_eq!(provider_kind(None).expect("default"), ProviderKind::Google);
        assert_eq!(
            provider_kind(Some("microsoft-todo")).expect("known id"),
            ProviderKind::MicrosoftTodo
        );
    }

    #[test]
    fn unknown_provider_keeps_the_raw_id() {
        let err = provider_kind(Some("trello")).expect_err("trello is not a provider");
        assert_eq!(err.to_string(), "Provider not found: trello");
    }

    #[test]
    fn no_tokens_means_configured_account() {
        assert!(call_auth(ProviderKind::Google, None, None).is_none());

        let auth = call_auth(ProviderKind::Google, None, Some("1//refresh".into()))
            .expect("refresh token alone should build credentials");
        assert!(auth.access_token.is_empty());
        assert_eq!(auth.refresh_token.as_deref(), Some("1//refresh"));
    }

    #[test]
    fn failures_are_flagged_results() {
        let result = tool_failure(&ProviderError::NotFound(ProviderKind::Cozi).into());
        let value = serde_json::to_value(&result).expect("serialize");
        assert_eq!(value["isError"], true);
        assert_eq!(value["content"][0]["text"], r#"{"error":"Provider not found: cozi"}"#);

        let result = tool_failure(
            &ParamsError::InvalidTimestamp {
                field: "due",
                value: "soon".into(),
            }
            .into(),
        );
        let value = serde_json::to_value(&result).expect("serialize");
        assert_eq!(value["isError"], true);
        assert_eq!(value["content"][0]["text"], r#"{"error":"invalid due timestamp: soon"}"#);
    }
}
