//! Delete task tool implementation.

use rmcp::ErrorData as McpError;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use serde_json::json;
use task_bridge_app::ProviderRegistry;

use super::common::{ToolError, call_auth, provider_kind, respond};
use crate::mcp::params::TaskRefParams;

/// Permanently delete a task.
pub async fn handle_delete_task(
    registry: &ProviderRegistry,
    Parameters(params): Parameters<TaskRefParams>,
) -> Result<CallToolResult, McpError> {
    respond(delete(registry, params).await, |task_id| {
        json!({ "success": true, "deletedId": task_id })
    })
}

/// Resolves to the deleted id.
async fn delete(registry: &ProviderRegistry, params: TaskRefParams) -> Result<String, ToolError> {
    let kind = provider_kind(params.provider.as_deref())?;
    let auth = call_auth(kind, params.access_token, params.refresh_token);
    registry
        .get(kind)?
        .delete_task(auth.as_ref(), &params.task_id, &params.list_id)
        .await?;
    Ok(params.task_id)
}
