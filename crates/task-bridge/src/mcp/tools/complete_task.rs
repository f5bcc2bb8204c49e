//! Complete task tool implementation.

use rmcp::ErrorData as McpError;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use serde_json::json;
use task_bridge_app::ProviderRegistry;
use task_bridge_core::{Task, TaskPatch};

use super::common::{ToolError, call_auth, provider_kind, respond};
use super::update_task::update;
use crate::mcp::params::TaskRefParams;

/// Mark a task completed in one call.
pub async fn handle_complete_task(
    registry: &ProviderRegistry,
    Parameters(params): Parameters<TaskRefParams>,
) -> Result<CallToolResult, McpError> {
    respond(complete(registry, params).await, |task| json!({ "task": task }))
}

async fn complete(registry: &ProviderRegistry, params: TaskRefParams) -> Result<Task, ToolError> {
    let kind = provider_kind(params.provider.as_deref())?;
    let auth = call_auth(kind, params.access_token, params.refresh_token);
    update(
        registry,
        kind,
        auth.as_ref(),
        &params.task_id,
        &params.list_id,
        TaskPatch::complete(),
    )
    .await
}
