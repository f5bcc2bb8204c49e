//! Update task tool implementation.

use rmcp::ErrorData as McpError;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use serde_json::json;
use task_bridge_app::ProviderRegistry;
use task_bridge_core::{ProviderAuth, ProviderKind, Task, TaskPatch, TaskStatus};

use super::common::{ToolError, call_auth, provider_kind, respond};
use crate::mcp::params::{ParamsError, TaskUpdatesParams, UpdateTaskParams, parse_timestamp};

impl TaskUpdatesParams {
    pub(crate) fn into_patch(self) -> Result<TaskPatch, ParamsError> {
        let Self {
            title,
            description,
            due,
            status,
        } = self;

        let due = match due.as_deref().map(str::trim) {
            None => None,
            Some("") => Some(None),
            Some(raw) => Some(Some(parse_timestamp("due", raw)?)),
        };

        Ok(TaskPatch {
            title,
            description,
            due,
            status: status.as_deref().map(str::parse::<TaskStatus>).transpose()?,
        })
    }
}

/// Apply a partial update to a task.
pub async fn handle_update_task(
    registry: &ProviderRegistry,
    Parameters(params): Parameters<UpdateTaskParams>,
) -> Result<CallToolResult, McpError> {
    respond(apply(registry, params).await, |task| json!({ "task": task }))
}

async fn apply(registry: &ProviderRegistry, params: UpdateTaskParams) -> Result<Task, ToolError> {
    let kind = provider_kind(params.provider.as_deref())?;
    let auth = call_auth(kind, params.access_token, params.refresh_token);
    let patch = params.updates.into_patch()?;
    update(registry, kind, auth.as_ref(), &params.task_id, &params.list_id, patch).await
}

/// Shared by `updateTask` and `completeTask`.
pub(crate) async fn update(
    registry: &ProviderRegistry,
    kind: ProviderKind,
    auth: Option<&ProviderAuth>,
    task_id: &str,
    list_id: &str,
    patch: TaskPatch,
) -> Result<Task, ToolError> {
    Ok(registry.get(kind)?.update_task(auth, task_id, list_id, patch).await?)
}
