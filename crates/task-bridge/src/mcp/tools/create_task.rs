//! Create task tool implementation.

use rmcp::ErrorData as McpError;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use serde_json::json;
use task_bridge_app::ProviderRegistry;
use task_bridge_core::{NewTask, Task, TaskPriority};

use super::common::{ToolError, call_auth, provider_kind, respond};
use crate::mcp::params::{CreateTaskParams, NewTaskParams, ParamsError, parse_optional_timestamp};

impl NewTaskParams {
    pub(crate) fn into_new_task(self) -> Result<NewTask, ParamsError> {
        let Self {
            title,
            description,
            due,
            priority,
            tags,
        } = self;

        Ok(NewTask {
            title,
            description,
            due: parse_optional_timestamp("due", due)?,
            priority: priority.as_deref().map(str::parse::<TaskPriority>).transpose()?,
            tags,
        })
    }
}

/// Create a task in a list.
pub async fn handle_create_task(
    registry: &ProviderRegistry,
    Parameters(params): Parameters<CreateTaskParams>,
) -> Result<CallToolResult, McpError> {
    respond(create(registry, params).await, |task| json!({ "task": task }))
}

async fn create(registry: &ProviderRegistry, params: CreateTaskParams) -> Result<Task, ToolError> {
    let kind = provider_kind(params.provider.as_deref())?;
    let auth = call_auth(kind, params.access_token, params.refresh_token);
    let task = params.task.into_new_task()?;

    Ok(registry
        .get(kind)?
        .create_task(auth.as_ref(), &params.list_id, task)
        .await?)
}
