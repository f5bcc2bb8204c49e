//! List task lists tool implementation.

use rmcp::ErrorData as McpError;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use serde_json::json;
use task_bridge_app::ProviderRegistry;
use task_bridge_core::TaskList;

use super::common::{ToolError, call_auth, provider_kind, respond};
use crate::mcp::params::ListTaskListsParams;

/// List every task list of the account.
pub async fn handle_list_task_lists(
    registry: &ProviderRegistry,
    Parameters(params): Parameters<ListTaskListsParams>,
) -> Result<CallToolResult, McpError> {
    respond(load(registry, params).await, |lists| json!({ "lists": lists }))
}

async fn load(registry: &ProviderRegistry, params: ListTaskListsParams) -> Result<Vec<TaskList>, ToolError> {
    let kind = provider_kind(params.provider.as_deref())?;
    let auth = call_auth(kind, params.access_token, params.refresh_token);
    Ok(registry.get(kind)?.get_task_lists(auth.as_ref()).await?)
}
