//! Search tasks tool implementation.

use rmcp::ErrorData as McpError;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use serde_json::json;
use task_bridge_app::ProviderRegistry;
use task_bridge_core::Task;

use super::common::{ToolError, call_auth, provider_kind, respond};
use crate::mcp::params::{FiltersParams, SearchTasksParams};

/// Search every list of the account.
pub async fn handle_search_tasks(
    registry: &ProviderRegistry,
    Parameters(params): Parameters<SearchTasksParams>,
) -> Result<CallToolResult, McpError> {
    respond(search(registry, params).await, |tasks| {
        json!({ "total": tasks.len(), "tasks": tasks })
    })
}

async fn search(registry: &ProviderRegistry, params: SearchTasksParams) -> Result<Vec<Task>, ToolError> {
    let kind = provider_kind(params.provider.as_deref())?;
    let auth = call_auth(kind, params.access_token, params.refresh_token);
    let filters = params.filters.map(FiltersParams::into_filters).transpose()?;

    Ok(registry
        .get(kind)?
        .search_tasks(auth.as_ref(), &params.query, filters.as_ref())
        .await?)
}
