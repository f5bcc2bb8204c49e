//! Sync all tasks tool implementation.

use rmcp::ErrorData as McpError;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use serde_json::{Value, json};
use task_bridge_app::{ProviderRegistry, SyncFailure, SyncTarget, sync_all};

use super::common::{ToolError, call_auth, provider_kind, respond};
use crate::mcp::params::{FiltersParams, ParamsError, SyncAllTasksParams, SyncProviderParams};

impl SyncProviderParams {
    pub(crate) fn into_target(self) -> Result<SyncTarget, ParamsError> {
        let provider = provider_kind(Some(&self.provider))?;
        Ok(SyncTarget {
            provider,
            auth: call_auth(provider, self.access_token, self.refresh_token),
            list_ids: self.list_ids,
        })
    }
}

/// Fetch tasks from several providers and merge them.
pub async fn handle_sync_all_tasks(
    registry: &ProviderRegistry,
    Parameters(params): Parameters<SyncAllTasksParams>,
) -> Result<CallToolResult, McpError> {
    respond(sync(registry, params).await, std::convert::identity)
}

async fn sync(registry: &ProviderRegistry, params: SyncAllTasksParams) -> Result<Value, ToolError> {
    let filters = params.filters.map(FiltersParams::into_filters).transpose()?;

    // An entry naming no provider fails on its own; the rest still sync.
    let mut targets = Vec::with_capacity(params.providers.len());
    let mut unresolved = Vec::new();
    for entry in params.providers {
        let raw = entry.provider.clone();
        match entry.into_target() {
            Ok(target) => targets.push(target),
            Err(_) => unresolved.push(SyncFailure::unknown_provider(&raw)),
        }
    }

    let mut report = sync_all(registry, &targets, filters.as_ref()).await;
    report.failures.extend(unresolved);
    Ok(json!({
        "total": report.tasks.len(),
        "tasks": report.tasks,
        "byProvider": report.by_provider,
        "failures": report.failures,
    }))
}
