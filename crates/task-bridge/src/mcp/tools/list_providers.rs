//! List providers tool implementation.

use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use serde_json::json;
use task_bridge_app::ProviderRegistry;

use super::common::json_result;

/// List registered providers and their capabilities.
pub fn handle_list_providers(registry: &ProviderRegistry) -> Result<CallToolResult, McpError> {
    json_result(&json!({ "providers": registry.infos() }))
}
