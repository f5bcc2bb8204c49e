//! MCP server implementation for task-bridge.

mod params;
mod tools;

pub use params::*;

use rmcp::handler::server::ServerHandler;
use rmcp::handler::server::tool::{ToolCallContext, ToolRouter};
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, InitializeResult, ListToolsResult, ProtocolVersion,
    ServerCapabilities,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData as McpError, tool, tool_router};
use std::sync::Arc;
use task_bridge_app::ProviderRegistry;

/// MCP server exposing the registered task providers.
#[derive(Clone)]
pub struct TaskBridgeServer {
    tool_router: ToolRouter<Self>,
    registry: Arc<ProviderRegistry>,
}

#[tool_router]
impl TaskBridgeServer {
    /// Create a new MCP server instance.
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            registry,
        }
    }

    /// Registered providers with their capability flags.
    #[tool(name = "listProviders", description = "List available task providers and their capabilities")]
    async fn list_providers(&self) -> Result<CallToolResult, McpError> {
        tools::list_providers::handle_list_providers(&self.registry)
    }

    /// Task lists of the requested (or configured) account.
    #[tool(name = "listTaskLists", description = "List all task lists for a provider account")]
    async fn list_task_lists(&self, params: Parameters<ListTaskListsParams>) -> Result<CallToolResult, McpError> {
        tools::list_task_lists::handle_list_task_lists(&self.registry, params).await
    }

    /// Tasks of one list, filtered after the fetch.
    #[tool(
        name = "getTasks",
        description = "Get tasks from a task list, optionally filtered by status, priority, due range, tags, or text"
    )]
    async fn get_tasks(&self, params: Parameters<GetTasksParams>) -> Result<CallToolResult, McpError> {
        tools::get_tasks::handle_get_tasks(&self.registry, params).await
    }

    /// Create a task and return it as stored by the provider.
    #[tool(name = "createTask", description = "Create a new task in a task list")]
    async fn create_task(&self, params: Parameters<CreateTaskParams>) -> Result<CallToolResult, McpError> {
        tools::create_task::handle_create_task(&self.registry, params).await
    }

    /// Partial update; omitted fields are left untouched.
    #[tool(
        name = "updateTask",
        description = "Update an existing task's title, description, due date, or status. An empty due clears it"
    )]
    async fn update_task(&self, params: Parameters<UpdateTaskParams>) -> Result<CallToolResult, McpError> {
        tools::update_task::handle_update_task(&self.registry, params).await
    }

    /// Shorthand for an update to `completed`.
    #[tool(name = "completeTask", description = "Mark a task as completed")]
    async fn complete_task(&self, params: Parameters<TaskRefParams>) -> Result<CallToolResult, McpError> {
        tools::complete_task::handle_complete_task(&self.registry, params).await
    }

    /// Delete a task and echo its id.
    #[tool(name = "deleteTask", description = "Permanently delete a task")]
    async fn delete_task(&self, params: Parameters<TaskRefParams>) -> Result<CallToolResult, McpError> {
        tools::delete_task::handle_delete_task(&self.registry, params).await
    }

    /// Case-insensitive text search over every list.
    #[tool(name = "searchTasks", description = "Search tasks across all lists of a provider account")]
    async fn search_tasks(&self, params: Parameters<SearchTasksParams>) -> Result<CallToolResult, McpError> {
        tools::search_tasks::handle_search_tasks(&self.registry, params).await
    }

    /// Merge tasks across providers; failing providers or lists are reported, not fatal.
    #[tool(name = "syncAllTasks", description = "Fetch and merge tasks from multiple providers")]
    async fn sync_all_tasks(&self, params: Parameters<SyncAllTasksParams>) -> Result<CallToolResult, McpError> {
        tools::sync_all_tasks::handle_sync_all_tasks(&self.registry, params).await
    }
}

impl ServerHandler for TaskBridgeServer {
    fn get_info(&self) -> InitializeResult {
        let capabilities = ServerCapabilities::builder().enable_tools().build();

        InitializeResult {
            protocol_version: ProtocolVersion::LATEST,
            capabilities,
            server_info: Implementation {
                name: "task-bridge".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("Read and manage task lists. Omit accessToken to use the configured account.".into()),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool_context = ToolCallContext::new(self, request, context);
        self.tool_router.call(tool_context).await
    }
}
