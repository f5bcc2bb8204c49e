//! MCP tool implementations.

pub mod common;
pub mod complete_task;
pub mod create_task;
pub mod delete_task;
pub mod get_tasks;
pub mod list_providers;
pub mod list_task_lists;
pub mod search_tasks;
pub mod sync_all_tasks;
pub mod update_task;
