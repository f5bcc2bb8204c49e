//! Google Tasks adapter for task-bridge.
//!
//! Google Tasks has no priorities, tags, or search endpoint; those filters are
//! evaluated client-side and search falls back to the cross-list scan
//! provided by [`task_bridge_core::TaskProvider::search_tasks`].

mod auth;
pub mod error;
mod provider;
mod settings;
mod wire;

pub use error::ApiError;
pub use provider::GoogleTasksProvider;
pub use settings::{DEFAULT_API_URL, DEFAULT_TOKEN_URL, GoogleSettings};
