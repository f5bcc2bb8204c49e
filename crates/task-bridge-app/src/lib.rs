//! Application layer for task-bridge.
//!
//! Owns the provider registry, the multi-provider aggregator, and
//! configuration loading shared by the MCP server and the CLI.

pub mod aggregator;
pub mod bootstrap;
pub mod config;
pub mod registry;

pub use aggregator::{SyncFailure, SyncReport, SyncTarget, sync_all};
pub use bootstrap::build_registry;
pub use config::AppConfig;
pub use registry::ProviderRegistry;
