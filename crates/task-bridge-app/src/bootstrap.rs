use std::sync::Arc;

use anyhow::{Context, Result};
use task_bridge_google::GoogleTasksProvider;
use tracing::info;

use crate::config::AppConfig;
use crate::registry::ProviderRegistry;

/// Build the registry from configuration.
///
/// Missing Google client credentials are fatal unless the adapter is
/// disabled in the config file.
pub fn build_registry(config: &AppConfig) -> Result<ProviderRegistry> {
    let mut registry = ProviderRegistry::new();

    if config.google.enabled {
        let google = GoogleTasksProvider::new(&config.google).context("failed to initialize Google Tasks provider")?;
        info!(static_account = google.has_account(), "registered Google Tasks provider");
        registry.register(Arc::new(google));
    } else {
        info!("Google Tasks provider disabled by configuration");
    }

    Ok(registry)
}
