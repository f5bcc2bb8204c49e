//! CLI subcommands that call providers with the configured account.

use anyhow::{Result, bail};
use serde_json::{Value, json};
use task_bridge_app::ProviderRegistry;
use task_bridge_core::{ProviderKind, Selection, TaskFilters};

use crate::Command;

/// Execute a one-shot command and print its JSON output.
pub async fn run(command: Command, registry: &ProviderRegistry) -> Result<()> {
    let output = render(command, registry).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn render(command: Command, registry: &ProviderRegistry) -> Result<Value> {
    match command {
        Command::Serve => bail!("serve is handled by the MCP entry point"),
        Command::Providers => Ok(json!({ "providers": registry.infos() })),
        Command::Lists { provider } => {
            let lists = registry.get(provider)?.get_task_lists(None).await?;
            Ok(json!({ "lists": lists }))
        }
        Command::Tasks {
            provider,
            list,
            status,
            search,
            limit,
        } => {
            let filters = TaskFilters {
                status: (!status.is_empty()).then(|| Selection::from(status)),
                search,
                limit,
                ..TaskFilters::default()
            };
            let tasks = registry.get(provider)?.get_tasks(None, &list, Some(&filters)).await?;
            Ok(json!({ "total": tasks.len(), "tasks": tasks }))
        }
        Command::Search { provider, query, limit } => {
            let filters = TaskFilters {
                limit,
                ..TaskFilters::default()
            };
            let tasks = registry
                .get(provider)?
                .search_tasks(None, &query, Some(&filters))
                .await?;
            Ok(json!({ "total": tasks.len(), "tasks": tasks }))
        }
        Command::Check => check(registry).await,
    }
}

async fn check(registry: &ProviderRegistry) -> Result<Value> {
    let mut report = serde_json::Map::new();
    let mut failed: Vec<ProviderKind> = Vec::new();
    for provider in registry.all() {
        let valid = provider.validate_auth(None).await;
        if !valid {
            failed.push(provider.kind());
        }
        report.insert(provider.kind().to_string(), Value::Bool(valid));
    }
    if !failed.is_empty() {
        let names: Vec<String> = failed.iter().map(ToString::to_string).collect();
        bail!("credential check failed for {}", names.join(", "));
    }
    Ok(Value::Object(report))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use crate::test_support::{MemoryProvider, seeded_registry};
    use task_bridge_core::TaskStatus;

    #[tokio::test]
    async fn tasks_command_applies_status_and_limit() -> Result<()> {
        let provider = MemoryProvider::default();
        provider.insert("inbox", "first").await;
        provider.insert("inbox", "second").await;
        provider.insert("inbox", "third").await;
        let registry = seeded_registry(provider);

        let output = render(
            Command::Tasks {
                provider: ProviderKind::Google,
                list: "inbox".into(),
                status: vec![TaskStatus::Pending],
                search: None,
                limit: Some(2),
            },
            &registry,
        )
        .await?;
        assert_eq!(output["total"], 2);
        assert_eq!(output["tasks"][0]["title"], "first");
        Ok(())
    }

    #[tokio::test]
    async fn search_command_matches_across_lists() -> Result<()> {
        let provider = MemoryProvider::default();
        provider.insert("inbox", "Renew passport").await;
        provider.insert("errands", "passport photos").await;
        let registry = seeded_registry(provider);

        let output = render(
            Command::Search {
                provider: ProviderKind::Google,
                query: "PASSPORT".into(),
                limit: None,
            },
            &registry,
        )
        .await?;
        assert_eq!(output["total"], 2);
        Ok(())
    }

    #[tokio::test]
    async fn check_reports_each_provider() -> Result<()> {
        let registry = seeded_registry(MemoryProvider::default());
        let output = render(Command::Check, &registry).await?;
        assert_eq!(output, json!({ "google": true }));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_provider_is_an_error() {
        let registry = seeded_registry(MemoryProvider::default());
        let err = render(Command::Lists { provider: ProviderKind::Cozi }, &registry)
            .await
            .expect_err("cozi is not registered");
        assert_eq!(err.to_string(), "Provider not found: cozi");
    }
}
