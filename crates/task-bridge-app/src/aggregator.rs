//! Multi-provider fetch that merges every reachable list into one result.

use std::collections::BTreeMap;

use futures::future::join_all;
use serde::Serialize;
use task_bridge_core::{ProviderAuth, ProviderKind, ProviderResult, Task, TaskFilters, TaskList, TaskProvider};
use tracing::{debug, warn};

use crate::registry::ProviderRegistry;

/// One provider account to pull tasks from.
#[derive(Debug, Clone)]
pub struct SyncTarget {
    pub provider: ProviderKind,
    /// Per-call credentials; `None` uses the adapter's configured account.
    pub auth: Option<ProviderAuth>,
    /// Lists to include. Empty means every list.
    pub list_ids: Vec<String>,
}

impl SyncTarget {
    pub const fn all_lists(provider: ProviderKind, auth: Option<ProviderAuth>) -> Self {
        Self {
            provider,
            auth,
            list_ids: Vec::new(),
        }
    }
}

/// A provider or list that contributed nothing because it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncFailure {
    /// Provider id as requested, which may not name a known provider.
    pub provider: String,
    /// `None` when the provider itself could not be reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
    pub message: String,
}

impl SyncFailure {
    /// A requested provider id that names no provider at all.
    #[must_use]
    pub fn unknown_provider(raw: &str) -> Self {
        warn!(provider = raw, "skipping unknown provider during sync");
        Self {
            provider: raw.to_owned(),
            list_id: None,
            message: format!("Provider not found: {raw}"),
        }
    }
}

/// Merged outcome of [`sync_all`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Tasks in target order, then list order, truncated by the global limit.
    pub tasks: Vec<Task>,
    /// Tasks fetched per provider, counted before the global limit.
    pub by_provider: BTreeMap<ProviderKind, usize>,
    pub failures: Vec<SyncFailure>,
}

#[derive(Default)]
struct TargetOutcome {
    tasks: Vec<Task>,
    failures: Vec<SyncFailure>,
}

/// Fetch tasks for every target concurrently and merge them.
///
/// Failures never abort the sync: an unknown provider, a failed list
/// enumeration, or a failed list fetch is logged, recorded in
/// [`SyncReport::failures`], and contributes zero tasks.
pub async fn sync_all(
    registry: &ProviderRegistry,
    targets: &[SyncTarget],
    filters: Option<&TaskFilters>,
) -> SyncReport {
    let outcomes = join_all(targets.iter().map(|target| sync_target(registry, target, filters))).await;

    let mut report = SyncReport::default();
    for (target, outcome) in targets.iter().zip(outcomes) {
        *report.by_provider.entry(target.provider).or_default() += outcome.tasks.len();
        report.tasks.extend(outcome.tasks);
        report.failures.extend(outcome.failures);
    }

    if let Some(limit) = filters.and_then(TaskFilters::effective_limit) {
        report.tasks.truncate(limit);
    }
    debug!(
        tasks = report.tasks.len(),
        failures = report.failures.len(),
        "sync finished"
    );
    report
}

async fn sync_target(registry: &ProviderRegistry, target: &SyncTarget, filters: Option<&TaskFilters>) -> TargetOutcome {
    let provider = match registry.get(target.provider) {
        Ok(provider) => provider,
        Err(err) => return TargetOutcome::provider_failed(target.provider, &err),
    };
    let auth = target.auth.as_ref();

    let lists = match provider.get_task_lists(auth).await {
        Ok(lists) => lists,
        Err(err) => return TargetOutcome::provider_failed(target.provider, &err),
    };
    let selected: Vec<TaskList> = if target.list_ids.is_empty() {
        lists
    } else {
        lists
            .into_iter()
            .filter(|list| target.list_ids.contains(&list.id))
            .collect()
    };

    let results = join_all(selected.iter().map(|list| fetch_list(provider.as_ref(), auth, list, filters))).await;

    let mut outcome = TargetOutcome::default();
    for (list, result) in selected.iter().zip(results) {
        match result {
            Ok(tasks) => outcome.tasks.extend(tasks),
            Err(err) => {
                warn!(provider = %target.provider, list = %list.name, error = %err, "skipping list during sync");
                outcome.failures.push(SyncFailure {
                    provider: target.provider.to_string(),
                    list_id: Some(list.id.clone()),
                    message: err.to_string(),
                });
            }
        }
    }
    outcome
}

async fn fetch_list(
    provider: &dyn TaskProvider,
    auth: Option<&ProviderAuth>,
    list: &TaskList,
    filters: Option<&TaskFilters>,
) -> ProviderResult<Vec<Task>> {
    provider.get_tasks(auth, &list.id, filters).await
}

impl TargetOutcome {
    fn provider_failed(provider: ProviderKind, err: &impl std::fmt::Display) -> Self {
        warn!(%provider, error = %err, "skipping provider during sync");
        Self {
            tasks: Vec::new(),
            failures: vec![SyncFailure {
                provider: provider.to_string(),
                list_id: None,
                message: err.to_string(),
            }],
        }
    }
}
