//! Adapter contract implemented once per backend service.

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ProviderResult;
use crate::filter::apply_filters;
use crate::model::{NewTask, ProviderAuth, ProviderKind, Task, TaskFilters, TaskList, TaskPatch};
use crate::text_matcher::TextMatcher;

/// Optional features a backend supports natively.
///
/// Declared, not enforced: adapters drop unsupported fields on write and the
/// filter engine still evaluates filters on fields a provider never fills.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCapabilities {
    /// Task priorities.
    pub priorities: bool,
    /// Tags or labels.
    pub tags: bool,
    /// Free-form descriptions.
    pub descriptions: bool,
    /// Due dates.
    pub due_dates: bool,
    /// Nested tasks.
    pub subtasks: bool,
    /// Server-side text search.
    pub search: bool,
}

/// Summary of a registered provider, as listed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider identifier.
    pub id: ProviderKind,
    /// Display name.
    pub name: String,
    /// Native feature set.
    pub capabilities: ProviderCapabilities,
}

/// Translates between the unified task model and one backend's API.
///
/// Every operation takes optional per-call credentials. `None` asks the
/// adapter to fall back to the account it was configured with, if any.
#[async_trait]
pub trait TaskProvider: Send + Sync {
    /// Identifier used for registry lookups.
    fn kind(&self) -> ProviderKind;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Static feature flags.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Listing entry for this provider.
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            id: self.kind(),
            name: self.name().to_owned(),
            capabilities: self.capabilities(),
        }
    }

    /// All lists owned by the authenticated account.
    async fn get_task_lists(&self, auth: Option<&ProviderAuth>) -> ProviderResult<Vec<TaskList>>;

    /// Tasks in one list, refined by `filters`.
    async fn get_tasks(
        &self,
        auth: Option<&ProviderAuth>,
        list_id: &str,
        filters: Option<&TaskFilters>,
    ) -> ProviderResult<Vec<Task>>;

    /// Create a task in `list_id`.
    async fn create_task(&self, auth: Option<&ProviderAuth>, list_id: &str, task: NewTask) -> ProviderResult<Task>;

    /// Apply a partial update to a task.
    async fn update_task(
        &self,
        auth: Option<&ProviderAuth>,
        task_id: &str,
        list_id: &str,
        patch: TaskPatch,
    ) -> ProviderResult<Task>;

    /// Permanently delete a task.
    async fn delete_task(&self, auth: Option<&ProviderAuth>, task_id: &str, list_id: &str) -> ProviderResult<()>;

    /// Search every list for `query`.
    ///
    /// The default implementation compensates for backends without a search
    /// endpoint; see [`search_all_lists`].
    async fn search_tasks(
        &self,
        auth: Option<&ProviderAuth>,
        query: &str,
        filters: Option<&TaskFilters>,
    ) -> ProviderResult<Vec<Task>> {
        search_all_lists(self, auth, query, filters).await
    }

    /// Probe the credentials. Any failure reads as `false`.
    async fn validate_auth(&self, auth: Option<&ProviderAuth>) -> bool;
}

impl std::fmt::Debug for dyn TaskProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskProvider").field("kind", &self.kind()).finish()
    }
}

/// Client-side search across all lists of `provider`.
///
/// Lists are fetched concurrently. A list that fails to load is logged and
/// contributes nothing; only failing to enumerate the lists is an error.
/// Pagination from `filters` is applied once, over the merged matches.
///
/// # Errors
/// Returns the provider error when the list enumeration itself fails.
pub async fn search_all_lists<P>(
    provider: &P,
    auth: Option<&ProviderAuth>,
    query: &str,
    filters: Option<&TaskFilters>,
) -> ProviderResult<Vec<Task>>
where
    P: TaskProvider + ?Sized,
{
    let lists = provider.get_task_lists(auth).await?;
    let per_list = filters.map(TaskFilters::without_pagination);

    let results = join_all(
        lists
            .iter()
            .map(|list| provider.get_tasks(auth, &list.id, per_list.as_ref())),
    )
    .await;

    let mut merged = Vec::new();
    for (list, result) in lists.iter().zip(results) {
        match result {
            Ok(tasks) => merged.extend(tasks),
            Err(err) => warn!(
                provider = %provider.kind(),
                list_id = %list.id,
                error = %err,
                "skipping list during search"
            ),
        }
    }

    let matched: Vec<Task> = match TextMatcher::new(query) {
        Some(matcher) => merged.into_iter().filter(|task| matcher.matches(task)).collect(),
        None => merged,
    };
    debug!(provider = %provider.kind(), lists = lists.len(), matched = matched.len(), "search finished");

    Ok(match filters {
        Some(filters) => apply_filters(&matched, filters),
        None => matched,
    })
}
