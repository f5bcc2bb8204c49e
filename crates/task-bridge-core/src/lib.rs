//! Unified task model, filter engine, and provider contract for task-bridge.

/// Provider error types.
pub mod error;
/// Client-side filter engine.
pub mod filter;
/// Task, list, filter, and credential shapes.
pub mod model;
/// Adapter trait and capability flags.
pub mod provider;
/// Case-insensitive text search.
pub mod text_matcher;

pub use error::{ProviderError, ProviderResult};
pub use filter::apply_filters;
pub use model::{
    NewTask, ParseEnumError, ProviderAuth, ProviderKind, Selection, Task, TaskFilters, TaskList,
    TaskPatch, TaskPriority, TaskStatus,
};
pub use provider::{ProviderCapabilities, ProviderInfo, TaskProvider, search_all_lists};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::error::{ProviderError, ProviderResult};
    use crate::filter::apply_filters;
    use crate::model::{
        NewTask, ProviderAuth, ProviderKind, Task, TaskFilters, TaskList, TaskPatch, TaskStatus,
    };
    use crate::provider::{ProviderCapabilities, TaskProvider};
    use async_trait::async_trait;
    use time::OffsetDateTime;

    pub fn task(id: &str, title: &str) -> Task {
        Task {
            id: id.to_owned(),
            provider: ProviderKind::Google,
            list_id: "list".into(),
            list_name: "List".into(),
            title: title.to_owned(),
            description: None,
            status: TaskStatus::Pending,
            due: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
            completed_at: None,
            priority: None,
            tags: Vec::new(),
            provider_url: None,
            provider_metadata: None,
        }
    }

    /// In-memory provider; lists without tasks fail when fetched.
    #[derive(Default)]
    pub struct FakeProvider {
        pub lists: Vec<(TaskList, Option<Vec<Task>>)>,
        pub fail_lists: bool,
    }

    impl FakeProvider {
        pub fn add_list(&mut self, id: &str, tasks: Vec<Task>) {
            self.lists.push((Self::list(id), Some(tasks)));
        }

        pub fn add_failing_list(&mut self, id: &str) {
            self.lists.push((Self::list(id), None));
        }

        fn list(id: &str) -> TaskList {
            TaskList {
                id: id.to_owned(),
                provider: ProviderKind::Google,
                name: id.to_uppercase(),
                description: None,
                color: None,
                task_count: None,
                created_at: None,
                updated_at: None,
            }
        }
    }

    #[async_trait]
    impl TaskProvider for FakeProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Google
        }

        fn name(&self) -> &str {
            "Fake"
        }

        fn capabilities(&self) -> ProviderCapabilities {
            ProviderCapabilities {
                descriptions: true,
                due_dates: true,
                ..ProviderCapabilities::default()
            }
        }

        async fn get_task_lists(&self, _auth: Option<&ProviderAuth>) -> ProviderResult<Vec<TaskList>> {
            if self.fail_lists {
                return Err(ProviderError::request("Failed to fetch lists", "boom"));
            }
            Ok(self.lists.iter().map(|(list, _)| list.clone()).collect())
        }

        async fn get_tasks(
            &self,
            _auth: Option<&ProviderAuth>,
            list_id: &str,
            filters: Option<&TaskFilters>,
        ) -> ProviderResult<Vec<Task>> {
            let tasks = self
                .lists
                .iter()
                .find(|(list, _)| list.id == list_id)
                .and_then(|(_, tasks)| tasks.clone())
                .ok_or_else(|| ProviderError::request(format!("Failed to fetch tasks from list {list_id}"), "boom"))?;
            Ok(match filters {
                Some(filters) => apply_filters(&tasks, filters),
                None => tasks,
            })
        }

        async fn create_task(&self, _auth: Option<&ProviderAuth>, _list_id: &str, _task: NewTask) -> ProviderResult<Task> {
            Err(ProviderError::request("Failed to create task", "read-only"))
        }

        async fn update_task(
            &self,
            _auth: Option<&ProviderAuth>,
            _task_id: &str,
            _list_id: &str,
            _patch: TaskPatch,
        ) -> ProviderResult<Task> {
            Err(ProviderError::request("Failed to update task", "read-only"))
        }

        async fn delete_task(&self, _auth: Option<&ProviderAuth>, _task_id: &str, _list_id: &str) -> ProviderResult<()> {
            Err(ProviderError::request("Failed to delete task", "read-only"))
        }

        async fn validate_auth(&self, _auth: Option<&ProviderAuth>) -> bool {
            !self.fail_lists
        }
    }
}
