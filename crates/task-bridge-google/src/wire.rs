//! Google Tasks REST payloads and their translation to the unified model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use task_bridge_core::{NewTask, ProviderKind, Task, TaskList, TaskPatch, TaskStatus};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

use crate::error::ApiError;

const UNTITLED_TASK: &str = "Untitled Task";
const UNTITLED_LIST: &str = "Untitled List";
const NEW_TASK_TITLE: &str = "New Task";
const STATUS_COMPLETED: &str = "completed";
const STATUS_NEEDS_ACTION: &str = "needsAction";

/// Collection envelope used by every list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// `tasks#taskList` resource.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleTaskList {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

/// `tasks#task` resource.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleTask {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub etag: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub self_link: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default)]
    pub completed: Option<String>,
    #[serde(default)]
    pub deleted: Option<bool>,
    #[serde(default)]
    pub hidden: Option<bool>,
}

/// Request body for `tasks.insert` and `tasks.patch`.
///
/// Outer `None` omits a field; `Some(None)` sends an explicit `null`, which
/// clears the field on the backend.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct TaskBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<Option<String>>,
}

impl TaskBody {
    /// Body for a new task. Priority and tags have no Google equivalent.
    pub fn for_insert(task: &NewTask) -> Result<Self, ApiError> {
        let title = if task.title.is_empty() {
            NEW_TASK_TITLE.to_owned()
        } else {
            task.title.clone()
        };
        Ok(Self {
            title: Some(title),
            notes: task.description.clone().filter(|notes| !notes.is_empty()),
            due: task.due.map(format_instant).transpose()?.map(Some),
            ..Self::default()
        })
    }

    /// Body for a partial update; `completed_stamp` is used when the patch completes the task.
    pub fn for_patch(patch: &TaskPatch, completed_stamp: OffsetDateTime) -> Result<Self, ApiError> {
        let mut body = Self {
            title: patch.title.clone(),
            notes: patch.description.clone(),
            due: match patch.due {
                None => None,
                Some(None) => Some(None),
                Some(Some(due)) => Some(Some(format_instant(due)?)),
            },
            ..Self::default()
        };
        match patch.status {
            Some(TaskStatus::Completed) => {
                body.status = Some(STATUS_COMPLETED);
                body.completed = Some(Some(format_instant(completed_stamp)?));
            }
            Some(TaskStatus::Pending) => {
                body.status = Some(STATUS_NEEDS_ACTION);
                body.completed = Some(None);
            }
            Some(TaskStatus::Cancelled) | None => {}
        }
        Ok(body)
    }
}

/// Render an instant the way the API expects it.
pub fn format_instant(instant: OffsetDateTime) -> Result<String, ApiError> {
    Ok(instant.format(&Rfc3339)?)
}

fn parse_instant(field: &'static str, raw: Option<&str>) -> Option<OffsetDateTime> {
    let raw = raw?;
    match OffsetDateTime::parse(raw, &Rfc3339) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            debug!(field, raw, error = %err, "ignoring unparsable timestamp");
            None
        }
    }
}

impl GoogleTask {
    /// Normalize into the unified model.
    pub fn into_task(self, list_id: &str, list_name: &str) -> Task {
        let updated = parse_instant("updated", self.updated.as_deref()).unwrap_or_else(OffsetDateTime::now_utc);
        let status = if self.status.as_deref() == Some(STATUS_COMPLETED) {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        };

        let mut metadata = Map::new();
        if let Some(position) = &self.position {
            metadata.insert("position".into(), Value::from(position.as_str()));
        }
        if let Some(etag) = &self.etag {
            metadata.insert("etag".into(), Value::from(etag.as_str()));
        }
        if let Some(parent) = &self.parent {
            metadata.insert("parent".into(), Value::from(parent.as_str()));
        }
        if let Some(hidden) = self.hidden {
            metadata.insert("hidden".into(), Value::from(hidden));
        }
        if let Some(deleted) = self.deleted {
            metadata.insert("deleted".into(), Value::from(deleted));
        }

        Task {
            id: self.id.unwrap_or_default(),
            provider: ProviderKind::Google,
            list_id: list_id.to_owned(),
            list_name: list_name.to_owned(),
            title: self
                .title
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| UNTITLED_TASK.to_owned()),
            description: self.notes.filter(|notes| !notes.is_empty()),
            status,
            due: parse_instant("due", self.due.as_deref()),
            created_at: updated,
            updated_at: updated,
            completed_at: parse_instant("completed", self.completed.as_deref()),
            priority: None,
            tags: Vec::new(),
            provider_url: self.self_link.filter(|link| !link.is_empty()),
            provider_metadata: (!metadata.is_empty()).then_some(metadata),
        }
    }
}

impl GoogleTaskList {
    /// Normalize into the unified model.
    pub fn into_task_list(self) -> TaskList {
        TaskList {
            id: self.id.unwrap_or_default(),
            provider: ProviderKind::Google,
            name: self
                .title
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| UNTITLED_LIST.to_owned()),
            description: None,
            color: None,
            task_count: None,
            created_at: None,
            updated_at: parse_instant("updated", self.updated.as_deref()),
        }
    }
}
