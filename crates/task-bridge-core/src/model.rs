//! Unified task model shared by every provider adapter.
//!
//! Adapters translate backend payloads into these shapes; nothing above the
//! adapter layer ever sees a provider-native representation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::OffsetDateTime;

/// Error returned when a wire token does not name a known enum variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    /// Human-readable name of the enum being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Backend services a task can originate from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// Google Tasks.
    Google,
    /// Cozi family organizer.
    Cozi,
    /// Todoist.
    Todoist,
    /// Microsoft To Do.
    MicrosoftTodo,
    /// Apple Reminders.
    AppleReminders,
}

impl ProviderKind {
    /// Every known provider identifier, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Google,
        Self::Cozi,
        Self::Todoist,
        Self::MicrosoftTodo,
        Self::AppleReminders,
    ];

    /// Wire representation of the identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Cozi => "cozi",
            Self::Todoist => "todoist",
            Self::MicrosoftTodo => "microsoft-todo",
            Self::AppleReminders => "apple-reminders",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == token)
            .ok_or_else(|| ParseEnumError {
                kind: "provider",
                value: s.to_owned(),
            })
    }
}

/// Completion status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not yet completed.
    Pending,
    /// Marked as done.
    Completed,
    /// Cancelled (soft delete).
    Cancelled,
}

impl TaskStatus {
    /// Wire representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseEnumError {
                kind: "status",
                value: s.to_owned(),
            }),
        }
    }
}

/// Importance level, normalized across providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low importance.
    Low,
    /// Medium importance.
    Medium,
    /// High importance.
    High,
    /// Needs attention now.
    Urgent,
}

impl TaskPriority {
    /// Wire representation of the priority.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(ParseEnumError {
                kind: "priority",
                value: s.to_owned(),
            }),
        }
    }
}

/// A unit of work as seen by every consumer above the adapter layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Provider-scoped identifier, unique within provider + list.
    pub id: String,
    /// Service the task belongs to.
    pub provider: ProviderKind,
    /// Parent list identifier.
    pub list_id: String,
    /// Human-readable list name.
    pub list_name: String,
    /// Task title.
    pub title: String,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Current status.
    pub status: TaskStatus,
    /// Due instant.
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub due: Option<OffsetDateTime>,
    /// Creation instant.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Last modification instant.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// Completion instant.
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<OffsetDateTime>,
    /// Importance level, when the provider supports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    /// Labels attached to the task.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Deep link into the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_url: Option<String>,
    /// Provider-specific passthrough fields. Never interpreted here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_metadata: Option<Map<String, Value>>,
}

/// A named container of tasks owned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    /// Provider-scoped identifier.
    pub id: String,
    /// Service the list belongs to.
    pub provider: ProviderKind,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// UI color hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Number of tasks, when the provider reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_count: Option<u64>,
    /// Creation instant.
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<OffsetDateTime>,
    /// Last modification instant.
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<OffsetDateTime>,
}

/// A filter value that accepts either a single item or a set of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection<T> {
    /// Exactly one accepted value.
    One(T),
    /// Any of several accepted values.
    Many(Vec<T>),
}

impl<T: PartialEq> Selection<T> {
    /// View the selection as a slice; a single value is a one-element set.
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(value) => std::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }

    /// Membership test.
    pub fn contains(&self, value: &T) -> bool {
        self.as_slice().contains(value)
    }
}

impl<T> From<Vec<T>> for Selection<T> {
    fn from(values: Vec<T>) -> Self {
        Self::Many(values)
    }
}

/// Query applied by the filter engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilters {
    /// Accepted statuses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Selection<TaskStatus>>,
    /// Accepted priorities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Selection<TaskPriority>>,
    /// Inclusive lower bound on `due`.
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub due_after: Option<OffsetDateTime>,
    /// Inclusive upper bound on `due`.
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub due_before: Option<OffsetDateTime>,
    /// Match tasks carrying any of these tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Case-insensitive substring over title and description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Maximum number of results; `0` means unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Number of leading results to skip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl TaskFilters {
    /// True when the status filter explicitly names `status`.
    #[must_use]
    pub fn requests_status(&self, status: TaskStatus) -> bool {
        self.status
            .as_ref()
            .is_some_and(|selection| selection.contains(&status))
    }

    /// Effective result cap (`None` when unset or zero).
    #[must_use]
    pub fn effective_limit(&self) -> Option<usize> {
        self.limit.filter(|limit| *limit > 0)
    }

    /// Copy of these filters with `limit` and `offset` removed.
    #[must_use]
    pub fn without_pagination(&self) -> Self {
        Self {
            limit: None,
            offset: None,
            ..self.clone()
        }
    }
}

/// Credential bundle forwarded to an adapter.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAuth {
    /// Provider the credentials belong to.
    pub provider: ProviderKind,
    /// OAuth bearer token. May be empty when only a refresh token is known.
    pub access_token: String,
    /// OAuth refresh token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Access token expiry.
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<OffsetDateTime>,
    /// Account identifier in the provider's system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl ProviderAuth {
    /// Credentials made of a bearer token and an optional refresh token.
    #[must_use]
    pub fn new(provider: ProviderKind, access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            provider,
            access_token: access_token.into(),
            refresh_token,
            expires_at: None,
            user_id: None,
        }
    }
}

impl fmt::Debug for ProviderAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderAuth")
            .field("provider", &self.provider)
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_at", &self.expires_at)
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Payload for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    /// Title; adapters substitute a placeholder when empty.
    pub title: String,
    /// Notes.
    pub description: Option<String>,
    /// Due instant.
    pub due: Option<OffsetDateTime>,
    /// Importance level (dropped by adapters without priority support).
    pub priority: Option<TaskPriority>,
    /// Labels (dropped by adapters without tag support).
    pub tags: Vec<String>,
}

/// Partial update of a task. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// New notes.
    pub description: Option<String>,
    /// `Some(None)` clears the due date, `Some(Some(_))` sets it.
    pub due: Option<Option<OffsetDateTime>>,
    /// New status.
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Patch that only marks the task as completed.
    #[must_use]
    pub fn complete() -> Self {
        Self {
            status: Some(TaskStatus::Completed),
            ..Self::default()
        }
    }

    /// True when the patch would not change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.due.is_none() && self.status.is_none()
    }
}
