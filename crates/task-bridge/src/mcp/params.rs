//! Parameter definitions for MCP tools.
//!
//! Field names are camelCase on the wire so existing MCP clients keep working.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use task_bridge_core::{ParseEnumError, Selection, TaskFilters, TaskPriority, TaskStatus};
use thiserror::Error;
use time::{Date, OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339, macros::format_description};

/// Error raised while converting tool parameters into domain values.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("invalid {field} timestamp: {value}")]
    InvalidTimestamp { field: &'static str, value: String },
    #[error(transparent)]
    InvalidEnum(#[from] ParseEnumError),
    #[error("Provider not found: {0}")]
    UnknownProvider(String),
}

/// A single value or a list of values.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Filters accepted by `getTasks`, `searchTasks`, and `syncAllTasks`.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FiltersParams {
    /// Status or statuses to keep: pending, completed, cancelled.
    #[serde(default)]
    pub status: Option<OneOrMany>,
    /// Priority or priorities to keep: low, medium, high, urgent.
    #[serde(default)]
    pub priority: Option<OneOrMany>,
    /// Keep tasks due at or after this RFC 3339 instant.
    #[serde(default)]
    pub due_after: Option<String>,
    /// Keep tasks due at or before this RFC 3339 instant.
    #[serde(default)]
    pub due_before: Option<String>,
    /// Keep tasks sharing at least one of these tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Case-insensitive text matched against title and description.
    #[serde(default)]
    pub search: Option<String>,
    /// Maximum number of tasks to return.
    #[serde(default)]
    pub limit: Option<usize>,
    /// Number of matching tasks to skip.
    #[serde(default)]
    pub offset: Option<usize>,
}

impl FiltersParams {
    pub(crate) fn into_filters(self) -> Result<TaskFilters, ParamsError> {
        let Self {
            status,
            priority,
            due_after,
            due_before,
            tags,
            search,
            limit,
            offset,
        } = self;

        Ok(TaskFilters {
            status: status.map(parse_selection::<TaskStatus>).transpose()?,
            priority: priority.map(parse_selection::<TaskPriority>).transpose()?,
            due_after: parse_optional_timestamp("dueAfter", due_after)?,
            due_before: parse_optional_timestamp("dueBefore", due_before)?,
            tags,
            search,
            limit,
            offset,
        })
    }
}

fn parse_selection<T>(raw: OneOrMany) -> Result<Selection<T>, ParamsError>
where
    T: std::str::FromStr<Err = ParseEnumError>,
{
    Ok(match raw {
        OneOrMany::One(value) => Selection::One(value.parse()?),
        OneOrMany::Many(values) => Selection::Many(
            values
                .iter()
                .map(|value| value.parse())
                .collect::<Result<Vec<T>, _>>()?,
        ),
    })
}

/// Parse an RFC 3339 instant, or a bare `YYYY-MM-DD` date taken as midnight UTC.
pub(crate) fn parse_timestamp(field: &'static str, raw: &str) -> Result<OffsetDateTime, ParamsError> {
    let trimmed = raw.trim();
    OffsetDateTime::parse(trimmed, &Rfc3339)
        .or_else(|_| {
            Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
                .map(|date| date.midnight().assume_utc())
        })
        .map(|instant| instant.to_offset(UtcOffset::UTC))
        .map_err(|_| ParamsError::InvalidTimestamp {
            field,
            value: raw.to_owned(),
        })
}

pub(crate) fn parse_optional_timestamp(
    field: &'static str,
    raw: Option<String>,
) -> Result<Option<OffsetDateTime>, ParamsError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_timestamp(field, value).map(Some),
    }
}

/// Parameters for `listTaskLists`.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListTaskListsParams {
    /// Provider id. Defaults to `google`.
    #[serde(default)]
    pub provider: Option<String>,
    /// OAuth access token. Omit to use the configured account.
    #[serde(default)]
    pub access_token: Option<String>,
    /// OAuth refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Parameters for `getTasks`.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetTasksParams {
    /// Provider id. Defaults to `google`.
    #[serde(default)]
    pub provider: Option<String>,
    /// OAuth access token. Omit to use the configured account.
    #[serde(default)]
    pub access_token: Option<String>,
    /// OAuth refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// List to read.
    pub list_id: String,
    /// Optional filters.
    #[serde(default)]
    pub filters: Option<FiltersParams>,
}

/// Task fields accepted by `createTask`.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskParams {
    /// Task title.
    pub title: String,
    /// Free-form notes.
    #[serde(default)]
    pub description: Option<String>,
    /// Due date as an RFC 3339 instant or `YYYY-MM-DD`.
    #[serde(default)]
    pub due: Option<String>,
    /// Priority (ignored by providers without priorities).
    #[serde(default)]
    pub priority: Option<String>,
    /// Tags (ignored by providers without tags).
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Parameters for `createTask`.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskParams {
    /// Provider id. Defaults to `google`.
    #[serde(default)]
    pub provider: Option<String>,
    /// OAuth access token. Omit to use the configured account.
    #[serde(default)]
    pub access_token: Option<String>,
    /// OAuth refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// List that receives the task.
    pub list_id: String,
    /// Task to create.
    pub task: NewTaskParams,
}

/// Fields accepted by `updateTask`. Omitted fields are left unchanged.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdatesParams {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New due date. An empty string clears it.
    #[serde(default)]
    pub due: Option<String>,
    /// New status: pending, completed, cancelled.
    #[serde(default)]
    pub status: Option<String>,
}

/// Parameters for `updateTask`.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskParams {
    /// Provider id. Defaults to `google`.
    #[serde(default)]
    pub provider: Option<String>,
    /// OAuth access token. Omit to use the configured account.
    #[serde(default)]
    pub access_token: Option<String>,
    /// OAuth refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Task to update.
    pub task_id: String,
    /// List containing the task.
    pub list_id: String,
    /// Fields to change.
    pub updates: TaskUpdatesParams,
}

/// Parameters for `completeTask` and `deleteTask`.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskRefParams {
    /// Provider id. Defaults to `google`.
    #[serde(default)]
    pub provider: Option<String>,
    /// OAuth access token. Omit to use the configured account.
    #[serde(default)]
    pub access_token: Option<String>,
    /// OAuth refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Task id.
    pub task_id: String,
    /// List containing the task.
    pub list_id: String,
}

/// Parameters for `searchTasks`.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchTasksParams {
    /// Provider id. Defaults to `google`.
    #[serde(default)]
    pub provider: Option<String>,
    /// OAuth access token. Omit to use the configured account.
    #[serde(default)]
    pub access_token: Option<String>,
    /// OAuth refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Text matched case-insensitively against title and description.
    pub query: String,
    /// Additional filters applied to the matches.
    #[serde(default)]
    pub filters: Option<FiltersParams>,
}

/// One provider account for `syncAllTasks`.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncProviderParams {
    /// Provider id.
    pub provider: String,
    /// OAuth access token. Omit to use the configured account.
    #[serde(default)]
    pub access_token: Option<String>,
    /// OAuth refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lists to include. Empty syncs every list.
    #[serde(default)]
    pub list_ids: Vec<String>,
}

/// Parameters for `syncAllTasks`.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncAllTasksParams {
    /// Provider accounts to fetch from.
    pub providers: Vec<SyncProviderParams>,
    /// Filters applied per list; `limit` also caps the merged result.
    #[serde(default)]
    pub filters: Option<FiltersParams>,
}
