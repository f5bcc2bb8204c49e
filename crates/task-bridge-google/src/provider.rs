//! Google Tasks implementation of [`TaskProvider`].

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use task_bridge_core::{
    NewTask, ProviderAuth, ProviderCapabilities, ProviderError, ProviderKind, ProviderResult, Task,
    TaskFilters, TaskList, TaskPatch, TaskProvider, TaskStatus, apply_filters,
};
use time::OffsetDateTime;
use tracing::{debug, instrument};

use crate::auth::{OAuthClient, StaticAccount, resolve_bearer};
use crate::error::{ApiError, error_message};
use crate::settings::{DEFAULT_API_URL, DEFAULT_TOKEN_URL, GoogleSettings};
use crate::wire::{GoogleTask, GoogleTaskList, ListEnvelope, TaskBody, format_instant};

/// Largest page the API returns.
const MAX_PAGE_SIZE: usize = 100;
const UNKNOWN_LIST: &str = "Unknown List";

/// Adapter for the Google Tasks REST API.
pub struct GoogleTasksProvider {
    http: Client,
    api_base: Url,
    oauth: OAuthClient,
    account: Option<StaticAccount>,
}

impl GoogleTasksProvider {
    /// Build the adapter from configuration.
    ///
    /// # Errors
    /// Returns [`ProviderError::AuthNotConfigured`] when the OAuth client
    /// id or secret is missing, and a request error for an unusable base URL.
    pub fn new(settings: &GoogleSettings) -> ProviderResult<Self> {
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());
        let (Some(client_id), Some(client_secret)) =
            (non_empty(&settings.client_id), non_empty(&settings.client_secret))
        else {
            return Err(ProviderError::AuthNotConfigured(
                "Google OAuth credentials not configured. Set GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET environment variables."
                    .into(),
            ));
        };

        let raw_base = settings.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
        let api_base =
            Url::parse(raw_base).map_err(|err| ProviderError::request("Invalid Google Tasks API URL", err))?;
        if api_base.cannot_be_a_base() {
            return Err(ProviderError::request("Invalid Google Tasks API URL", raw_base));
        }

        let http = Client::builder()
            .user_agent(concat!("task-bridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ProviderError::request("Failed to build HTTP client", err))?;

        let token_url = settings
            .token_url
            .clone()
            .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_owned());

        Ok(Self {
            http,
            api_base,
            oauth: OAuthClient::new(client_id, client_secret, token_url),
            account: non_empty(&settings.refresh_token).map(StaticAccount::new),
        })
    }

    /// Whether calls without credentials can fall back to a configured account.
    #[must_use]
    pub const fn has_account(&self) -> bool {
        self.account.is_some()
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::BaseUrl(self.api_base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn bearer(&self, auth: Option<&ProviderAuth>) -> Result<String, ApiError> {
        resolve_bearer(&self.http, &self.oauth, self.account.as_ref(), auth).await
    }

    async fn checked(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let mut message = error_message(&body);
        if message.is_empty() {
            message = status.canonical_reason().unwrap_or("request failed").to_owned();
        }
        Err(ApiError::Status { status, message })
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::checked(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn fetch_lists(&self, bearer: &str, max_results: Option<usize>) -> Result<Vec<TaskList>, ApiError> {
        let url = self.endpoint(&["users", "@me", "lists"])?;
        let mut request = self.http.get(url).bearer_auth(bearer);
        if let Some(max) = max_results {
            request = request.query(&[("maxResults", max.to_string())]);
        }
        let envelope: ListEnvelope<GoogleTaskList> = Self::send(request).await?;
        Ok(envelope
            .items
            .into_iter()
            .map(GoogleTaskList::into_task_list)
            .collect())
    }

    async fn load_lists(
        &self,
        auth: Option<&ProviderAuth>,
        max_results: Option<usize>,
    ) -> Result<Vec<TaskList>, ApiError> {
        let bearer = self.bearer(auth).await?;
        self.fetch_lists(&bearer, max_results).await
    }

    async fn list_name(&self, bearer: &str, list_id: &str) -> Result<String, ApiError> {
        let url = self.endpoint(&["users", "@me", "lists", list_id])?;
        let list: GoogleTaskList = Self::send(self.http.get(url).bearer_auth(bearer)).await?;
        Ok(list
            .title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| UNKNOWN_LIST.to_owned()))
    }

    async fn fetch_tasks(
        &self,
        auth: Option<&ProviderAuth>,
        list_id: &str,
        filters: Option<&TaskFilters>,
    ) -> Result<Vec<Task>, ApiError> {
        let bearer = self.bearer(auth).await?;
        let list_name = self.list_name(&bearer, list_id).await?;

        let show_completed = filters.is_some_and(|filters| filters.requests_status(TaskStatus::Completed));
        let mut query = vec![
            ("showCompleted", show_completed.to_string()),
            ("showDeleted", "false".to_owned()),
            ("showHidden", "false".to_owned()),
        ];
        if let Some(filters) = filters {
            if let Some(before) = filters.due_before {
                query.push(("dueMax", format_instant(before)?));
            }
            if let Some(after) = filters.due_after {
                query.push(("dueMin", format_instant(after)?));
            }
        }
        // The API pages at 20 when maxResults is absent.
        let page_size = filters
            .and_then(TaskFilters::effective_limit)
            .map_or(MAX_PAGE_SIZE, |limit| limit.min(MAX_PAGE_SIZE));
        query.push(("maxResults", page_size.to_string()));

        let url = self.endpoint(&["lists", list_id, "tasks"])?;
        let envelope: ListEnvelope<GoogleTask> =
            Self::send(self.http.get(url).bearer_auth(&bearer).query(&query)).await?;
        debug!(fetched = envelope.items.len(), "fetched Google tasks");

        let tasks: Vec<Task> = envelope
            .items
            .into_iter()
            .map(|task| task.into_task(list_id, &list_name))
            .collect();
        Ok(match filters {
            Some(filters) => apply_filters(&tasks, filters),
            None => tasks,
        })
    }

    async fn insert_task(&self, auth: Option<&ProviderAuth>, list_id: &str, task: &NewTask) -> Result<Task, ApiError> {
        let bearer = self.bearer(auth).await?;
        let body = TaskBody::for_insert(task)?;
        let url = self.endpoint(&["lists", list_id, "tasks"])?;
        let created: GoogleTask = Self::send(self.http.post(url).bearer_auth(&bearer).json(&body)).await?;
        let list_name = self.list_name(&bearer, list_id).await?;
        Ok(created.into_task(list_id, &list_name))
    }

    async fn patch_task(
        &self,
        auth: Option<&ProviderAuth>,
        task_id: &str,
        list_id: &str,
        patch: &TaskPatch,
    ) -> Result<Task, ApiError> {
        let bearer = self.bearer(auth).await?;
        let url = self.endpoint(&["lists", list_id, "tasks", task_id])?;
        if patch.is_empty() {
            let current: GoogleTask = Self::send(self.http.get(url).bearer_auth(&bearer)).await?;
            let list_name = self.list_name(&bearer, list_id).await?;
            return Ok(current.into_task(list_id, &list_name));
        }

        let stamp = OffsetDateTime::now_utc();
        let body = TaskBody::for_patch(patch, stamp)?;
        let updated: GoogleTask = Self::send(self.http.patch(url).bearer_auth(&bearer).json(&body)).await?;
        let list_name = self.list_name(&bearer, list_id).await?;

        let mut task = updated.into_task(list_id, &list_name);
        if patch.status == Some(TaskStatus::Completed)
            && task.status == TaskStatus::Completed
            && task.completed_at.is_none()
        {
            task.completed_at = Some(stamp);
        }
        Ok(task)
    }

    async fn remove_task(&self, auth: Option<&ProviderAuth>, task_id: &str, list_id: &str) -> Result<(), ApiError> {
        let bearer = self.bearer(auth).await?;
        let url = self.endpoint(&["lists", list_id, "tasks", task_id])?;
        Self::checked(self.http.delete(url).bearer_auth(&bearer).send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl TaskProvider for GoogleTasksProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn name(&self) -> &str {
        "Google Tasks"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            priorities: false,
            tags: false,
            descriptions: true,
            due_dates: true,
            subtasks: false,
            search: false,
        }
    }

    #[instrument(skip_all)]
    async fn get_task_lists(&self, auth: Option<&ProviderAuth>) -> ProviderResult<Vec<TaskList>> {
        self.load_lists(auth, None)
            .await
            .map_err(|err| err.into_provider("Failed to fetch Google task lists"))
    }

    #[instrument(skip_all, fields(list_id = %list_id))]
    async fn get_tasks(
        &self,
        auth: Option<&ProviderAuth>,
        list_id: &str,
        filters: Option<&TaskFilters>,
    ) -> ProviderResult<Vec<Task>> {
        self.fetch_tasks(auth, list_id, filters)
            .await
            .map_err(|err| err.into_provider(format!("Failed to fetch tasks from list {list_id}")))
    }

    #[instrument(skip_all, fields(list_id = %list_id))]
    async fn create_task(&self, auth: Option<&ProviderAuth>, list_id: &str, task: NewTask) -> ProviderResult<Task> {
        self.insert_task(auth, list_id, &task)
            .await
            .map_err(|err| err.into_provider("Failed to create task"))
    }

    #[instrument(skip_all, fields(task_id = %task_id, list_id = %list_id))]
    async fn update_task(
        &self,
        auth: Option<&ProviderAuth>,
        task_id: &str,
        list_id: &str,
        patch: TaskPatch,
    ) -> ProviderResult<Task> {
        // Google has no cancelled state.
        let patch = TaskPatch {
            status: patch.status.filter(|status| *status != TaskStatus::Cancelled),
            ..patch
        };
        self.patch_task(auth, task_id, list_id, &patch)
            .await
            .map_err(|err| err.into_provider("Failed to update task"))
    }

    #[instrument(skip_all, fields(task_id = %task_id, list_id = %list_id))]
    async fn delete_task(&self, auth: Option<&ProviderAuth>, task_id: &str, list_id: &str) -> ProviderResult<()> {
        self.remove_task(auth, task_id, list_id)
            .await
            .map_err(|err| err.into_provider("Failed to delete task"))
    }

    #[instrument(skip_all)]
    async fn validate_auth(&self, auth: Option<&ProviderAuth>) -> bool {
        let outcome = self.load_lists(auth, Some(1)).await;
        if let Err(err) = &outcome {
            debug!(error = %err, "credential check failed");
        }
        outcome.is_ok()
    }
}
