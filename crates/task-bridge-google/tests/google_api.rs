//! HTTP-level tests for the Google Tasks adapter against a mock API.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use serde_json::{Value, json};
use task_bridge_core::{
    NewTask, ProviderAuth, ProviderError, ProviderKind, Selection, TaskFilters, TaskPatch, TaskProvider,
    TaskStatus,
};
use task_bridge_google::{GoogleSettings, GoogleTasksProvider};
use time::macros::datetime;
use wiremock::matchers::{body_json, body_partial_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTS: &str = "/tasks/v1/users/@me/lists";

fn provider(server: &MockServer) -> GoogleTasksProvider {
    GoogleTasksProvider::new(&GoogleSettings {
        client_id: Some("client".into()),
        client_secret: Some("secret".into()),
        refresh_token: Some("1//refresh".into()),
        api_url: Some(format!("{}/tasks/v1", server.uri())),
        token_url: Some(format!("{}/token", server.uri())),
        ..GoogleSettings::default()
    })
    .expect("provider")
}

fn auth() -> ProviderAuth {
    ProviderAuth::new(ProviderKind::Google, "token-123", None)
}

fn google_task(id: &str, title: &str) -> Value {
    json!({
        "kind": "tasks#task",
        "id": id,
        "title": title,
        "status": "needsAction",
        "updated": "2025-10-01T08:00:00.000Z",
        "position": "00000000000000000000"
    })
}

async fn mount_list(server: &MockServer, id: &str, title: &str) {
    Mock::given(method("GET"))
        .and(path(format!("{LISTS}/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": id, "title": title})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn lists_are_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTS))
        .and(header("authorization", "Bearer token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "l1", "title": "Groceries", "updated": "2025-10-01T08:00:00.000Z"},
                {"id": "l2"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let lists = provider(&server).get_task_lists(Some(&auth())).await.expect("lists");

    assert_eq!(lists.len(), 2);
    assert_eq!(lists[0].name, "Groceries");
    assert_eq!(lists[0].updated_at, Some(datetime!(2025-10-01 08:00 UTC)));
    assert_eq!(lists[1].name, "Untitled List");
    assert!(lists.iter().all(|list| list.provider == ProviderKind::Google));
}

#[tokio::test]
async fn empty_list_response_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"kind": "tasks#taskLists"})))
        .mount(&server)
        .await;

    let lists = provider(&server).get_task_lists(Some(&auth())).await.expect("lists");
    assert!(lists.is_empty());
}

#[tokio::test]
async fn get_tasks_pushes_down_bounds_and_caps_page_size() {
    let server = MockServer::start().await;
    mount_list(&server, "l1", "Groceries").await;
    Mock::given(method("GET"))
        .and(path("/tasks/v1/lists/l1/tasks"))
        .and(query_param("showCompleted", "false"))
        .and(query_param("showDeleted", "false"))
        .and(query_param("showHidden", "false"))
        .and(query_param("dueMin", "2025-10-01T00:00:00Z"))
        .and(query_param("dueMax", "2025-10-31T00:00:00Z"))
        .and(query_param("maxResults", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "a", "title": "Buy Milk", "status": "needsAction",
                 "updated": "2025-10-01T08:00:00Z", "due": "2025-10-05T00:00:00.000Z"},
                {"id": "b", "title": "Buy bread", "status": "needsAction",
                 "updated": "2025-10-01T08:00:00Z", "due": "2025-10-06T00:00:00.000Z"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filters = TaskFilters {
        due_after: Some(datetime!(2025-10-01 00:00 UTC)),
        due_before: Some(datetime!(2025-10-31 00:00 UTC)),
        search: Some("milk".into()),
        limit: Some(250),
        ..TaskFilters::default()
    };
    let tasks = provider(&server)
        .get_tasks(Some(&auth()), "l1", Some(&filters))
        .await
        .expect("tasks");

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, "a");
    assert_eq!(tasks[0].list_name, "Groceries");
}

#[tokio::test]
async fn unfiltered_fetches_request_full_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [{"id": "l1", "title": "Home"}]})))
        .mount(&server)
        .await;
    mount_list(&server, "l1", "Home").await;
    Mock::given(method("GET"))
        .and(path("/tasks/v1/lists/l1/tasks"))
        .and(query_param("maxResults", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [google_task("a", "Buy milk"), google_task("b", "Mow lawn")]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let adapter = provider(&server);
    let tasks = adapter.get_tasks(Some(&auth()), "l1", None).await.expect("tasks");
    assert_eq!(tasks.len(), 2);

    let limited = TaskFilters {
        limit: Some(1),
        ..TaskFilters::default()
    };
    let found = adapter
        .search_tasks(Some(&auth()), "milk", Some(&limited))
        .await
        .expect("search");
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn small_limit_caps_page_size() {
    let server = MockServer::start().await;
    mount_list(&server, "l1", "Home").await;
    Mock::given(method("GET"))
        .and(path("/tasks/v1/lists/l1/tasks"))
        .and(query_param("maxResults", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [google_task("a", "One")]})))
        .expect(1)
        .mount(&server)
        .await;

    let filters = TaskFilters {
        limit: Some(5),
        ..TaskFilters::default()
    };
    let tasks = provider(&server)
        .get_tasks(Some(&auth()), "l1", Some(&filters))
        .await
        .expect("tasks");
    assert_eq!(tasks.len(), 1);
}

#[tokio::test]
async fn completed_tasks_are_requested_only_when_filtered_for() {
    let server = MockServer::start().await;
    mount_list(&server, "l1", "Groceries").await;
    Mock::given(method("GET"))
        .and(path("/tasks/v1/lists/l1/tasks"))
        .and(query_param("showCompleted", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "done", "title": "Done", "status": "completed",
                 "updated": "2025-10-01T08:00:00Z", "completed": "2025-10-01T07:00:00Z"},
                google_task("open", "Open")
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filters = TaskFilters {
        status: Some(Selection::One(TaskStatus::Completed)),
        ..TaskFilters::default()
    };
    let tasks = provider(&server)
        .get_tasks(Some(&auth()), "l1", Some(&filters))
        .await
        .expect("tasks");

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::Completed);
    assert!(tasks[0].completed_at.is_some());
}

#[tokio::test]
async fn created_task_round_trips_through_get() {
    let server = MockServer::start().await;
    mount_list(&server, "l1", "Inbox").await;
    let stored = json!({
        "id": "new1", "title": "T", "status": "needsAction",
        "updated": "2025-10-01T08:00:00Z", "due": "2025-10-10T00:00:00.000Z"
    });
    Mock::given(method("POST"))
        .and(path("/tasks/v1/lists/l1/tasks"))
        .and(body_json(json!({"title": "T", "due": "2025-10-10T00:00:00Z"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/v1/lists/l1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [stored]})))
        .mount(&server)
        .await;

    let adapter = provider(&server);
    let due = datetime!(2025-10-10 00:00 UTC);
    let created = adapter
        .create_task(
            Some(&auth()),
            "l1",
            NewTask {
                title: "T".into(),
                due: Some(due),
                tags: vec!["ignored".into()],
                ..NewTask::default()
            },
        )
        .await
        .expect("create");
    assert_eq!(created.list_name, "Inbox");

    let fetched = adapter.get_tasks(Some(&auth()), "l1", None).await.expect("get");
    let task = fetched.iter().find(|task| task.id == created.id).expect("created task listed");
    assert_eq!(task.title, "T");
    assert_eq!(task.due, Some(due));
    assert_eq!(task.status, TaskStatus::Pending);
}

#[tokio::test]
async fn clearing_due_sends_null() {
    let server = MockServer::start().await;
    mount_list(&server, "l1", "Inbox").await;
    Mock::given(method("PATCH"))
        .and(path("/tasks/v1/lists/l1/tasks/t1"))
        .and(body_json(json!({"due": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(google_task("t1", "Undated")))
        .expect(1)
        .mount(&server)
        .await;

    let patch = TaskPatch {
        due: Some(None),
        ..TaskPatch::default()
    };
    let task = provider(&server)
        .update_task(Some(&auth()), "t1", "l1", patch)
        .await
        .expect("update");
    assert!(task.due.is_none());
}

#[tokio::test]
async fn completing_stamps_completion_time() {
    let server = MockServer::start().await;
    mount_list(&server, "l1", "Inbox").await;
    Mock::given(method("PATCH"))
        .and(path("/tasks/v1/lists/l1/tasks/t1"))
        .and(body_partial_json(json!({"status": "completed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "t1", "title": "Pay rent", "status": "completed", "updated": "2025-10-01T08:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let task = provider(&server)
        .update_task(Some(&auth()), "t1", "l1", TaskPatch::complete())
        .await
        .expect("complete");
    assert_eq!(task.status, TaskStatus::Completed);
    assert!(task.completed_at.is_some());
}

#[tokio::test]
async fn cancelled_only_update_reads_the_task_without_patching() {
    let server = MockServer::start().await;
    mount_list(&server, "l1", "Inbox").await;
    Mock::given(method("PATCH"))
        .and(path("/tasks/v1/lists/l1/tasks/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(google_task("t1", "Patched")))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/v1/lists/l1/tasks/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(google_task("t1", "Water plants")))
        .expect(1)
        .mount(&server)
        .await;

    let patch = TaskPatch {
        status: Some(TaskStatus::Cancelled),
        ..TaskPatch::default()
    };
    let task = provider(&server)
        .update_task(Some(&auth()), "t1", "l1", patch)
        .await
        .expect("update");
    assert_eq!(task.title, "Water plants");
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.list_name, "Inbox");
}

#[tokio::test]
async fn cancelled_status_is_dropped_from_mixed_patches() {
    let server = MockServer::start().await;
    mount_list(&server, "l1", "Inbox").await;
    Mock::given(method("PATCH"))
        .and(path("/tasks/v1/lists/l1/tasks/t1"))
        .and(body_json(json!({"title": "Renamed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(google_task("t1", "Renamed")))
        .expect(1)
        .mount(&server)
        .await;

    let patch = TaskPatch {
        title: Some("Renamed".into()),
        status: Some(TaskStatus::Cancelled),
        ..TaskPatch::default()
    };
    let task = provider(&server)
        .update_task(Some(&auth()), "t1", "l1", patch)
        .await
        .expect("update");
    assert_eq!(task.title, "Renamed");
}

#[tokio::test]
async fn delete_of_missing_task_reports_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/v1/lists/l1/tasks/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "message": "Task not found.", "status": "NOT_FOUND"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = provider(&server)
        .delete_task(Some(&auth()), "gone", "l1")
        .await
        .expect_err("delete should fail");
    let message = err.to_string();
    assert!(message.starts_with("Failed to delete task: "), "{message}");
    assert!(message.contains("Task not found."), "{message}");
}

#[tokio::test]
async fn delete_succeeds_on_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/v1/lists/l1/tasks/t1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    provider(&server)
        .delete_task(Some(&auth()), "t1", "l1")
        .await
        .expect("delete");
}

#[tokio::test]
async fn validate_auth_reduces_failures_to_false() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTS))
        .and(query_param("maxResults", "1"))
        .and(header("authorization", "Bearer good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(LISTS))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let adapter = provider(&server);
    let good = ProviderAuth::new(ProviderKind::Google, "good", None);
    let bad = ProviderAuth::new(ProviderKind::Google, "bad", None);
    assert!(adapter.validate_auth(Some(&good)).await);
    assert!(!adapter.validate_auth(Some(&bad)).await);
}

#[tokio::test]
async fn static_account_exchanges_refresh_token_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=1%2F%2Frefresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-token", "expires_in": 3599, "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(LISTS))
        .and(header("authorization", "Bearer fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [{"id": "l1", "title": "Inbox"}]})))
        .expect(2)
        .mount(&server)
        .await;

    let adapter = provider(&server);
    assert_eq!(adapter.get_task_lists(None).await.expect("first").len(), 1);
    assert_eq!(adapter.get_task_lists(None).await.expect("second").len(), 1);
}

#[tokio::test]
async fn refresh_failure_is_wrapped_with_operation_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant", "error_description": "Token has been expired or revoked."
        })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .get_task_lists(None)
        .await
        .expect_err("refresh should fail");
    let message = err.to_string();
    assert!(message.starts_with("Failed to fetch Google task lists: "), "{message}");
    assert!(message.contains("invalid_grant"), "{message}");
}

#[tokio::test]
async fn missing_credentials_without_account() {
    let server = MockServer::start().await;
    let adapter = GoogleTasksProvider::new(&GoogleSettings {
        client_id: Some("client".into()),
        client_secret: Some("secret".into()),
        api_url: Some(format!("{}/tasks/v1", server.uri())),
        ..GoogleSettings::default()
    })
    .expect("provider");

    let err = adapter.get_task_lists(None).await.expect_err("no credentials");
    assert!(matches!(err, ProviderError::MissingCredentials(ProviderKind::Google)));
}

#[tokio::test]
async fn search_skips_lists_that_fail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "l1", "title": "Home"}, {"id": "l2", "title": "Work"}]
        })))
        .mount(&server)
        .await;
    mount_list(&server, "l1", "Home").await;
    mount_list(&server, "l2", "Work").await;
    Mock::given(method("GET"))
        .and(path("/tasks/v1/lists/l1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [google_task("a", "Buy MILK"), google_task("b", "Mow lawn")]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/v1/lists/l2/tasks"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let found = provider(&server)
        .search_tasks(Some(&auth()), "milk", None)
        .await
        .expect("search");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "a");
    assert_eq!(found[0].list_name, "Home");
}
