//! HTTP mock tests for the REST task store.
//!
//! Uses wiremock to stand in for the backend.

use reqwest::Url;
use serde_json::json;
use tasksync_client::{ClientConfig, HttpTaskStore, LogView, TaskError, TaskListController, TaskStore};
use tasksync_common::{Priority, TaskDraft};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer) -> HttpTaskStore {
    let config = ClientConfig {
        api_url: Url::parse(&format!("{}/api/tasks", server.uri())).unwrap(),
        ..ClientConfig::default()
    };
    HttpTaskStore::new(&config).unwrap()
}

#[tokio::test]
async fn test_list_skips_undecodable_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "title": "Kept", "priority": "HIGH" },
            { "id": "not-a-number", "title": "Dropped" },
            { "id": 3 }
        ])))
        .mount(&server)
        .await;

    let records = store_for(&server).list().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, Some(1));
    assert_eq!(records[0].priority.as_deref(), Some("HIGH"));
    assert_eq!(records[1].id, Some(3));
    assert_eq!(records[1].title, None);
}

#[tokio::test]
async fn test_list_server_error_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = store_for(&server).list().await.unwrap_err();

    assert!(format!("{err:#}").contains("500"));
}

#[tokio::test]
async fn test_create_posts_camel_case_draft() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .and(body_partial_json(json!({
            "title": "Write tests",
            "priority": "high",
            "dueDate": "2025-11-02",
            "completed": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 12,
            "title": "Write tests",
            "priority": "high",
            "createdAt": "2025-10-30T10:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let draft = TaskDraft {
        priority: Priority::High,
        due_date: chrono::NaiveDate::from_ymd_opt(2025, 11, 2),
        ..TaskDraft::new("Write tests")
    };
    let created = store_for(&server).create(&draft).await.unwrap();

    assert_eq!(created.id, Some(12));
}

#[tokio::test]
async fn test_update_puts_to_task_url() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/tasks/7"))
        .and(body_partial_json(json!({ "completed": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "title": "Done",
            "completed": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let draft = TaskDraft {
        completed: true,
        ..TaskDraft::new("Done")
    };
    let updated = store_for(&server).update(7, &draft).await.unwrap();

    assert_eq!(updated.completed, Some(true));
}

#[tokio::test]
async fn test_delete_needs_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let store = store_for(&server);

    assert!(store.delete(1).await.is_ok());
    assert!(store.delete(2).await.is_err());
}

#[tokio::test]
async fn test_controller_reports_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let controller = TaskListController::new(store_for(&server), LogView);
    let result = controller.load().await;

    assert!(matches!(result, Err(TaskError::FetchFailed(_))));
    assert!(controller.tasks().is_empty());
}
