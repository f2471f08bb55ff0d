//! Tests for the REST mirror against a local mock server.

use chrono::{TimeZone, Utc};

use crate::mission::{
    AccessibilityImpact, BlackoutWindow, MissionTask, TaskPriority, TaskStatus,
};
use crate::sync::{RemoteMirror, RestMirror, SyncError};

fn sample_task() -> MissionTask {
    MissionTask {
        id: "t-1".to_string(),
        job_name: "Crack seal, east lot".to_string(),
        job_id: None,
        site: "East lot".to_string(),
        start: Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap(),
        crew_required: 2,
        crew_assigned_ids: vec!["c-1".to_string()],
        status: TaskStatus::Scheduled,
        priority: TaskPriority::Standard,
        accessibility_impact: AccessibilityImpact::None,
        notes: String::new(),
        color: None,
    }
}

#[tokio::test]
async fn upsert_task_puts_json_with_auth() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/orgs/acme/tasks/t-1")
        .match_header("authorization", "Bearer secret")
        .match_header("content-type", "application/json")
        .with_status(200)
        .create_async()
        .await;

    let mirror = RestMirror::new(&server.url(), Some("secret"), "acme").unwrap();
    mirror.upsert_task(&sample_task()).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn delete_of_absent_record_is_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/orgs/acme/crew/ghost")
        .with_status(404)
        .create_async()
        .await;

    let mirror = RestMirror::new(&server.url(), None, "acme").unwrap();
    mirror.delete_crew("ghost").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn server_error_is_surfaced() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("PUT", "/orgs/acme/blackouts/b-1")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let mirror = RestMirror::new(&server.url(), None, "acme").unwrap();
    let window = BlackoutWindow {
        id: "b-1".to_string(),
        title: "Worship service".to_string(),
        start: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        reason: None,
    };

    match mirror.upsert_blackout(&window).await {
        Err(SyncError::RemoteApi { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected RemoteApi error, got {:?}", other),
    }
}

#[tokio::test]
async fn fetch_snapshot_parses_collections() {
    let mut server = mockito::Server::new_async().await;
    let body = serde_json::json!({
        "tasks": [sample_task()],
        "crew": [],
        "blackouts": [],
    });
    let _mock = server
        .mock("GET", "/orgs/acme/snapshot")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let mirror = RestMirror::new(&server.url(), None, "acme").unwrap();
    let snapshot = mirror.fetch_snapshot().await.unwrap().unwrap();
    assert_eq!(snapshot.tasks.len(), 1);
    assert_eq!(snapshot.tasks[0].id, "t-1");
    assert!(snapshot.crew.is_empty());
    assert!(snapshot.capacity_per_shift.is_none());
}

#[tokio::test]
async fn fetch_snapshot_maps_missing_scope_to_none() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/orgs/acme/snapshot")
        .with_status(404)
        .create_async()
        .await;

    let mirror = RestMirror::new(&server.url(), None, "acme").unwrap();
    assert!(mirror.fetch_snapshot().await.unwrap().is_none());
}

#[test]
fn base_url_paths_are_preserved() {
    let mirror = RestMirror::new("http://localhost:9000/api/v1", None, "acme").unwrap();
    // Construction succeeds and endpoints nest under the base path; the
    // actual join is exercised through the mocked calls above.
    drop(mirror);

    assert!(matches!(
        RestMirror::new("not a url", None, "acme"),
        Err(SyncError::InvalidBaseUrl(_))
    ));
}
