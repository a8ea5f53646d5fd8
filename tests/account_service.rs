mod common;

use std::time::Duration;

use serde_json::Map;

use account_api::repos::event_repo::EventType;
use account_api::services::accounts::{AccountError, EventError, EventWriter};

use common::{
    DASHBOARDS_TABLE, InMemoryStore, USER_EVENTS_TABLE, account_service, seed_user,
    user_dashboards,
};

// The access event is written on a detached task; give it a moment to land.
async fn settle_detached_tasks() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn get_user_returns_stored_record() {
    let store = InMemoryStore::new();
    seed_user(&store, "user-1", "Henery", &["dash-1", "dash-2"]);
    let service = account_service(store.clone());

    let user = service.get_user("user-1").await.unwrap();

    assert_eq!(user.user_id, "user-1");
    assert_eq!(user.first_name, "Henery");
    assert_eq!(user.dashboards, vec!["dash-1", "dash-2"]);
    assert!(user.subscriptions.is_empty());

    settle_detached_tasks().await;
    assert_eq!(store.table_len(USER_EVENTS_TABLE), 1);
}

#[tokio::test]
async fn get_user_resolves_even_when_event_write_fails() {
    let store = InMemoryStore::new();
    seed_user(&store, "user-1", "Henery", &["dash-1"]);
    store.fail_table(USER_EVENTS_TABLE);
    let service = account_service(store.clone());

    let user = service.get_user("user-1").await.unwrap();
    assert_eq!(user.dashboards, vec!["dash-1"]);

    settle_detached_tasks().await;
    assert_eq!(store.table_len(USER_EVENTS_TABLE), 0);
}

#[tokio::test]
async fn get_user_absent_fails_and_writes_no_event() {
    let store = InMemoryStore::new();
    let service = account_service(store.clone());

    let err = service.get_user("nobody").await.unwrap_err();
    assert!(matches!(err, AccountError::UserNotFound));

    settle_detached_tasks().await;
    assert_eq!(store.table_len(USER_EVENTS_TABLE), 0);
}

#[tokio::test]
async fn register_dashboard_appends_id_once_and_creates_record() {
    let store = InMemoryStore::new();
    seed_user(&store, "user-1", "Henery", &["existing"]);
    let service = account_service(store.clone());

    let dashboard_id = service
        .register_new_dashboard("user-1", "Power usage")
        .await
        .unwrap();

    let dashboards = user_dashboards(&store, "user-1");
    let occurrences = dashboards.iter().filter(|d| **d == dashboard_id).count();
    assert_eq!(occurrences, 1);
    assert_eq!(dashboards[0], "existing");

    let record = store
        .live_item(DASHBOARDS_TABLE, &dashboard_id)
        .expect("dashboard record should exist");
    assert_eq!(record["dashboardID"], dashboard_id.as_str());
    assert_eq!(record["dashboardName"], "Power usage");
    assert!(record["createdAt"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn register_dashboard_for_missing_user_fails() {
    let store = InMemoryStore::new();
    let service = account_service(store.clone());

    let err = service
        .register_new_dashboard("nobody", "Power usage")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::UserNotFound));
    assert_eq!(store.table_len(DASHBOARDS_TABLE), 0);
}

#[tokio::test]
async fn register_dashboard_record_failure_keeps_user_side_append() {
    let store = InMemoryStore::new();
    seed_user(&store, "user-1", "Henery", &[]);
    store.fail_table(DASHBOARDS_TABLE);
    let service = account_service(store.clone());

    let err = service
        .register_new_dashboard("user-1", "Power usage")
        .await
        .unwrap_err();

    // The failure is distinguishable and the appended id is NOT rolled back.
    match err {
        AccountError::DashboardRecordIncomplete { dashboard_id, .. } => {
            assert_eq!(user_dashboards(&store, "user-1"), vec![dashboard_id]);
        }
        other => panic!("expected DashboardRecordIncomplete, got {other:?}"),
    }
}

#[tokio::test]
async fn remove_dashboard_absent_id_is_noop_success() {
    let store = InMemoryStore::new();
    seed_user(&store, "user-1", "Henery", &["dash-1", "dash-2"]);
    let service = account_service(store.clone());

    service.remove_dashboard("user-1", "unknown").await.unwrap();

    assert_eq!(user_dashboards(&store, "user-1"), vec!["dash-1", "dash-2"]);
}

#[tokio::test]
async fn remove_dashboard_removes_exactly_one_occurrence() {
    let store = InMemoryStore::new();
    seed_user(&store, "user-1", "Henery", &["dash-1", "dash-2", "dash-1"]);
    let service = account_service(store.clone());

    service.remove_dashboard("user-1", "dash-1").await.unwrap();

    assert_eq!(user_dashboards(&store, "user-1"), vec!["dash-2", "dash-1"]);
}

#[tokio::test]
async fn remove_dashboard_for_missing_user_fails() {
    let store = InMemoryStore::new();
    let service = account_service(store.clone());

    let err = service
        .remove_dashboard("nobody", "dash-1")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::UserNotFound));
}

// Documented race: removal is a read-modify-write with no version check.
// When two removals interleave (both read the same snapshot), the last
// write wins and one removal is silently lost.
#[tokio::test]
async fn interleaved_removals_lose_one_removal() {
    let store = InMemoryStore::new();
    seed_user(&store, "user-1", "Henery", &["dash-1", "dash-2", "dash-3"]);
    let service = account_service(store.clone());

    store.freeze_reads();
    service.remove_dashboard("user-1", "dash-1").await.unwrap();
    service.remove_dashboard("user-1", "dash-2").await.unwrap();
    store.thaw_reads();

    // The second writer clobbered the first: dash-1 is back.
    assert_eq!(user_dashboards(&store, "user-1"), vec!["dash-1", "dash-3"]);
}

#[tokio::test]
async fn event_writer_rejects_empty_mandatory_fields() {
    let store = InMemoryStore::new();
    let writer = EventWriter::new(store.clone(), USER_EVENTS_TABLE);

    let err = writer
        .put_event("", EventType::AccessedAccount, 1, Map::new())
        .await
        .unwrap_err();
    assert!(matches!(err, EventError::MissingField("userID")));

    let err = writer
        .put_event("user-1", EventType::AccessedAccount, 0, Map::new())
        .await
        .unwrap_err();
    assert!(matches!(err, EventError::MissingField("eventOccurredAt")));

    assert_eq!(store.table_len(USER_EVENTS_TABLE), 0);
}

#[tokio::test]
async fn event_writer_records_tagged_event() {
    let store = InMemoryStore::new();
    let writer = EventWriter::new(store.clone(), USER_EVENTS_TABLE);

    let mut extra = Map::new();
    extra.insert("source".to_string(), "api".into());
    writer
        .put_event("user-1", EventType::AccessedAccount, 1700000000, extra)
        .await
        .unwrap();

    assert_eq!(store.table_len(USER_EVENTS_TABLE), 1);
}
