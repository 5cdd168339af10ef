mod common;

use chrono::Utc;
use civiclog::error::StoreError;
use civiclog::models::EntityStatus;
use civiclog::storage::{self, Storage};

#[tokio::test]
async fn open_rejects_unknown_backends() {
    let err = storage::open("mysql://root@localhost/reports").await.unwrap_err();
    assert!(matches!(err, StoreError::UnsupportedBackend(_)));
}

#[tokio::test]
async fn inserts_assign_sequential_ids() {
    let store = common::memory_storage().await;
    let alice = store.insert_user("alice", "digest-a", Utc::now()).await.unwrap();
    let bob = store.insert_user("bob", "digest-b", Utc::now()).await.unwrap();
    assert_eq!(alice.id, 1);
    assert_eq!(bob.id, 2);
}

#[tokio::test]
async fn duplicate_usernames_violate_the_unique_constraint() {
    let store = common::memory_storage().await;
    store.insert_user("alice", "digest-a", Utc::now()).await.unwrap();
    let err = store
        .insert_user("alice", "digest-b", Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateUsername(ref name) if name == "alice"));
}

#[tokio::test]
async fn lookups_return_the_digest_but_listings_blank_it() {
    let store = common::memory_storage().await;
    store.insert_user("alice", "digest-a", Utc::now()).await.unwrap();

    let direct = store.get_user_by_username("alice").await.unwrap();
    assert_eq!(direct.password_hash, "digest-a");

    let listed = store.list_users().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].password_hash.is_empty());
}

#[tokio::test]
async fn deactivation_is_idempotent_at_the_storage_layer() {
    let store = common::memory_storage().await;
    let user = store.insert_user("alice", "digest-a", Utc::now()).await.unwrap();

    let first = store.deactivate_user(user.id).await.unwrap();
    assert_eq!(first.status, EntityStatus::Active);

    let second = store.deactivate_user(user.id).await.unwrap();
    assert_eq!(second.status, EntityStatus::Inactive);
    assert!(store.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn file_backed_databases_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let uri = format!("sqlite://{}/civiclog.db", dir.path().display());

    let store = storage::open(&uri).await.unwrap();
    store.insert_user("alice", "digest-a", Utc::now()).await.unwrap();
    drop(store);

    let reopened = storage::open(&uri).await.unwrap();
    let user = reopened.get_user_by_username("alice").await.unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.status, EntityStatus::Active);
}

#[tokio::test]
async fn report_timestamps_are_assigned_by_the_store() {
    let store = common::memory_storage().await;
    let before = Utc::now().timestamp();
    let report = store
        .insert_report(1, "10.0", "20.0", "pothole", "Main St")
        .await
        .unwrap();
    let after = Utc::now().timestamp();
    let stamped = report.created_at.timestamp();
    assert!(stamped >= before && stamped <= after);
}
