mod common;

use civiclog::ErrorKind;
use civiclog::models::EntityStatus;

#[tokio::test]
async fn comment_on_a_missing_report_is_accepted() {
    // Referential integrity is advisory at this layer; the schema carries
    // no foreign keys, so the insert goes through.
    let svc = common::memory_service().await;
    let author = svc.register("alice", "s3cret").await.unwrap();

    let comment = svc.create_comment(5, author.id, "hi").await.unwrap();
    assert_eq!(comment.report_id, 5);
    assert_eq!(comment.author_id, author.id);
    assert_eq!(comment.status, EntityStatus::Active);
}

#[tokio::test]
async fn comments_are_listed_per_report() {
    let svc = common::memory_service().await;
    let author = svc.register("alice", "s3cret").await.unwrap();
    let report = svc
        .create_report(author.id, "10.0", "20.0", "pothole", "Main St")
        .await
        .unwrap();
    let other = svc
        .create_report(author.id, "1.0", "2.0", "graffiti", "Elm St")
        .await
        .unwrap();

    svc.create_comment(report.id, author.id, "still there").await.unwrap();
    svc.create_comment(report.id, author.id, "getting worse").await.unwrap();
    svc.create_comment(other.id, author.id, "unrelated").await.unwrap();

    let comments = svc.list_comments_for_report(report.id).await.unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].message, "still there");
    assert_eq!(comments[1].message, "getting worse");
}

#[tokio::test]
async fn empty_messages_are_rejected() {
    let svc = common::memory_service().await;
    let author = svc.register("alice", "s3cret").await.unwrap();
    let err = svc.create_comment(1, author.id, "   ").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn deactivation_requires_the_right_parent_report() {
    let svc = common::memory_service().await;
    let author = svc.register("alice", "s3cret").await.unwrap();
    let report = svc
        .create_report(author.id, "10.0", "20.0", "pothole", "Main St")
        .await
        .unwrap();
    let comment = svc.create_comment(report.id, author.id, "hi").await.unwrap();

    let err = svc.deactivate_comment(report.id + 1, comment.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    // The mismatched call must not have touched the row.
    assert_eq!(svc.list_comments_for_report(report.id).await.unwrap().len(), 1);

    let snapshot = svc.deactivate_comment(report.id, comment.id).await.unwrap();
    assert_eq!(snapshot.status, EntityStatus::Active);
    assert!(svc.list_comments_for_report(report.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn deactivating_twice_succeeds_idempotently() {
    let svc = common::memory_service().await;
    let author = svc.register("alice", "s3cret").await.unwrap();
    let report = svc
        .create_report(author.id, "10.0", "20.0", "pothole", "Main St")
        .await
        .unwrap();
    let comment = svc.create_comment(report.id, author.id, "hi").await.unwrap();

    svc.deactivate_comment(report.id, comment.id).await.unwrap();
    let second = svc.deactivate_comment(report.id, comment.id).await.unwrap();
    assert_eq!(second.status, EntityStatus::Inactive);
}

#[tokio::test]
async fn inactive_comments_vanish_from_reads() {
    let svc = common::memory_service().await;
    let author = svc.register("alice", "s3cret").await.unwrap();
    let report = svc
        .create_report(author.id, "10.0", "20.0", "pothole", "Main St")
        .await
        .unwrap();
    let comment = svc.create_comment(report.id, author.id, "hi").await.unwrap();

    svc.get_comment(comment.id).await.unwrap();
    svc.deactivate_comment(report.id, comment.id).await.unwrap();

    let err = svc.get_comment(comment.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
