mod common;

use civiclog::ErrorKind;
use civiclog::auth::{SessionIssuer, TOKEN_TTL_DAYS};

#[tokio::test]
async fn register_then_authenticate() {
    let svc = common::memory_service().await;
    let view = svc.register("alice", "s3cret").await.unwrap();
    assert_eq!(view.id, 1);
    assert_eq!(view.email, "alice");

    let token = svc.authenticate("alice", "s3cret").await.unwrap();
    assert!(!token.is_empty());

    let err = svc.authenticate("alice", "wrong").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCredential);
}

#[tokio::test]
async fn repeated_authentication_keeps_succeeding() {
    // The registration-time digest must verify on every later attempt,
    // not just the first one.
    let svc = common::memory_service().await;
    svc.register("alice", "s3cret").await.unwrap();
    for _ in 0..3 {
        svc.authenticate("alice", "s3cret").await.unwrap();
    }
    let err = svc.authenticate("alice", "s3cret2").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCredential);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let svc = common::memory_service().await;
    let err = svc.authenticate("ghost", "whatever").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn deactivated_user_cannot_authenticate() {
    let svc = common::memory_service().await;
    let view = svc.register("alice", "s3cret").await.unwrap();
    svc.authenticate("alice", "s3cret").await.unwrap();

    svc.deactivate_user(view.id).await.unwrap();
    let err = svc.authenticate("alice", "s3cret").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn change_password_rotates_credentials() {
    let svc = common::memory_service().await;
    svc.register("alice", "s3cret").await.unwrap();
    svc.change_password("alice", "n3w-secret").await.unwrap();

    let err = svc.authenticate("alice", "s3cret").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCredential);
    svc.authenticate("alice", "n3w-secret").await.unwrap();
}

#[tokio::test]
async fn renamed_account_authenticates_under_the_new_name() {
    let svc = common::memory_service().await;
    svc.register("alice", "s3cret").await.unwrap();
    svc.rename_user("alice", "alison").await.unwrap();

    let err = svc.authenticate("alice", "s3cret").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    svc.authenticate("alison", "s3cret").await.unwrap();
}

#[tokio::test]
async fn token_claims_identify_the_subject() {
    let svc = common::memory_service().await;
    let view = svc.register("alice", "s3cret").await.unwrap();
    let token = svc.authenticate("alice", "s3cret").await.unwrap();

    let claims = svc.verify_token(&token).unwrap();
    assert_eq!(claims.sub, view.id);
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.exp - claims.iat, TOKEN_TTL_DAYS * 24 * 60 * 60);
}

#[tokio::test]
async fn tokens_do_not_verify_under_another_secret() {
    let svc = common::memory_service().await;
    svc.register("alice", "s3cret").await.unwrap();
    let token = svc.authenticate("alice", "s3cret").await.unwrap();

    assert!(SessionIssuer::new("some-other-secret").verify(&token).is_err());
}
