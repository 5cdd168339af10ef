//! Persistent storage backends.
//!
//! One trait covers the credential store and both resource stores; every
//! entity participates in the same soft-delete lifecycle. Default read
//! operations exclude `Inactive` rows. Deactivation loads its row through
//! an internal accessor that bypasses that filter, so repeating it on an
//! already-inactive entity succeeds idempotently.
//!
//! Backends issue parameterized statements only and rely on the database's
//! native transactional guarantees; multi-statement operations such as
//! insert-then-read-back are deliberately not wrapped in a transaction
//! (see [`StoreError::ReadBack`](crate::error::StoreError::ReadBack)).

use crate::error::StoreError;
use crate::models::{Comment, Report, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[async_trait]
pub trait Storage: Send + Sync + std::fmt::Debug {
    // Credential store.

    /// Persist a new account with an already-hashed password and return the
    /// freshly assigned row.
    async fn insert_user(
        &self,
        username: &str,
        password_hash: &str,
        created_at: DateTime<Utc>,
    ) -> Result<User, StoreError>;

    /// Rename an account in place; the numeric id never changes.
    async fn update_username(
        &self,
        username: &str,
        new_username: &str,
    ) -> Result<(), StoreError>;

    /// Replace an account's password digest.
    async fn update_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), StoreError>;

    /// Look up an active account by username. The digest is included so the
    /// caller can verify credentials.
    async fn get_user_by_username(&self, username: &str) -> Result<User, StoreError>;

    /// Look up an active account by id.
    async fn get_user_by_id(&self, id: i64) -> Result<User, StoreError>;

    /// Active accounts in storage order, password digests blanked.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    /// Soft-delete an account, returning the pre-mutation snapshot.
    async fn deactivate_user(&self, id: i64) -> Result<User, StoreError>;

    // Report store.

    /// Persist a new report. The creation timestamp is assigned here, not
    /// supplied by the caller, and the image reference starts empty.
    async fn insert_report(
        &self,
        reporter_id: i64,
        longitude: &str,
        latitude: &str,
        description: &str,
        location_info: &str,
    ) -> Result<Report, StoreError>;

    /// Look up an active report by id.
    async fn get_report(&self, id: i64) -> Result<Report, StoreError>;

    /// All active reports in storage order.
    async fn list_reports(&self) -> Result<Vec<Report>, StoreError>;

    /// Active reports filed by one account.
    async fn list_reports_by_user(&self, reporter_id: i64) -> Result<Vec<Report>, StoreError>;

    /// Soft-delete a report, returning the pre-mutation snapshot.
    async fn deactivate_report(&self, id: i64) -> Result<Report, StoreError>;

    // Comment store.

    /// Persist a new comment. Neither `report_id` nor `author_id` is checked
    /// for existence here; referential integrity is advisory at this layer.
    async fn insert_comment(
        &self,
        report_id: i64,
        author_id: i64,
        message: &str,
    ) -> Result<Comment, StoreError>;

    /// Look up an active comment by id.
    async fn get_comment(&self, id: i64) -> Result<Comment, StoreError>;

    /// Active comments on one report, in storage order.
    async fn list_report_comments(&self, report_id: i64) -> Result<Vec<Comment>, StoreError>;

    /// Soft-delete a comment addressed under its parent report; a comment
    /// that exists under a different report is `CommentNotFound`.
    async fn deactivate_comment(
        &self,
        report_id: i64,
        comment_id: i64,
    ) -> Result<Comment, StoreError>;
}

pub type DynStorage = Arc<dyn Storage>;

pub mod common;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod sqlite;

/// Create a storage backend from a connection URI.
///
/// # Errors
///
/// Returns an error if the URI names an unknown or disabled backend, or if
/// the backend fails to connect.
pub async fn open(uri: &str) -> Result<DynStorage, StoreError> {
    if uri.starts_with("sqlite:") {
        Ok(Arc::new(sqlite::SqliteStorage::new(uri).await?))
    } else if uri.starts_with("postgres:") {
        #[cfg(feature = "postgres")]
        {
            Ok(Arc::new(postgres::PostgresStorage::new(uri).await?))
        }
        #[cfg(not(feature = "postgres"))]
        {
            Err(StoreError::UnsupportedBackend(
                "postgres backend not enabled".into(),
            ))
        }
    } else {
        Err(StoreError::UnsupportedBackend(uri.to_string()))
    }
}
