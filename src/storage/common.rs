//! SQL schemas and common utilities for the storage backends.

use crate::error::StoreError;
use chrono::{DateTime, Utc};

/// SQL schema text per backend.
///
/// Reporter, author, and report references are plain integer columns on
/// purpose: the entities reference each other weakly and nothing cascades.
pub mod sql {
    pub const USERS_TABLE_SQLITE: &str = "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'active'
        )";

    pub const USERS_TABLE_POSTGRES: &str = "CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at BIGINT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active'
        )";

    pub const REPORTS_TABLE_SQLITE: &str = "CREATE TABLE IF NOT EXISTS reports (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            reporter_id INTEGER NOT NULL,
            created_at INTEGER NOT NULL,
            longitude TEXT NOT NULL,
            latitude TEXT NOT NULL,
            description TEXT NOT NULL,
            location_info TEXT NOT NULL,
            image_ref TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'active'
        )";

    pub const REPORTS_TABLE_POSTGRES: &str = "CREATE TABLE IF NOT EXISTS reports (
            id BIGSERIAL PRIMARY KEY,
            reporter_id BIGINT NOT NULL,
            created_at BIGINT NOT NULL,
            longitude TEXT NOT NULL,
            latitude TEXT NOT NULL,
            description TEXT NOT NULL,
            location_info TEXT NOT NULL,
            image_ref TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'active'
        )";

    pub const COMMENTS_TABLE_SQLITE: &str = "CREATE TABLE IF NOT EXISTS comments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            report_id INTEGER NOT NULL,
            author_id INTEGER NOT NULL,
            created_at INTEGER NOT NULL,
            message TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active'
        )";

    pub const COMMENTS_TABLE_POSTGRES: &str = "CREATE TABLE IF NOT EXISTS comments (
            id BIGSERIAL PRIMARY KEY,
            report_id BIGINT NOT NULL,
            author_id BIGINT NOT NULL,
            created_at BIGINT NOT NULL,
            message TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active'
        )";
}

/// Decode a seconds-since-epoch column.
pub(crate) fn timestamp(secs: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| StoreError::Corrupt(format!("timestamp out of range: {secs}")))
}

/// Whether a database error is a uniqueness-constraint violation.
pub(crate) fn unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Map an insert/update error, attributing unique violations to `username`.
pub(crate) fn username_conflict(err: sqlx::Error, username: &str) -> StoreError {
    if unique_violation(&err) {
        StoreError::DuplicateUsername(username.to_string())
    } else {
        err.into()
    }
}
