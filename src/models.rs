//! Domain records shared by the storage backends and the service layer.
//!
//! All three entity kinds are owned exclusively by the store; everything
//! outside it holds identifiers, never live references. Records are created
//! by an insert operation that assigns the id, mutated only by the
//! field-specific update operations, and soft-deleted by flipping
//! [`EntityStatus`]; rows are never physically removed.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a stored entity.
///
/// The transition set is closed: `Active -> Inactive`, and `Inactive` is
/// terminal. Inactive rows are excluded from every default read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    Active,
    Inactive,
}

impl EntityStatus {
    pub fn is_active(self) -> bool {
        matches!(self, EntityStatus::Active)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityStatus::Active => "active",
            EntityStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EntityStatus::Active),
            "inactive" => Ok(EntityStatus::Inactive),
            other => Err(StoreError::Corrupt(format!(
                "unknown entity status: {other}"
            ))),
        }
    }
}

/// Soft-delete contract shared by every persisted entity kind.
pub trait Lifecycle {
    fn id(&self) -> i64;
    fn status(&self) -> EntityStatus;
}

/// A registered account.
///
/// The password digest is skipped on serialization; the projection handed
/// to facades is [`UserView`], which never carries it at all.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    /// Unique login name; doubles as the account's contact address.
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub status: EntityStatus,
}

impl User {
    /// Public projection of the account: the only user shape facades see.
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            email: self.username.clone(),
        }
    }
}

impl Lifecycle for User {
    fn id(&self) -> i64 {
        self.id
    }

    fn status(&self) -> EntityStatus {
        self.status
    }
}

/// Outward-facing account shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: i64,
    pub email: String,
}

/// A geotagged incident report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub id: i64,
    /// Weak reference to the reporting account; no cascade on deactivation.
    pub reporter_id: i64,
    pub created_at: DateTime<Utc>,
    pub longitude: String,
    pub latitude: String,
    pub description: String,
    pub location_info: String,
    /// Opaque handle into the image store; empty until an upload is attached.
    pub image_ref: String,
    pub status: EntityStatus,
}

impl Lifecycle for Report {
    fn id(&self) -> i64 {
        self.id
    }

    fn status(&self) -> EntityStatus {
        self.status
    }
}

/// A comment left on a report.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: i64,
    /// Weak reference to the parent report.
    pub report_id: i64,
    /// Weak reference to the commenting account.
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub message: String,
    pub status: EntityStatus,
}

impl Lifecycle for Comment {
    fn id(&self) -> i64 {
        self.id
    }

    fn status(&self) -> EntityStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trip() {
        assert_eq!("active".parse::<EntityStatus>().unwrap(), EntityStatus::Active);
        assert_eq!(
            "inactive".parse::<EntityStatus>().unwrap(),
            EntityStatus::Inactive
        );
        assert_eq!(EntityStatus::Active.to_string(), "active");
        assert!("deleted".parse::<EntityStatus>().is_err());
    }

    #[test]
    fn user_serialization_never_carries_the_digest() {
        let user = User {
            id: 1,
            username: "alice".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            created_at: Utc::now(),
            status: EntityStatus::Active,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn view_exposes_id_and_email_only() {
        let user = User {
            id: 9,
            username: "bob".into(),
            password_hash: "digest".into(),
            created_at: Utc::now(),
            status: EntityStatus::Active,
        };
        let json = serde_json::to_value(user.view()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(json["id"], 9);
        assert_eq!(json["email"], "bob");
    }
}
