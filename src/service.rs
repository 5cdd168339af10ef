//! Facade-facing operations.
//!
//! The embedding server translates requests into these calls and serializes
//! the results; nothing in this module knows about transports. Each inbound
//! request runs on its own worker; the service itself is cheap to clone and
//! holds no mutable state, so no locking is needed across requests.

use crate::auth::{self, Claims, SessionIssuer};
use crate::config::Config;
use crate::error::{AuthError, Error, ValidationError};
use crate::models::{Comment, Report, UserView};
use crate::storage::{DynStorage, Storage};
use chrono::Utc;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 32;
pub const PASSWORD_MIN: usize = 6;

/// Parse an identifier supplied by the facade as path/query text.
///
/// # Errors
///
/// Returns a validation error when the text is not an integer id.
pub fn parse_id(raw: &str) -> Result<i64, Error> {
    raw.trim()
        .parse()
        .map_err(|_| ValidationError::InvalidId(raw.to_string()).into())
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.len() < USERNAME_MIN || username.len() > USERNAME_MAX {
        return Err(ValidationError::UsernameLength {
            min: USERNAME_MIN,
            max: USERNAME_MAX,
        });
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < PASSWORD_MIN {
        return Err(ValidationError::PasswordTooShort { min: PASSWORD_MIN });
    }
    Ok(())
}

/// The core application service: credential management, session issuing,
/// and the report/comment stores behind one handle.
#[derive(Clone)]
pub struct Service {
    store: DynStorage,
    sessions: SessionIssuer,
}

impl Service {
    pub fn new(store: DynStorage, sessions: SessionIssuer) -> Self {
        Self { store, sessions }
    }

    /// Build a service from process configuration: open the storage backend
    /// named by `db_uri` and key the token signer with the secret.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be opened. Failing
    /// here is the one condition under which the embedding process should
    /// refuse to start.
    pub async fn from_config(config: &Config) -> Result<Self, Error> {
        let store = crate::storage::open(&config.db_uri).await?;
        Ok(Self::new(store, SessionIssuer::new(&config.secret)))
    }

    // Accounts.

    /// Register a new account and return its public view.
    ///
    /// # Errors
    ///
    /// Returns a validation error for out-of-bounds input and
    /// `DuplicateUsername` when the name is already taken, including by a
    /// deactivated account; names are never freed.
    pub async fn register(&self, username: &str, password: &str) -> Result<UserView, Error> {
        validate_username(username)?;
        validate_password(password)?;
        let hash = auth::hash_password(password)?;
        let user = self.store.insert_user(username, &hash, Utc::now()).await?;
        tracing::info!(user = user.id, "registered account");
        Ok(user.view())
    }

    /// Verify credentials and mint a session token.
    ///
    /// # Errors
    ///
    /// `UserNotFound` when no active account has the username,
    /// `InvalidCredentials` when the password does not verify against the
    /// stored digest.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<String, Error> {
        let user = self.store.get_user_by_username(username).await?;
        if !auth::verify_password(password, &user.password_hash)? {
            tracing::info!(user = user.id, "rejected login");
            return Err(AuthError::InvalidCredentials(username.to_string()).into());
        }
        Ok(self.sessions.issue(&user)?)
    }

    /// Check a session token's signature and expiry, returning its claims.
    /// Mounting this in front of protected routes is the facade's job.
    ///
    /// # Errors
    ///
    /// Returns an error for a bad signature or an expired token.
    pub fn verify_token(&self, token: &str) -> Result<Claims, Error> {
        Ok(self.sessions.verify(token)?)
    }

    /// Rename an account; the numeric id is unchanged.
    pub async fn rename_user(&self, username: &str, new_username: &str) -> Result<(), Error> {
        validate_username(new_username)?;
        self.store.update_username(username, new_username).await?;
        Ok(())
    }

    /// Replace an account's password.
    pub async fn change_password(&self, username: &str, new_password: &str) -> Result<(), Error> {
        validate_password(new_password)?;
        let hash = auth::hash_password(new_password)?;
        self.store.update_password(username, &hash).await?;
        Ok(())
    }

    /// Soft-delete an account and return the view it had just before.
    pub async fn deactivate_user(&self, id: i64) -> Result<UserView, Error> {
        let user = self.store.deactivate_user(id).await?;
        tracing::info!(user = id, "deactivated account");
        Ok(user.view())
    }

    pub async fn list_active_users(&self) -> Result<Vec<UserView>, Error> {
        let users = self.store.list_users().await?;
        Ok(users.iter().map(|u| u.view()).collect())
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<UserView, Error> {
        Ok(self.store.get_user_by_id(id).await?.view())
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<UserView, Error> {
        Ok(self.store.get_user_by_username(username).await?.view())
    }

    // Reports.

    /// File a report; the store stamps the creation time.
    pub async fn create_report(
        &self,
        reporter_id: i64,
        longitude: &str,
        latitude: &str,
        description: &str,
        location_info: &str,
    ) -> Result<Report, Error> {
        let report = self
            .store
            .insert_report(reporter_id, longitude, latitude, description, location_info)
            .await?;
        tracing::info!(report = report.id, reporter = reporter_id, "filed report");
        Ok(report)
    }

    pub async fn list_reports(&self) -> Result<Vec<Report>, Error> {
        Ok(self.store.list_reports().await?)
    }

    pub async fn list_reports_by_user(&self, reporter_id: i64) -> Result<Vec<Report>, Error> {
        Ok(self.store.list_reports_by_user(reporter_id).await?)
    }

    pub async fn get_report(&self, id: i64) -> Result<Report, Error> {
        Ok(self.store.get_report(id).await?)
    }

    /// Soft-delete a report, returning the pre-mutation snapshot.
    pub async fn deactivate_report(&self, id: i64) -> Result<Report, Error> {
        let report = self.store.deactivate_report(id).await?;
        tracing::info!(report = id, "deactivated report");
        Ok(report)
    }

    // Comments.

    /// Comment on a report. The report id is taken on faith; existence is
    /// only enforced where the underlying storage enforces foreign keys.
    pub async fn create_comment(
        &self,
        report_id: i64,
        author_id: i64,
        message: &str,
    ) -> Result<Comment, Error> {
        if message.trim().is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }
        let comment = self.store.insert_comment(report_id, author_id, message).await?;
        tracing::info!(comment = comment.id, report = report_id, "added comment");
        Ok(comment)
    }

    pub async fn list_comments_for_report(&self, report_id: i64) -> Result<Vec<Comment>, Error> {
        Ok(self.store.list_report_comments(report_id).await?)
    }

    pub async fn get_comment(&self, id: i64) -> Result<Comment, Error> {
        Ok(self.store.get_comment(id).await?)
    }

    /// Soft-delete a comment addressed under its parent report.
    pub async fn deactivate_comment(
        &self,
        report_id: i64,
        comment_id: i64,
    ) -> Result<Comment, Error> {
        let comment = self.store.deactivate_comment(report_id, comment_id).await?;
        tracing::info!(comment = comment_id, report = report_id, "deactivated comment");
        Ok(comment)
    }
}
