use super::Storage;
use super::common::{self, sql};
use crate::error::StoreError;
use crate::models::{Comment, EntityStatus, Lifecycle, Report, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

fn user_from_row(row: &SqliteRow) -> Result<User, StoreError> {
    let created_at: i64 = row.try_get("created_at")?;
    let status: String = row.try_get("status")?;
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        created_at: common::timestamp(created_at)?,
        status: status.parse()?,
    })
}

fn report_from_row(row: &SqliteRow) -> Result<Report, StoreError> {
    let created_at: i64 = row.try_get("created_at")?;
    let status: String = row.try_get("status")?;
    Ok(Report {
        id: row.try_get("id")?,
        reporter_id: row.try_get("reporter_id")?,
        created_at: common::timestamp(created_at)?,
        longitude: row.try_get("longitude")?,
        latitude: row.try_get("latitude")?,
        description: row.try_get("description")?,
        location_info: row.try_get("location_info")?,
        image_ref: row.try_get("image_ref")?,
        status: status.parse()?,
    })
}

fn comment_from_row(row: &SqliteRow) -> Result<Comment, StoreError> {
    let created_at: i64 = row.try_get("created_at")?;
    let status: String = row.try_get("status")?;
    Ok(Comment {
        id: row.try_get("id")?,
        report_id: row.try_get("report_id")?,
        author_id: row.try_get("author_id")?,
        created_at: common::timestamp(created_at)?,
        message: row.try_get("message")?,
        status: status.parse()?,
    })
}

#[derive(Clone, Debug)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Create a new SQLite storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation
    /// fails.
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        sqlx::query(sql::USERS_TABLE_SQLITE).execute(&pool).await?;
        sqlx::query(sql::REPORTS_TABLE_SQLITE).execute(&pool).await?;
        sqlx::query(sql::COMMENTS_TABLE_SQLITE).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Read back a freshly inserted row by id.
    async fn read_back<T, F>(&self, select_sql: &'static str, id: i64, map: F) -> Result<T, StoreError>
    where
        F: Fn(&SqliteRow) -> Result<T, StoreError>,
    {
        let row = sqlx::query(select_sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::ReadBack(id))?;
        map(&row)
    }

    /// Shared soft-delete path: load the row through the filter-bypassing
    /// select, succeed idempotently when it is already inactive, otherwise
    /// flag it and return the pre-mutation snapshot.
    async fn soft_delete<T, F>(
        &self,
        select_sql: &'static str,
        update_sql: &'static str,
        binds: &[i64],
        map: F,
    ) -> Result<Option<T>, StoreError>
    where
        T: Lifecycle + Send,
        F: Fn(&SqliteRow) -> Result<T, StoreError> + Send,
    {
        let mut select = sqlx::query(select_sql);
        for bind in binds {
            select = select.bind(*bind);
        }
        let Some(row) = select.fetch_optional(&self.pool).await? else {
            return Ok(None);
        };
        let entity = map(&row)?;
        if entity.status() == EntityStatus::Inactive {
            return Ok(Some(entity));
        }

        let mut update = sqlx::query(update_sql);
        for bind in binds {
            update = update.bind(*bind);
        }
        update.execute(&self.pool).await?;
        Ok(Some(entity))
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    #[tracing::instrument(skip_all)]
    async fn insert_user(
        &self,
        username: &str,
        password_hash: &str,
        created_at: DateTime<Utc>,
    ) -> Result<User, StoreError> {
        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, created_at, status) \
             VALUES (?, ?, ?, 'active')",
        )
        .bind(username)
        .bind(password_hash)
        .bind(created_at.timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| common::username_conflict(e, username))?;

        self.read_back(
            "SELECT id, username, password_hash, created_at, status FROM users WHERE id = ?",
            result.last_insert_rowid(),
            user_from_row,
        )
        .await
    }

    #[tracing::instrument(skip_all)]
    async fn update_username(
        &self,
        username: &str,
        new_username: &str,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET username = ? WHERE username = ?")
            .bind(new_username)
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(|e| common::username_conflict(e, new_username))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::UserNotFound(username.to_string()));
        }
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    async fn update_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE username = ?")
            .bind(password_hash)
            .bind(username)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::UserNotFound(username.to_string()));
        }
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    async fn get_user_by_username(&self, username: &str) -> Result<User, StoreError> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, created_at, status FROM users \
             WHERE username = ? AND status = 'active'",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::UserNotFound(username.to_string()))?;
        user_from_row(&row)
    }

    #[tracing::instrument(skip_all)]
    async fn get_user_by_id(&self, id: i64) -> Result<User, StoreError> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, created_at, status FROM users \
             WHERE id = ? AND status = 'active'",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::UserNotFound(id.to_string()))?;
        user_from_row(&row)
    }

    #[tracing::instrument(skip_all)]
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, username, password_hash, created_at, status FROM users \
             WHERE status = 'active' ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            let mut user = user_from_row(&row)?;
            user.password_hash = String::new();
            users.push(user);
        }
        Ok(users)
    }

    #[tracing::instrument(skip_all)]
    async fn deactivate_user(&self, id: i64) -> Result<User, StoreError> {
        self.soft_delete(
            "SELECT id, username, password_hash, created_at, status FROM users WHERE id = ?",
            "UPDATE users SET status = 'inactive' WHERE id = ?",
            &[id],
            user_from_row,
        )
        .await?
        .ok_or_else(|| StoreError::UserNotFound(id.to_string()))
    }

    #[tracing::instrument(skip_all)]
    async fn insert_report(
        &self,
        reporter_id: i64,
        longitude: &str,
        latitude: &str,
        description: &str,
        location_info: &str,
    ) -> Result<Report, StoreError> {
        let result = sqlx::query(
            "INSERT INTO reports \
             (reporter_id, created_at, longitude, latitude, description, location_info, image_ref, status) \
             VALUES (?, ?, ?, ?, ?, ?, '', 'active')",
        )
        .bind(reporter_id)
        .bind(Utc::now().timestamp())
        .bind(longitude)
        .bind(latitude)
        .bind(description)
        .bind(location_info)
        .execute(&self.pool)
        .await?;

        self.read_back(
            "SELECT id, reporter_id, created_at, longitude, latitude, description, \
             location_info, image_ref, status FROM reports WHERE id = ?",
            result.last_insert_rowid(),
            report_from_row,
        )
        .await
    }

    #[tracing::instrument(skip_all)]
    async fn get_report(&self, id: i64) -> Result<Report, StoreError> {
        let row = sqlx::query(
            "SELECT id, reporter_id, created_at, longitude, latitude, description, \
             location_info, image_ref, status FROM reports \
             WHERE id = ? AND status = 'active'",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::ReportNotFound(id))?;
        report_from_row(&row)
    }

    #[tracing::instrument(skip_all)]
    async fn list_reports(&self) -> Result<Vec<Report>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, reporter_id, created_at, longitude, latitude, description, \
             location_info, image_ref, status FROM reports WHERE status = 'active' ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(report_from_row).collect()
    }

    #[tracing::instrument(skip_all)]
    async fn list_reports_by_user(&self, reporter_id: i64) -> Result<Vec<Report>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, reporter_id, created_at, longitude, latitude, description, \
             location_info, image_ref, status FROM reports \
             WHERE status = 'active' AND reporter_id = ? ORDER BY id",
        )
        .bind(reporter_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(report_from_row).collect()
    }

    #[tracing::instrument(skip_all)]
    async fn deactivate_report(&self, id: i64) -> Result<Report, StoreError> {
        self.soft_delete(
            "SELECT id, reporter_id, created_at, longitude, latitude, description, \
             location_info, image_ref, status FROM reports WHERE id = ?",
            "UPDATE reports SET status = 'inactive' WHERE id = ?",
            &[id],
            report_from_row,
        )
        .await?
        .ok_or(StoreError::ReportNotFound(id))
    }

    #[tracing::instrument(skip_all)]
    async fn insert_comment(
        &self,
        report_id: i64,
        author_id: i64,
        message: &str,
    ) -> Result<Comment, StoreError> {
        let result = sqlx::query(
            "INSERT INTO comments (report_id, author_id, created_at, message, status) \
             VALUES (?, ?, ?, ?, 'active')",
        )
        .bind(report_id)
        .bind(author_id)
        .bind(Utc::now().timestamp())
        .bind(message)
        .execute(&self.pool)
        .await?;

        self.read_back(
            "SELECT id, report_id, author_id, created_at, message, status \
             FROM comments WHERE id = ?",
            result.last_insert_rowid(),
            comment_from_row,
        )
        .await
    }

    #[tracing::instrument(skip_all)]
    async fn get_comment(&self, id: i64) -> Result<Comment, StoreError> {
        let row = sqlx::query(
            "SELECT id, report_id, author_id, created_at, message, status FROM comments \
             WHERE id = ? AND status = 'active'",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::CommentNotFound(id))?;
        comment_from_row(&row)
    }

    #[tracing::instrument(skip_all)]
    async fn list_report_comments(&self, report_id: i64) -> Result<Vec<Comment>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, report_id, author_id, created_at, message, status FROM comments \
             WHERE status = 'active' AND report_id = ? ORDER BY id",
        )
        .bind(report_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(comment_from_row).collect()
    }

    #[tracing::instrument(skip_all)]
    async fn deactivate_comment(
        &self,
        report_id: i64,
        comment_id: i64,
    ) -> Result<Comment, StoreError> {
        self.soft_delete(
            "SELECT id, report_id, author_id, created_at, message, status \
             FROM comments WHERE id = ? AND report_id = ?",
            "UPDATE comments SET status = 'inactive' WHERE id = ? AND report_id = ?",
            &[comment_id, report_id],
            comment_from_row,
        )
        .await?
        .ok_or(StoreError::CommentNotFound(comment_id))
    }
}
