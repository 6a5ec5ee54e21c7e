use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, PostedJob, User};
use crate::database::query_builder::QueryBuilder;
use crate::filter::Filter;

/// Store access for user accounts
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_user: &NewUser, password_hash: &str) -> Result<User, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, role, password_hash) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(new_user.role.as_str())
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Account holding this (hashed) reset token, provided it has not expired
    pub async fn find_by_reset_token(&self, token_hash: &str, now: DateTime<Utc>) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE reset_password_token = $1 AND reset_password_expire > $2",
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Stores a reset token hash and expiry; `None` clears both.
    pub async fn set_reset_token(&self, id: Uuid, token: Option<(&str, DateTime<Utc>)>) -> Result<(), DatabaseError> {
        let (hash, expire) = match token {
            Some((hash, expire)) => (Some(hash), Some(expire)),
            None => (None, None),
        };
        sqlx::query(
            "UPDATE users SET reset_password_token = $2, reset_password_expire = $3, \
             updated_at = now(), version = version + 1 WHERE id = $1",
        )
        .bind(id)
        .bind(hash)
        .bind(expire)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Replaces the password hash and invalidates any outstanding reset token.
    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<User, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET password_hash = $2, reset_password_token = NULL, reset_password_expire = NULL, \
             updated_at = now(), version = version + 1 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;
        user.ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))
    }

    pub async fn update_profile(&self, id: Uuid, name: Option<&str>, email: Option<&str>) -> Result<User, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET name = COALESCE($2, name), email = COALESCE($3, email), \
             updated_at = now(), version = version + 1 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        user.ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))
    }

    /// Deletes the account; its jobs and applications go with it.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn posted_jobs(&self, id: Uuid) -> Result<Vec<PostedJob>, DatabaseError> {
        let jobs = sqlx::query_as::<_, PostedJob>(
            "SELECT id, title, posting_date FROM jobs WHERE user_id = $1 ORDER BY posting_date DESC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    /// Runs a filter built over the users collection
    pub async fn select_any(&self, filter: &Filter) -> Result<Vec<Value>, DatabaseError> {
        QueryBuilder::new(filter).select_all(&self.pool).await
    }

    /// Accounts matching the filter's predicates, ignoring paging
    pub async fn count_any(&self, filter: &Filter) -> Result<i64, DatabaseError> {
        QueryBuilder::new(filter).count(&self.pool).await
    }
}
