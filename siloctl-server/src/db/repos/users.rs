//! User repository
//!
//! - list: newest first (id DESC)
//! - create: plain INSERT, duplicate emails come back as
//!   [`DbError::UniqueViolation`]

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::db::DbError;
use crate::models::Email;

/// User record from database
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all users, highest id first.
    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as("SELECT id, email, created_at FROM users ORDER BY id DESC")
            .fetch_all(self.pool)
            .await?;
        Ok(users)
    }

    /// Insert a user; id and created_at are assigned by the store.
    pub async fn create(&self, email: &Email) -> Result<User, DbError> {
        let user = sqlx::query_as(
            r#"
            INSERT INTO users (email) VALUES ($1)
            RETURNING id, email, created_at
            "#,
        )
        .bind(email.as_str())
        .fetch_one(self.pool)
        .await?;
        Ok(user)
    }
}
