//! Silobag repository
//!
//! Single-record create and list go through [`SilobagRepo`]. The
//! statement functions ([`insert`], [`update`], [`delete`]) accept any
//! executor; the batch engine calls them with its open transaction.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Executor, FromRow, PgPool, Postgres, QueryBuilder};

use crate::db::DbError;
use crate::models::{NewSilobag, SilobagPatch, UpdatableField, UserId};

/// Silobag record from database
#[derive(Debug, Clone, FromRow)]
pub struct Silobag {
    pub id: i64,
    pub user_id: i64,
    pub weight: f64,
    pub size: String,
    pub species: String,
    pub bagging_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub name: Option<String>,
}

/// Silobag repository
pub struct SilobagRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> SilobagRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's silobags, newest first.
    ///
    /// An unknown user is not an error; the list is simply empty.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Silobag>, DbError> {
        let bags = sqlx::query_as(
            r#"
            SELECT id, user_id, weight, size, species, bagging_date, created_at, name
            FROM silobags
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id.get())
        .fetch_all(self.pool)
        .await?;
        Ok(bags)
    }

    /// Create a silobag owned by `user_id`.
    ///
    /// A missing user is reported by the FK as
    /// [`DbError::ForeignKeyViolation`].
    pub async fn create(&self, user_id: UserId, bag: &NewSilobag) -> Result<Silobag, DbError> {
        insert(self.pool, user_id, bag).await
    }
}

/// INSERT one silobag and return the stored row.
pub async fn insert<'e, E>(executor: E, user_id: UserId, bag: &NewSilobag) -> Result<Silobag, DbError>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as(
        r#"
        INSERT INTO silobags (user_id, weight, size, species, bagging_date, name)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, weight, size, species, bagging_date, created_at, name
        "#,
    )
    .bind(user_id.get())
    .bind(bag.weight)
    .bind(&bag.size)
    .bind(&bag.species)
    .bind(bag.bagging_date)
    .bind(bag.name.as_deref())
    .fetch_one(executor)
    .await?;
    Ok(row)
}

/// Apply a partial update; returns the number of rows matched.
///
/// Zero rows is not an error: updating an id that does not exist is a
/// no-op.
pub async fn update<'e, E>(executor: E, id: i64, patch: &SilobagPatch) -> Result<u64, DbError>
where
    E: Executor<'e, Database = Postgres>,
{
    if patch.is_empty() {
        return Ok(0);
    }

    let mut query = update_query(id, patch);
    let result = query.build().execute(executor).await?;
    Ok(result.rows_affected())
}

/// DELETE by id; returns the number of rows removed (zero is fine).
pub async fn delete<'e, E>(executor: E, id: i64) -> Result<u64, DbError>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query("DELETE FROM silobags WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Build `UPDATE silobags SET ... WHERE id = $n` for the fields present
/// on `patch`.
///
/// Column names come from [`UpdatableField::column`]; every value is a
/// bound parameter.
pub fn update_query(id: i64, patch: &SilobagPatch) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("UPDATE silobags SET ");

    {
        let mut set = query.separated(", ");
        for field in patch.fields() {
            set.push(field.column()).push_unseparated(" = ");
            match field {
                UpdatableField::Name => set.push_bind_unseparated(patch.name.clone().flatten()),
                UpdatableField::Weight => set.push_bind_unseparated(patch.weight),
                UpdatableField::Size => set.push_bind_unseparated(patch.size.clone()),
                UpdatableField::Species => set.push_bind_unseparated(patch.species.clone()),
                UpdatableField::BaggingDate => set.push_bind_unseparated(patch.bagging_date),
            };
        }
    }

    query.push(" WHERE id = ").push_bind(id);
    query
}
