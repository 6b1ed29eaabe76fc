//! Shared fixture for store-backed tests
//!
//! Needs `DATABASE_URL` pointing at a disposable database. Tables are
//! created if missing; rows are never cleaned up, so every test works on
//! its own freshly created user.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Once;

use chrono::Utc;
use serde_json::json;
use siloctl_server::db::{create_pool, DbConfig, User, UserRepo};
use siloctl_server::models::{Email, UserId};
use sqlx::PgPool;

const SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id         BIGSERIAL PRIMARY KEY,
        email      TEXT NOT NULL UNIQUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS silobags (
        id           BIGSERIAL PRIMARY KEY,
        user_id      BIGINT NOT NULL REFERENCES users(id),
        weight       DOUBLE PRECISION NOT NULL,
        size         TEXT NOT NULL,
        species      TEXT NOT NULL,
        bagging_date DATE NOT NULL,
        created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        name         TEXT
    )
    "#,
];

// Serializes concurrent CREATE TABLE IF NOT EXISTS across test threads.
const SCHEMA_LOCK: i64 = 0x5110_c7a1;

static TRACING: Once = Once::new();
static EMAIL_SEQ: AtomicU32 = AtomicU32::new(0);

/// Pool against `DATABASE_URL` with the schema in place.
pub async fn pool() -> PgPool {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("siloctl_server=debug")
            .with_test_writer()
            .try_init();
    });

    let config = DbConfig {
        database_url: std::env::var("DATABASE_URL").ok(),
        max_connections: 4,
    };
    let pool = create_pool(&config).await.expect("connect to DATABASE_URL");

    let mut tx = pool.begin().await.unwrap();
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK)
        .execute(&mut *tx)
        .await
        .unwrap();
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await.unwrap();
    }
    tx.commit().await.unwrap();

    pool
}

/// Email no other test run has used.
pub fn unique_email(tag: &str) -> String {
    let seq = EMAIL_SEQ.fetch_add(1, Ordering::Relaxed);
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{tag}-{nanos}-{seq}@siloctl.test")
}

/// Create a user with a unique email.
pub async fn user(pool: &PgPool, tag: &str) -> User {
    let email = Email::from_json(Some(&json!(unique_email(tag)))).unwrap();
    UserRepo::new(pool).create(&email).await.unwrap()
}

pub fn user_id(user: &User) -> UserId {
    UserId::parse(&user.id.to_string()).unwrap()
}

/// Id no user row will ever have.
pub async fn missing_user_id(pool: &PgPool) -> i64 {
    let (max,): (Option<i64>,) = sqlx::query_as("SELECT MAX(id) FROM users")
        .fetch_one(pool)
        .await
        .unwrap();
    max.unwrap_or(0) + 1_000_000
}

pub async fn count_silobags(pool: &PgPool, user_id: i64) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM silobags WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

/// Insert descriptor body for a batch.
pub fn insert_op(user_id: i64, name: &str) -> serde_json::Value {
    json!({
        "op": "insert",
        "table": "silobags",
        "data": {
            "user_id": user_id,
            "weight": 500,
            "size": "small",
            "species": "soy",
            "bagging_date": "2024-01-01",
            "name": name
        }
    })
}
