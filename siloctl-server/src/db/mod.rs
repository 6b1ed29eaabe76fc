//! Database layer - connection pool, error classification and repositories
//!
//! # Design Principles
//!
//! - One pool per process, built at startup and passed explicitly
//! - Rely on DB constraints (unique email, silobag → user FK), classify
//!   the violation instead of checking first
//! - Statement functions take any sqlx `Executor`, so the same SQL runs
//!   against the pool or inside a batch transaction

pub mod error;
pub mod pool;
pub mod repos;

pub use error::DbError;
pub use pool::{create_pool, DbConfig};
pub use repos::*;
