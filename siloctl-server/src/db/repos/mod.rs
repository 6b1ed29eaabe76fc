//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Single statement per operation, no check-then-insert
//! - Constraint violations surface as typed `DbError` variants
//! - Statement functions are generic over `Executor` so the batch
//!   engine can run them on its transaction

pub mod silobags;
pub mod users;

pub use silobags::{Silobag, SilobagRepo};
pub use users::{User, UserRepo};
