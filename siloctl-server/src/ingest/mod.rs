//! Batch ingest - all-or-nothing silobag mutations
//!
//! A batch is an ordered list of mutation descriptors:
//!
//! ```json
//! {"mutations": [
//!   {"op": "insert", "table": "silobags", "data": {"user_id": 1, "weight": 500, "size": "small", "species": "soy", "bagging_date": "2024-01-01"}},
//!   {"op": "update", "table": "silobags", "key": 1, "data": {"weight": 600}},
//!   {"op": "delete", "table": "silobags", "key": 2}
//! ]}
//! ```
//!
//! Processing happens in two phases:
//!
//! 1. [`parse_batch`] turns every descriptor into a typed [`Mutation`].
//!    The first malformed descriptor rejects the batch before a
//!    connection is taken from the pool.
//! 2. [`IngestEngine::apply`] runs the mutations in list order on one
//!    transaction, reads `txid_current()` before COMMIT and returns it.
//!    Any store error rolls the whole batch back.
//!
//! Updates and deletes that match no row are not errors.

pub mod engine;
pub mod error;
pub mod mutation;

pub use engine::{IngestEngine, TxId};
pub use error::IngestError;
pub use mutation::{parse_batch, Mutation, SILOBAGS_TABLE};
