//! siloctl-server: HTTP service for users and silobags
//!
//! Single-record CRUD for users and their silobags, plus a batch
//! ingest endpoint that applies a list of silobag mutations inside one
//! PostgreSQL transaction and reports the transaction id.

pub mod db;
pub mod http;
pub mod ingest;
pub mod models;
