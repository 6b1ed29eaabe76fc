//! Command implementations for siloctl CLI

pub mod serve;

pub use serve::run_serve;
