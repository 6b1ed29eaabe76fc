//! Batch ingest errors

use crate::db::DbError;
use crate::models::ValidationError;

/// Why a batch was not committed
///
/// `index` is the zero-based position of the offending descriptor.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Missing, non-list or empty `mutations`
    #[error("mutations must be a non-empty list")]
    MutationsRequired,

    /// A descriptor failed validation; nothing reached the store
    #[error("mutation {index}: {reason}")]
    Rejected {
        index: usize,
        reason: ValidationError,
    },

    /// The store refused a mutation; the transaction was rolled back
    #[error("mutation {index}: {source}")]
    Store {
        index: usize,
        #[source]
        source: DbError,
    },

    /// BEGIN, txid read or COMMIT failed
    #[error("transaction failed: {0}")]
    Transaction(#[source] DbError),
}

impl IngestError {
    /// Validation code for client errors, `None` for store failures.
    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            Self::MutationsRequired => Some(ValidationError::MutationsRequired),
            Self::Rejected { reason, .. } => Some(*reason),
            Self::Store { .. } | Self::Transaction(_) => None,
        }
    }
}
