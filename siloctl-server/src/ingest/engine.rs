//! Transactional batch application
//!
//! One batch = one pooled connection = one transaction. Mutations run
//! sequentially on that connection; a later mutation may depend on an
//! earlier one (update after insert).

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::{debug, info, warn};

use super::{parse_batch, IngestError, Mutation};
use crate::db::repos::silobags;
use crate::db::DbError;

/// PostgreSQL transaction id of a committed batch
///
/// Read with `txid_current()` inside the batch transaction. Ids grow
/// with every transaction, so clients can use them as a sync cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TxId(pub i64);

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Batch mutation engine
pub struct IngestEngine<'a> {
    pool: &'a PgPool,
}

impl<'a> IngestEngine<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Parse an ingest body and apply it.
    ///
    /// Validation failures return before any connection is acquired.
    pub async fn ingest(&self, body: &Value) -> Result<TxId, IngestError> {
        let batch = parse_batch(body)?;
        self.apply(&batch).await
    }

    /// Apply `batch` atomically and return the transaction id.
    ///
    /// On any failure the transaction is rolled back and no mutation of
    /// the batch persists. The connection goes back to the pool on every
    /// path: dropping a `Transaction` releases it.
    pub async fn apply(&self, batch: &[Mutation]) -> Result<TxId, IngestError> {
        if batch.is_empty() {
            return Err(IngestError::MutationsRequired);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| IngestError::Transaction(e.into()))?;
        debug!(mutations = batch.len(), "batch transaction started");

        for (index, mutation) in batch.iter().enumerate() {
            let applied = apply_one(&mut tx, mutation).await;
            if let Err(source) = applied {
                warn!(index, op = mutation.op(), error = %source, "mutation failed, rolling back batch");
                rollback(tx).await;
                return Err(IngestError::Store { index, source });
            }
        }

        // Must be read before COMMIT so it names this transaction.
        let txid = current_txid(&mut tx).await;
        let txid = match txid {
            Ok(txid) => txid,
            Err(e) => {
                rollback(tx).await;
                return Err(IngestError::Transaction(e));
            }
        };

        tx.commit()
            .await
            .map_err(|e| IngestError::Transaction(e.into()))?;

        info!(%txid, mutations = batch.len(), "batch committed");
        Ok(txid)
    }
}

async fn apply_one(conn: &mut PgConnection, mutation: &Mutation) -> Result<(), DbError> {
    match mutation {
        Mutation::Insert { user_id, silobag } => {
            let row = silobags::insert(&mut *conn, *user_id, silobag).await?;
            debug!(id = row.id, user_id = row.user_id, "silobag inserted");
        }
        Mutation::Update { key, patch } => {
            let rows = silobags::update(&mut *conn, *key, patch).await?;
            debug!(id = key, rows, "silobag updated");
        }
        Mutation::Delete { key } => {
            let rows = silobags::delete(&mut *conn, *key).await?;
            debug!(id = key, rows, "silobag deleted");
        }
    }
    Ok(())
}

async fn current_txid(conn: &mut PgConnection) -> Result<TxId, DbError> {
    let txid: i64 = sqlx::query_scalar("SELECT txid_current()")
        .fetch_one(conn)
        .await?;
    Ok(TxId(txid))
}

async fn rollback(tx: Transaction<'static, Postgres>) {
    if let Err(e) = tx.rollback().await {
        warn!(error = %e, "rollback failed");
    }
}
