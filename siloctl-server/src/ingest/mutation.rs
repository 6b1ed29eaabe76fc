//! Mutation descriptor parsing
//!
//! Checks run in a fixed order per descriptor:
//! object → table → op → key/data → field rules.

use serde_json::{Map, Value};

use super::IngestError;
use crate::models::{as_integer, NewSilobag, SilobagPatch, UserId, ValidationError};

/// The only table a batch may touch
pub const SILOBAGS_TABLE: &str = "silobags";

/// One validated batch operation against `silobags`
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// New row; the store assigns the id
    Insert { user_id: UserId, silobag: NewSilobag },

    /// Partial update of allowlisted columns
    Update { key: i64, patch: SilobagPatch },

    /// Remove by id
    Delete { key: i64 },
}

impl Mutation {
    /// Parse one descriptor.
    pub fn parse(value: &Value) -> Result<Self, ValidationError> {
        let descriptor = value.as_object().ok_or(ValidationError::InvalidMutation)?;

        if descriptor.get("table").and_then(Value::as_str) != Some(SILOBAGS_TABLE) {
            return Err(ValidationError::UnsupportedTable);
        }

        match descriptor.get("op").and_then(Value::as_str) {
            Some("insert") => {
                let data = data(descriptor)?;
                Ok(Self::Insert {
                    user_id: UserId::from_json(data.get("user_id"))?,
                    silobag: NewSilobag::from_json(data)?,
                })
            }
            Some("update") => {
                let key = key(descriptor)?;
                let data = data(descriptor)?;
                Ok(Self::Update {
                    key,
                    patch: SilobagPatch::from_json(data)?,
                })
            }
            Some("delete") => Ok(Self::Delete {
                key: key(descriptor)?,
            }),
            _ => Err(ValidationError::UnsupportedOp),
        }
    }

    /// Operation name as it appears in descriptors.
    pub fn op(&self) -> &'static str {
        match self {
            Self::Insert { .. } => "insert",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }
}

/// Parse the `mutations` list of an ingest body.
///
/// # Example
/// ```
/// use serde_json::json;
/// use siloctl_server::ingest::{parse_batch, IngestError};
///
/// let body = json!({"mutations": [{"op": "delete", "table": "silobags", "key": 4}]});
/// assert_eq!(parse_batch(&body).unwrap().len(), 1);
///
/// let empty = json!({"mutations": []});
/// assert!(matches!(parse_batch(&empty), Err(IngestError::MutationsRequired)));
/// ```
pub fn parse_batch(body: &Value) -> Result<Vec<Mutation>, IngestError> {
    let list = match body.get("mutations") {
        Some(Value::Array(list)) if !list.is_empty() => list,
        _ => return Err(IngestError::MutationsRequired),
    };

    list.iter()
        .enumerate()
        .map(|(index, value)| {
            Mutation::parse(value).map_err(|reason| IngestError::Rejected { index, reason })
        })
        .collect()
}

fn key(descriptor: &Map<String, Value>) -> Result<i64, ValidationError> {
    descriptor
        .get("key")
        .and_then(as_integer)
        .ok_or(ValidationError::KeyRequired)
}

fn data(descriptor: &Map<String, Value>) -> Result<&Map<String, Value>, ValidationError> {
    descriptor
        .get("data")
        .and_then(Value::as_object)
        .ok_or(ValidationError::DataRequired)
}
