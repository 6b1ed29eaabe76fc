//! API error types with IntoResponse
//!
//! Errors are converted to `{"error": <code>, "detail"?: <message>}`
//! bodies with the matching status code. Store errors are translated
//! here or in the handler that knows which constraint means what.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::DbError;
use crate::ingest::IngestError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Input failed validation (400)
    Validation {
        error: ValidationError,
        detail: Option<String>,
    },

    /// Body is not JSON or lacks a JSON content type (400)
    InvalidBody { detail: String },

    /// Referenced row does not exist (404)
    NotFound { code: &'static str },

    /// Unique constraint hit (409)
    Conflict { code: &'static str },

    /// Unclassified store failure (500, logged)
    Database(DbError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code for the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { error, .. } => error.code(),
            Self::InvalidBody { .. } => "invalid_json",
            Self::NotFound { code } | Self::Conflict { code } => *code,
            Self::Database(_) => "db_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.code();
        let detail = match self {
            Self::Validation { detail, .. } => detail,
            Self::InvalidBody { detail } => Some(detail),
            Self::NotFound { .. } | Self::Conflict { .. } => None,
            Self::Database(e) => {
                tracing::error!("Database error: {}", e);
                Some(e.detail())
            }
        };

        (status, Json(ErrorBody { error, detail })).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self::Validation {
            error,
            detail: None,
        }
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        Self::Database(e)
    }
}

impl From<IngestError> for ApiError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::MutationsRequired => ValidationError::MutationsRequired.into(),
            IngestError::Rejected { index, reason } => Self::Validation {
                error: reason,
                detail: Some(format!("mutation {}: {}", index, reason)),
            },
            IngestError::Store { index, source } => {
                tracing::warn!(index, "batch rolled back");
                Self::Database(source)
            }
            IngestError::Transaction(source) => Self::Database(source),
        }
    }
}
