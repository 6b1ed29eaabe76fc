//! Store error classification
//!
//! sqlx reports every server-side failure as `sqlx::Error::Database`.
//! Constraint violations the handlers care about are lifted into their
//! own variants here so route code never inspects SQLSTATE codes.

use sqlx::error::ErrorKind;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A unique constraint rejected the row (SQLSTATE 23505)
    #[error("{message}")]
    UniqueViolation {
        constraint: Option<String>,
        message: String,
    },

    /// A foreign key rejected the row (SQLSTATE 23503)
    #[error("{message}")]
    ForeignKeyViolation {
        constraint: Option<String>,
        message: String,
    },

    /// Anything else, including connection failures
    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl DbError {
    /// Underlying message, returned to clients as `detail`.
    pub fn detail(&self) -> String {
        match self {
            Self::UniqueViolation { message, .. } | Self::ForeignKeyViolation { message, .. } => {
                message.clone()
            }
            Self::Sqlx(sqlx::Error::Database(e)) => e.message().to_owned(),
            Self::Sqlx(e) => e.to_string(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        let sqlx::Error::Database(db) = &e else {
            return Self::Sqlx(e);
        };

        let constraint = db.constraint().map(str::to_owned);
        let message = db.message().to_owned();
        match db.kind() {
            ErrorKind::UniqueViolation => Self::UniqueViolation { constraint, message },
            ErrorKind::ForeignKeyViolation => Self::ForeignKeyViolation { constraint, message },
            _ => Self::Sqlx(e),
        }
    }
}
