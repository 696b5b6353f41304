//! Unified error type for the property tracker.
//!
//! Every fallible operation returns [`Result`]. Persistence failures convert from
//! [`DbErr`] automatically; the remaining variants are raised by the business rules
//! in [`crate::core`].

use rust_decimal::Decimal;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Generic persistence failure, surfaced without retry
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Input rejected before anything was written
    #[error("Validation error: {message}")]
    Validation {
        /// Which rule was broken
        message: String,
    },

    /// A money value broke its sign rule
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// A uniqueness rule would be violated
    #[error("Conflict: {message}")]
    Conflict {
        /// Which unique value clashed
        message: String,
    },

    /// Deletion blocked by a protect-on-delete relationship
    #[error("Cannot delete {entity} {id}: still referenced by {relation}")]
    StillReferenced {
        /// Record type being deleted
        entity: &'static str,
        /// Primary key of the record being deleted
        id: i64,
        /// The relationship that blocks the delete
        relation: &'static str,
    },

    /// Record lookup by primary key found nothing
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Record type looked up
        entity: &'static str,
        /// Primary key that was missing
        id: i64,
    },

    /// I/O failure (config files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Maps a write failure, turning unique-constraint violations into [`Error::Conflict`].
    ///
    /// Services check uniqueness before writing; this catches whatever slips past
    /// those checks so the caller still sees a conflict rather than a raw database error.
    pub(crate) fn from_write(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => Self::Conflict { message },
            _ => Self::Database(err),
        }
    }

    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_still_referenced_message_names_relation() {
        let err = Error::StillReferenced {
            entity: "LLC",
            id: 7,
            relation: "properties",
        };
        assert_eq!(
            err.to_string(),
            "Cannot delete LLC 7: still referenced by properties"
        );
    }

    #[test]
    fn test_from_write_passes_through_other_errors() {
        let err = Error::from_write(DbErr::Custom("boom".to_string()));
        assert!(matches!(err, Error::Database(DbErr::Custom(_))));
    }
}
