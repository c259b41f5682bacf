//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("Unknown record kind: {0}")]
    UnknownRecordKind(String),

    #[error("Invalid output format: {0}")]
    InvalidOutputFormat(String),
}
