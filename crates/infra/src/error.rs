use thiserror::Error;

use quotedesk_core::DomainError;

use crate::storage::StorageError;

/// Error surfaced by the write router and query service.
///
/// `Conflict` is the only business-rule failure; everything else is an
/// infrastructure pass-through, never retried here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The requested quoter does not exist (or a list came back empty).
    #[error("not found")]
    NotFound,

    /// Storage could not be reached or failed while reading.
    #[error("connection error: {0}")]
    Connection(String),

    /// Storage rejected a write.
    #[error("insertion error: {0}")]
    Insertion(String),

    /// The quoter is referenced by a sale and can no longer change.
    #[error("sale-related conflict: {0}")]
    Conflict(String),

    /// The event stream refused the message.
    #[error("publish error: {0}")]
    Publish(String),

    /// The search pattern is malformed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Input rejected before reaching storage.
    #[error("validation error: {0}")]
    Validation(String),
}

impl From<StorageError> for ServiceError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::NotFound => ServiceError::NotFound,
            StorageError::Connection(msg) => ServiceError::Connection(msg),
            StorageError::Insertion(msg) => ServiceError::Insertion(msg),
            StorageError::InvalidQuery(msg) => ServiceError::InvalidQuery(msg),
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Conflict(msg) => ServiceError::Conflict(msg),
            DomainError::InvalidId(msg) => ServiceError::Validation(msg),
        }
    }
}
