//! Document storage for quoters and sales.
//!
//! The [`QuoterStore`] trait is the only storage surface the rest of the
//! system sees. Two implementations exist:
//!
//! - [`InMemoryQuoterStore`] for dev/tests
//! - [`PostgresQuoterStore`] keeping each record as a JSONB document
//!
//! ## Error contract
//!
//! | Operation | Absent record | Transport failure |
//! |-----------|---------------|-------------------|
//! | `find_quoter` | `NotFound` | `Connection` |
//! | `find_quoters` | empty vec | `Connection` |
//! | `insert_quoter` / `update_quoter` / `insert_sale` | n/a | `Insertion` |
//! | `find_sale_by_quoter` | `Ok(None)` | `Connection` |
//!
//! `find_sale_by_quoter` deliberately returns `Option`: "no sale" is the
//! normal outcome of that lookup, never an error.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use quotedesk_core::QuoterId;
use quotedesk_quoting::{Quoter, QuoterPatch, Sale};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryQuoterStore;
pub use postgres::PostgresQuoterStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("record not found")]
    NotFound,

    #[error("storage connection error: {0}")]
    Connection(String),

    #[error("storage write rejected: {0}")]
    Insertion(String),

    /// The search pattern could not be compiled.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

/// Which quoters a lookup should return.
///
/// Patterns are case-insensitive regular expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoterFilter {
    All,
    NameMatches(String),
    DescriptionMatches(String),
    ServiceNameMatches(String),
    ProductTitleMatches(String),
}

impl QuoterFilter {
    pub fn pattern(&self) -> Option<&str> {
        match self {
            QuoterFilter::All => None,
            QuoterFilter::NameMatches(p)
            | QuoterFilter::DescriptionMatches(p)
            | QuoterFilter::ServiceNameMatches(p)
            | QuoterFilter::ProductTitleMatches(p) => Some(p),
        }
    }
}

#[async_trait]
pub trait QuoterStore: Send + Sync {
    async fn find_quoter(&self, id: QuoterId) -> Result<Quoter, StorageError>;

    /// At most `limit` quoters matching `filter`, in storage order.
    async fn find_quoters(&self, filter: QuoterFilter, limit: usize) -> Result<Vec<Quoter>, StorageError>;

    async fn insert_quoter(&self, quoter: Quoter) -> Result<Quoter, StorageError>;

    /// Merge the set fields of `patch` into the stored quoter.
    ///
    /// Patching an id that does not exist is a no-op.
    async fn update_quoter(&self, id: QuoterId, patch: &QuoterPatch) -> Result<(), StorageError>;

    async fn insert_sale(&self, sale: Sale) -> Result<Sale, StorageError>;

    async fn find_sale_by_quoter(&self, quoter_id: QuoterId) -> Result<Option<Sale>, StorageError>;
}

#[async_trait]
impl<S> QuoterStore for Arc<S>
where
    S: QuoterStore + ?Sized,
{
    async fn find_quoter(&self, id: QuoterId) -> Result<Quoter, StorageError> {
        (**self).find_quoter(id).await
    }

    async fn find_quoters(&self, filter: QuoterFilter, limit: usize) -> Result<Vec<Quoter>, StorageError> {
        (**self).find_quoters(filter, limit).await
    }

    async fn insert_quoter(&self, quoter: Quoter) -> Result<Quoter, StorageError> {
        (**self).insert_quoter(quoter).await
    }

    async fn update_quoter(&self, id: QuoterId, patch: &QuoterPatch) -> Result<(), StorageError> {
        (**self).update_quoter(id, patch).await
    }

    async fn insert_sale(&self, sale: Sale) -> Result<Sale, StorageError> {
        (**self).insert_sale(sale).await
    }

    async fn find_sale_by_quoter(&self, quoter_id: QuoterId) -> Result<Option<Sale>, StorageError> {
        (**self).find_sale_by_quoter(quoter_id).await
    }
}
