use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quotedesk_core::{DomainError, DomainResult, QuoterId, SaleId};

/// A finalized quoter.
///
/// Once a sale references a quoter, that quoter no longer accepts updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: SaleId,
    pub date: DateTime<Utc>,
    pub quoter_id: QuoterId,
}

impl Sale {
    /// Build a new sale for `quoter_id`, stamped at `date`.
    pub fn new(quoter_id: QuoterId, date: DateTime<Utc>) -> Self {
        Self {
            id: SaleId::new(),
            date,
            quoter_id,
        }
    }
}

/// A quoter referenced by a sale is frozen.
///
/// `sale` is the result of the sale lookup for `quoter_id`: `None` means no
/// sale exists and the quoter may still change.
pub fn ensure_mutable(quoter_id: QuoterId, sale: Option<&Sale>) -> DomainResult<()> {
    match sale {
        None => Ok(()),
        Some(sale) => Err(DomainError::conflict(format!(
            "quoter {quoter_id} is referenced by sale {}",
            sale.id
        ))),
    }
}
