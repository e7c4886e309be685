//! Write routing: apply a mutation to storage, or publish it instead.
//!
//! The choice between the two is made **once**, when the router is built from
//! a [`WriteMode`]. Each operation then delegates to the selected
//! [`WriteStrategy`] without re-checking the mode:
//!
//! ```text
//! Request handler
//!   ↓
//! WriteRouter ── sale check (updates only, both modes)
//!   ↓
//! ├─ DirectWrites    → QuoterStore (insert / update + re-read)
//! └─ StreamedWrites  → EventPublisher (Quoter / Sale event)
//! ```
//!
//! ## Quoter immutability
//!
//! Before any update path runs, the router asks storage whether a sale
//! references the quoter. A sale means `ServiceError::Conflict`: no write, no
//! publish. "No sale" is `Ok(None)` from the store, never an error, so a
//! failing lookup can only mean storage trouble and surfaces as
//! `ServiceError::Connection`.
//!
//! ## Streaming acknowledgements
//!
//! In streaming mode the returned record is the payload that was published.
//! It is an acknowledgement, not a confirmation that anything was persisted;
//! the router never reads back what it published.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use quotedesk_core::QuoterId;
use quotedesk_events::EventPublisher;
use quotedesk_quoting::{OutboundEvent, Quoter, QuoterPatch, Sale, ensure_mutable};

use crate::error::ServiceError;
use crate::storage::QuoterStore;

/// Where mutating operations go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Apply synchronously to storage.
    Direct,
    /// Publish as events for out-of-band consumption.
    Streaming,
}

impl WriteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteMode::Direct => "direct",
            WriteMode::Streaming => "streaming",
        }
    }
}

/// One way of carrying out the mutating operations.
#[async_trait]
trait WriteStrategy: Send + Sync {
    async fn insert_quoter(&self, quoter: Quoter) -> Result<Quoter, ServiceError>;

    /// Only called once the quoter is known to have no sale.
    async fn update_quoter(&self, id: QuoterId, patch: &QuoterPatch) -> Result<Quoter, ServiceError>;

    async fn create_sale(&self, sale: Sale) -> Result<Sale, ServiceError>;
}

struct DirectWrites<S> {
    store: S,
}

#[async_trait]
impl<S: QuoterStore> WriteStrategy for DirectWrites<S> {
    async fn insert_quoter(&self, quoter: Quoter) -> Result<Quoter, ServiceError> {
        Ok(self.store.insert_quoter(quoter).await?)
    }

    async fn update_quoter(&self, id: QuoterId, patch: &QuoterPatch) -> Result<Quoter, ServiceError> {
        self.store.update_quoter(id, patch).await?;
        Ok(self.store.find_quoter(id).await?)
    }

    async fn create_sale(&self, sale: Sale) -> Result<Sale, ServiceError> {
        Ok(self.store.insert_sale(sale).await?)
    }
}

struct StreamedWrites<S, P> {
    store: S,
    publisher: P,
}

impl<S, P> StreamedWrites<S, P>
where
    P: EventPublisher<OutboundEvent>,
{
    fn publish(&self, event: &OutboundEvent) -> Result<(), ServiceError> {
        self.publisher.publish(event).map_err(|e| {
            warn!(error = %e, "event publish failed");
            ServiceError::Publish(e.to_string())
        })
    }
}

#[async_trait]
impl<S, P> WriteStrategy for StreamedWrites<S, P>
where
    S: QuoterStore,
    P: EventPublisher<OutboundEvent>,
{
    async fn insert_quoter(&self, quoter: Quoter) -> Result<Quoter, ServiceError> {
        self.publish(&OutboundEvent::Quoter(quoter.clone()))?;
        Ok(quoter)
    }

    async fn update_quoter(&self, id: QuoterId, patch: &QuoterPatch) -> Result<Quoter, ServiceError> {
        let merged = self.store.find_quoter(id).await?.patched(patch);
        self.publish(&OutboundEvent::Quoter(merged.clone()))?;
        Ok(merged)
    }

    async fn create_sale(&self, sale: Sale) -> Result<Sale, ServiceError> {
        self.publish(&OutboundEvent::Sale(sale.clone()))?;
        Ok(sale)
    }
}

/// Entry point for every mutating operation.
pub struct WriteRouter<S> {
    store: S,
    mode: WriteMode,
    strategy: Box<dyn WriteStrategy>,
}

impl<S> WriteRouter<S>
where
    S: QuoterStore + Clone + 'static,
{
    /// Build a router whose writes follow `mode`.
    ///
    /// `publisher` is only used in [`WriteMode::Streaming`].
    pub fn new<P>(mode: WriteMode, store: S, publisher: P) -> Self
    where
        P: EventPublisher<OutboundEvent> + 'static,
    {
        let strategy: Box<dyn WriteStrategy> = match mode {
            WriteMode::Direct => Box::new(DirectWrites { store: store.clone() }),
            WriteMode::Streaming => Box::new(StreamedWrites {
                store: store.clone(),
                publisher,
            }),
        };
        Self { store, mode, strategy }
    }

    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    pub async fn insert_quoter(&self, quoter: Quoter) -> Result<Quoter, ServiceError> {
        info!(mode = self.mode.as_str(), quoter_id = %quoter.id, "inserting quoter");
        self.strategy.insert_quoter(quoter).await
    }

    pub async fn update_quoter(&self, id: QuoterId, patch: QuoterPatch) -> Result<Quoter, ServiceError> {
        let sale = self
            .store
            .find_sale_by_quoter(id)
            .await
            .map_err(|e| ServiceError::Connection(e.to_string()))?;

        if let Err(e) = ensure_mutable(id, sale.as_ref()) {
            info!(quoter_id = %id, "update refused: quoter already sold");
            return Err(e.into());
        }

        info!(mode = self.mode.as_str(), quoter_id = %id, "updating quoter");
        self.strategy.update_quoter(id, &patch).await
    }

    /// Record a sale for `quoter_id`, stamped now.
    ///
    /// Whether the quoter exists is not checked here.
    pub async fn create_sale(&self, quoter_id: QuoterId) -> Result<Sale, ServiceError> {
        let sale = Sale::new(quoter_id, Utc::now());
        info!(mode = self.mode.as_str(), sale_id = %sale.id, quoter_id = %quoter_id, "creating sale");
        self.strategy.create_sale(sale).await
    }
}
