//! Test doubles shared by the infra unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use quotedesk_core::{LineId, QuoterId};
use quotedesk_events::EventPublisher;
use quotedesk_quoting::{Client, OutboundEvent, ProductLine, Quoter, QuoterPatch, Sale, ServiceLine};

use crate::storage::{InMemoryQuoterStore, QuoterFilter, QuoterStore, StorageError};

pub(crate) fn quoter_named(name: &str) -> Quoter {
    Quoter {
        id: QuoterId::new(),
        name: name.to_string(),
        date: Utc.with_ymd_and_hms(2024, 5, 10, 9, 30, 0).unwrap(),
        subtotal: 1000.0,
        iva: 160.0,
        total: 1160.0,
        percentage_in_advance_pay: 50.0,
        revenue_percentage: 25.0,
        first_pay: 580.0,
        second_pay: 580.0,
        description: format!("{name} description"),
        client: Client {
            id: LineId::new(),
            name: "ACME".to_string(),
            location: "Guadalajara".to_string(),
            email: "buyer@acme.test".to_string(),
            phone_number: 3312345678,
        },
        services: vec![ServiceLine {
            id: LineId::new(),
            name: "Mantenimiento".to_string(),
            description: "Mantenimiento preventivo".to_string(),
            client_price: 522.0,
            real_price: 200.0,
        }],
        products: vec![ProductLine {
            id: LineId::new(),
            title: "Access point".to_string(),
            list_price: 120.0,
            discount_price: 99.0,
            image: "ap.png".to_string(),
            stock_number: 3,
            brand: "Ubiquiti".to_string(),
            product_id: 4411,
            model: "U6-Lite".to_string(),
            sat_key: 43222600,
            weight: 0.3,
        }],
    }
}

/// In-memory store that records every write call made through the
/// [`QuoterStore`] trait. Seeding bypasses the counters.
#[derive(Default)]
pub(crate) struct RecordingStore {
    inner: InMemoryQuoterStore,
    quoter_inserts: AtomicUsize,
    sale_inserts: AtomicUsize,
    updates: Mutex<Vec<(QuoterId, QuoterPatch)>>,
    fail_sale_lookup: bool,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Sale lookups fail as if the database were unreachable.
    pub(crate) fn failing_sale_lookup() -> Self {
        Self {
            fail_sale_lookup: true,
            ..Self::default()
        }
    }

    pub(crate) async fn seed_quoter(&self, quoter: Quoter) {
        self.inner.insert_quoter(quoter).await.unwrap();
    }

    pub(crate) async fn seed_sale(&self, sale: Sale) {
        self.inner.insert_sale(sale).await.unwrap();
    }

    pub(crate) fn quoter_inserts(&self) -> usize {
        self.quoter_inserts.load(Ordering::SeqCst)
    }

    pub(crate) fn sale_inserts(&self) -> usize {
        self.sale_inserts.load(Ordering::SeqCst)
    }

    pub(crate) fn updates(&self) -> Vec<(QuoterId, QuoterPatch)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuoterStore for RecordingStore {
    async fn find_quoter(&self, id: QuoterId) -> Result<Quoter, StorageError> {
        self.inner.find_quoter(id).await
    }

    async fn find_quoters(&self, filter: QuoterFilter, limit: usize) -> Result<Vec<Quoter>, StorageError> {
        self.inner.find_quoters(filter, limit).await
    }

    async fn insert_quoter(&self, quoter: Quoter) -> Result<Quoter, StorageError> {
        self.quoter_inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_quoter(quoter).await
    }

    async fn update_quoter(&self, id: QuoterId, patch: &QuoterPatch) -> Result<(), StorageError> {
        self.updates.lock().unwrap().push((id, patch.clone()));
        self.inner.update_quoter(id, patch).await
    }

    async fn insert_sale(&self, sale: Sale) -> Result<Sale, StorageError> {
        self.sale_inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_sale(sale).await
    }

    async fn find_sale_by_quoter(&self, quoter_id: QuoterId) -> Result<Option<Sale>, StorageError> {
        if self.fail_sale_lookup {
            return Err(StorageError::Connection("sales collection unreachable".to_string()));
        }
        self.inner.find_sale_by_quoter(quoter_id).await
    }
}

#[derive(Debug, thiserror::Error)]
#[error("broker unavailable")]
pub(crate) struct BrokerDown;

/// Publisher whose broker is always down.
pub(crate) struct FailingPublisher;

impl EventPublisher<OutboundEvent> for FailingPublisher {
    type Error = BrokerDown;

    fn publish(&self, _message: &OutboundEvent) -> Result<(), Self::Error> {
        Err(BrokerDown)
    }
}
