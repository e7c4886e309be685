use std::sync::RwLock;

use async_trait::async_trait;
use regex::{Regex, RegexBuilder};

use quotedesk_core::QuoterId;
use quotedesk_quoting::{Quoter, QuoterPatch, Sale};

use super::{QuoterFilter, QuoterStore, StorageError};

/// In-memory quoter/sale collections.
///
/// Intended for tests/dev. Records keep insertion order, which is the order
/// `find_quoters` returns them in.
#[derive(Debug, Default)]
pub struct InMemoryQuoterStore {
    quoters: RwLock<Vec<Quoter>>,
    sales: RwLock<Vec<Sale>>,
}

impl InMemoryQuoterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(collection: &str) -> StorageError {
    StorageError::Connection(format!("{collection} collection lock poisoned"))
}

fn compile(pattern: &str) -> Result<Regex, StorageError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .multi_line(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| StorageError::InvalidQuery(e.to_string()))
}

fn matches(filter: &QuoterFilter, re: Option<&Regex>, quoter: &Quoter) -> bool {
    let Some(re) = re else {
        return true;
    };
    match filter {
        QuoterFilter::All => true,
        QuoterFilter::NameMatches(_) => re.is_match(&quoter.name),
        QuoterFilter::DescriptionMatches(_) => re.is_match(&quoter.description),
        QuoterFilter::ServiceNameMatches(_) => quoter.services.iter().any(|s| re.is_match(&s.name)),
        QuoterFilter::ProductTitleMatches(_) => quoter.products.iter().any(|p| re.is_match(&p.title)),
    }
}

#[async_trait]
impl QuoterStore for InMemoryQuoterStore {
    async fn find_quoter(&self, id: QuoterId) -> Result<Quoter, StorageError> {
        let quoters = self.quoters.read().map_err(|_| poisoned("quoters"))?;
        quoters
            .iter()
            .find(|q| q.id == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn find_quoters(&self, filter: QuoterFilter, limit: usize) -> Result<Vec<Quoter>, StorageError> {
        let re = filter.pattern().map(compile).transpose()?;
        let quoters = self.quoters.read().map_err(|_| poisoned("quoters"))?;

        Ok(quoters
            .iter()
            .filter(|q| matches(&filter, re.as_ref(), q))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn insert_quoter(&self, quoter: Quoter) -> Result<Quoter, StorageError> {
        let mut quoters = self.quoters.write().map_err(|_| poisoned("quoters"))?;
        if quoters.iter().any(|q| q.id == quoter.id) {
            return Err(StorageError::Insertion(format!("duplicate quoter id {}", quoter.id)));
        }
        quoters.push(quoter.clone());
        Ok(quoter)
    }

    async fn update_quoter(&self, id: QuoterId, patch: &QuoterPatch) -> Result<(), StorageError> {
        let mut quoters = self.quoters.write().map_err(|_| poisoned("quoters"))?;
        if let Some(quoter) = quoters.iter_mut().find(|q| q.id == id) {
            patch.apply_to(quoter);
        }
        Ok(())
    }

    async fn insert_sale(&self, sale: Sale) -> Result<Sale, StorageError> {
        let mut sales = self.sales.write().map_err(|_| poisoned("sales"))?;
        if sales.iter().any(|s| s.id == sale.id) {
            return Err(StorageError::Insertion(format!("duplicate sale id {}", sale.id)));
        }
        sales.push(sale.clone());
        Ok(sale)
    }

    async fn find_sale_by_quoter(&self, quoter_id: QuoterId) -> Result<Option<Sale>, StorageError> {
        let sales = self.sales.read().map_err(|_| poisoned("sales"))?;
        Ok(sales.iter().find(|s| s.quoter_id == quoter_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::quoter_named;
    use chrono::Utc;

    #[tokio::test]
    async fn find_quoter_reports_not_found() {
        let store = InMemoryQuoterStore::new();
        let err = store.find_quoter(QuoterId::new()).await.unwrap_err();
        assert_eq!(err, StorageError::NotFound);
    }

    #[tokio::test]
    async fn insert_then_find_round_trips() {
        let store = InMemoryQuoterStore::new();
        let quoter = quoter_named("Kitchen remodel");

        store.insert_quoter(quoter.clone()).await.unwrap();

        assert_eq!(store.find_quoter(quoter.id).await.unwrap(), quoter);
    }

    #[tokio::test]
    async fn duplicate_ids_are_rejected() {
        let store = InMemoryQuoterStore::new();
        let quoter = quoter_named("Once");
        store.insert_quoter(quoter.clone()).await.unwrap();

        let err = store.insert_quoter(quoter).await.unwrap_err();
        assert!(matches!(err, StorageError::Insertion(_)));
    }

    #[tokio::test]
    async fn name_filter_is_case_insensitive_and_limited() {
        let store = InMemoryQuoterStore::new();
        for name in ["Solar Panels", "solar heater", "Roof repair"] {
            store.insert_quoter(quoter_named(name)).await.unwrap();
        }

        let all = store
            .find_quoters(QuoterFilter::NameMatches("SOLAR".into()), 10)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let limited = store
            .find_quoters(QuoterFilter::NameMatches("solar".into()), 1)
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].name, "Solar Panels");
    }

    #[tokio::test]
    async fn embedded_filters_look_inside_lines() {
        let store = InMemoryQuoterStore::new();
        let quoter = quoter_named("Anything");
        store.insert_quoter(quoter.clone()).await.unwrap();

        let by_service = store
            .find_quoters(QuoterFilter::ServiceNameMatches("mantenim".into()), 10)
            .await
            .unwrap();
        let by_product = store
            .find_quoters(QuoterFilter::ProductTitleMatches("access point".into()), 10)
            .await
            .unwrap();

        assert_eq!(by_service, vec![quoter.clone()]);
        assert_eq!(by_product, vec![quoter]);
    }

    #[tokio::test]
    async fn malformed_pattern_is_an_invalid_query() {
        let store = InMemoryQuoterStore::new();
        let err = store
            .find_quoters(QuoterFilter::NameMatches("(".into()), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn patterns_span_lines_and_anchor_per_line() {
        let store = InMemoryQuoterStore::new();
        let mut quoter = quoter_named("Multiline");
        quoter.description = "first line\nsecond".to_string();
        store.insert_quoter(quoter.clone()).await.unwrap();

        for pattern in ["line.second", "^second", "line$"] {
            let found = store
                .find_quoters(QuoterFilter::DescriptionMatches(pattern.into()), 10)
                .await
                .unwrap();
            assert_eq!(found, vec![quoter.clone()], "{pattern}");
        }
    }

    #[tokio::test]
    async fn patching_a_missing_quoter_is_a_no_op() {
        let store = InMemoryQuoterStore::new();
        let patch = QuoterPatch {
            total: Some(1.0),
            ..Default::default()
        };
        assert_eq!(store.update_quoter(QuoterId::new(), &patch).await, Ok(()));
    }

    #[tokio::test]
    async fn sale_lookup_distinguishes_sold_from_unsold() {
        let store = InMemoryQuoterStore::new();
        let sold = QuoterId::new();
        let sale = store.insert_sale(Sale::new(sold, Utc::now())).await.unwrap();

        assert_eq!(store.find_sale_by_quoter(sold).await.unwrap(), Some(sale));
        assert_eq!(store.find_sale_by_quoter(QuoterId::new()).await.unwrap(), None);
    }
}
