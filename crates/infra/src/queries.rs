//! Read side: fetch, list, and content search over quoters.

use tracing::debug;

use quotedesk_core::QuoterId;
use quotedesk_quoting::Quoter;

use crate::error::ServiceError;
use crate::storage::{QuoterFilter, QuoterStore};

pub struct QuoterQueries<S> {
    store: S,
    max_search_elements: usize,
}

impl<S: QuoterStore> QuoterQueries<S> {
    pub fn new(store: S, max_search_elements: usize) -> Self {
        Self {
            store,
            max_search_elements,
        }
    }

    pub async fn get(&self, id: QuoterId) -> Result<Quoter, ServiceError> {
        Ok(self.store.find_quoter(id).await?)
    }

    /// Every quoter, up to the search bound. An empty collection is `NotFound`.
    pub async fn list_all(&self) -> Result<Vec<Quoter>, ServiceError> {
        let quoters = self
            .store
            .find_quoters(QuoterFilter::All, self.max_search_elements)
            .await?;
        if quoters.is_empty() {
            return Err(ServiceError::NotFound);
        }
        Ok(quoters)
    }

    /// Quoters whose name, description, service names or product titles match
    /// `content`.
    ///
    /// The four lookups run concurrently; results are concatenated in that
    /// order and not deduplicated, so a quoter matching twice appears twice.
    /// An empty result is not an error.
    pub async fn search_by_content(&self, content: &str) -> Result<Vec<Quoter>, ServiceError> {
        let limit = self.max_search_elements;
        let (by_name, by_description, by_service, by_product) = tokio::try_join!(
            self.store.find_quoters(QuoterFilter::NameMatches(content.to_string()), limit),
            self.store.find_quoters(QuoterFilter::DescriptionMatches(content.to_string()), limit),
            self.store.find_quoters(QuoterFilter::ServiceNameMatches(content.to_string()), limit),
            self.store.find_quoters(QuoterFilter::ProductTitleMatches(content.to_string()), limit),
        )?;

        debug!(
            content,
            name = by_name.len(),
            description = by_description.len(),
            service = by_service.len(),
            product = by_product.len(),
            "content search matches"
        );

        Ok([by_name, by_description, by_service, by_product].concat())
    }
}
