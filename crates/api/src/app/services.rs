use std::sync::Arc;

use quotedesk_events::{EventPublisher, InMemoryPublisher};
use quotedesk_infra::event_bus::{RedisStreamsError, RedisStreamsPublisher};
use quotedesk_infra::{
    AppConfig, InMemoryQuoterStore, PostgresQuoterStore, QuoterQueries, QuoterStore, StorageError, WriteRouter,
};
use quotedesk_quoting::OutboundEvent;

/// Storage shared by the write router and the read side.
pub type SharedStore = Arc<dyn QuoterStore>;

/// Application services used by HTTP handlers.
pub struct AppServices {
    pub writes: WriteRouter<SharedStore>,
    pub queries: QuoterQueries<SharedStore>,
}

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("storage unavailable: {0}")]
    Storage(#[from] StorageError),

    #[error("event stream unavailable: {0}")]
    Stream(#[from] RedisStreamsError),
}

impl AppServices {
    pub fn new<P>(config: &AppConfig, store: SharedStore, publisher: P) -> Self
    where
        P: EventPublisher<OutboundEvent> + 'static,
    {
        Self {
            writes: WriteRouter::new(config.write_mode(), store.clone(), publisher),
            queries: QuoterQueries::new(store, config.max_search_elements),
        }
    }
}

/// Wire storage and the event stream from `config`.
///
/// - `DATABASE_URL` set: Postgres (schema created on startup), otherwise in-memory
/// - streaming mode: Redis Streams, pinged once so a bad URL fails fast
pub async fn build_services(config: &AppConfig) -> Result<AppServices, BootstrapError> {
    let store: SharedStore = match &config.database_url {
        Some(url) => {
            let postgres = PostgresQuoterStore::connect(url).await?;
            postgres.ensure_schema().await?;
            tracing::info!("using postgres quoter store");
            Arc::new(postgres)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; quoters are kept in memory only");
            Arc::new(InMemoryQuoterStore::new())
        }
    };

    if config.stream_consume {
        let publisher = RedisStreamsPublisher::new(&config.redis_url, Some(config.stream_key.clone()))?;
        publisher.ping()?;
        tracing::info!(stream_key = publisher.stream_key(), "publishing writes to redis stream");
        Ok(AppServices::new(config, store, publisher))
    } else {
        Ok(AppServices::new(config, store, InMemoryPublisher::<OutboundEvent>::new()))
    }
}
