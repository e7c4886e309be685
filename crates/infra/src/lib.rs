//! Infrastructure layer: storage, event stream, config, and the write router.

pub mod config;
pub mod error;
pub mod event_bus;
pub mod queries;
pub mod storage;
pub mod write_router;

#[cfg(test)]
mod testing;

pub use config::{AppConfig, ConfigError};
pub use error::ServiceError;
pub use queries::QuoterQueries;
pub use storage::{InMemoryQuoterStore, PostgresQuoterStore, QuoterFilter, QuoterStore, StorageError};
pub use write_router::{WriteMode, WriteRouter};
