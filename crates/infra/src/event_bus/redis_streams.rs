//! Redis Streams-backed publisher.
//!
//! Every message goes to one fixed stream key via `XADD`. Redis replies only
//! after the entry is appended, so a successful reply is the flush
//! confirmation.
//!
//! One connection is kept and reused; it is dropped after a failed command and
//! reopened on the next publish. The blocking round-trip runs under
//! `block_in_place` on multi-threaded runtimes so other tasks keep their worker.
//!
//! Consumption (consumer groups, acknowledgement, dead-lettering) belongs to
//! whoever reads the stream and is not handled here.
//!
//! ## Entry layout
//!
//! | Field | Value |
//! |-------|-------|
//! | `type` | message type tag (`Quoter`, `Sale`) |
//! | `payload` | UTF-8 JSON `{ "type": ..., "content": ... }` |

use std::sync::{Arc, Mutex};

use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::instrument;

use quotedesk_events::{EventPublisher, OutboundMessage};

use crate::config::DEFAULT_STREAM_KEY;

#[derive(Clone)]
pub struct RedisStreamsPublisher {
    client: Arc<redis::Client>,
    connection: Arc<Mutex<Option<redis::Connection>>>,
    stream_key: String,
}

impl std::fmt::Debug for RedisStreamsPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStreamsPublisher")
            .field("stream_key", &self.stream_key)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RedisStreamsError {
    #[error("Redis connection error: {0}")]
    Connection(String),

    #[error("Redis command error: {0}")]
    Command(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RedisStreamsPublisher {
    /// Create a new Redis Streams publisher.
    ///
    /// # Arguments
    ///
    /// * `redis_url` - Redis connection URL (e.g., "redis://localhost:6379")
    /// * `stream_key` - Redis stream key (default: "quotedesk:events")
    pub fn new(redis_url: impl AsRef<str>, stream_key: Option<String>) -> Result<Self, RedisStreamsError> {
        let client = redis::Client::open(redis_url.as_ref())
            .map_err(|e| RedisStreamsError::Connection(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            connection: Arc::new(Mutex::new(None)),
            stream_key: stream_key.unwrap_or_else(|| DEFAULT_STREAM_KEY.to_string()),
        })
    }

    pub fn stream_key(&self) -> &str {
        &self.stream_key
    }

    /// Round-trip a `PING` so misconfiguration surfaces at startup rather than
    /// on the first write.
    pub fn ping(&self) -> Result<(), RedisStreamsError> {
        let _: String = self.run(&redis::cmd("PING"), "PING")?;
        Ok(())
    }

    /// Run `cmd` on the shared connection, opening it first if needed.
    fn run<T: redis::FromRedisValue>(&self, cmd: &redis::Cmd, name: &str) -> Result<T, RedisStreamsError> {
        let query = || -> Result<T, RedisStreamsError> {
            let mut slot = self
                .connection
                .lock()
                .map_err(|_| RedisStreamsError::Connection("connection lock poisoned".to_string()))?;

            if slot.is_none() {
                let conn = self
                    .client
                    .get_connection()
                    .map_err(|e| RedisStreamsError::Connection(e.to_string()))?;
                *slot = Some(conn);
            }
            let Some(conn) = slot.as_mut() else {
                return Err(RedisStreamsError::Connection("no connection".to_string()));
            };

            cmd.query(conn).map_err(|e| {
                *slot = None;
                RedisStreamsError::Command(format!("{name} failed: {e}"))
            })
        };

        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(query)
            }
            _ => query(),
        }
    }
}

impl<M> EventPublisher<M> for RedisStreamsPublisher
where
    M: OutboundMessage,
{
    type Error = RedisStreamsError;

    #[instrument(
        skip(self, message),
        fields(stream_key = %self.stream_key, message_type = message.message_type()),
        err
    )]
    fn publish(&self, message: &M) -> Result<(), Self::Error> {
        let payload = serde_json::to_string(message)
            .map_err(|e| RedisStreamsError::Serialization(e.to_string()))?;

        let mut xadd = redis::cmd("XADD");
        xadd.arg(&self.stream_key)
            .arg("*") // Auto-generate entry ID
            .arg("type")
            .arg(message.message_type())
            .arg("payload")
            .arg(&payload);
        let entry_id: String = self.run(&xadd, "XADD")?;

        tracing::debug!(entry_id = %entry_id, "event appended to stream");
        Ok(())
    }
}
