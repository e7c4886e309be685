//! Infrastructure event publisher implementations.
//!
//! The publisher contract lives in `quotedesk-events` as pure mechanics.
//! This module provides broker-backed implementations (e.g. Redis).

#[cfg(feature = "redis")]
pub mod redis_streams;

#[cfg(feature = "redis")]
pub use redis_streams::{RedisStreamsError, RedisStreamsPublisher};
