//! Outbound event publishing (mechanics only).
//!
//! Domain crates define *what* gets published; infrastructure crates define
//! *where* it goes. This crate only holds the contract between the two plus an
//! in-memory implementation for dev/tests.

pub mod in_memory_publisher;
pub mod message;
pub mod publisher;

pub use in_memory_publisher::{InMemoryPublisher, InMemoryPublisherError};
pub use message::OutboundMessage;
pub use publisher::{EventPublisher, Subscription};
