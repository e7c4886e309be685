//! Quoting domain module.
//!
//! This crate contains the quoter and sale records plus the one business rule
//! tying them together, implemented purely as deterministic domain logic
//! (no IO, no HTTP, no storage).

pub mod event;
pub mod quoter;
pub mod sale;

pub use event::OutboundEvent;
pub use quoter::{Client, ProductLine, Quoter, QuoterPatch, ServiceLine};
pub use sale::{Sale, ensure_mutable};
