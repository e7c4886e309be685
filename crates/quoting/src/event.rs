use serde::{Deserialize, Serialize};

use quotedesk_events::OutboundMessage;

use crate::{Quoter, Sale};

/// Record handed to the event stream instead of being written to storage.
///
/// Wire format: `{ "type": "Quoter" | "Sale", "content": <record> }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content")]
pub enum OutboundEvent {
    Quoter(Quoter),
    Sale(Sale),
}

impl OutboundMessage for OutboundEvent {
    fn message_type(&self) -> &'static str {
        match self {
            OutboundEvent::Quoter(_) => "Quoter",
            OutboundEvent::Sale(_) => "Sale",
        }
    }
}
