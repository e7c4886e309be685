use serde::Serialize;

/// A record that can leave the process on the event stream.
///
/// The serialized form is the full wire payload; `message_type` is the same
/// discriminator, exposed so transports can index on it without re-parsing.
pub trait OutboundMessage: Serialize + Send + Sync {
    /// Stable type tag (e.g. `"Quoter"`).
    fn message_type(&self) -> &'static str;
}
