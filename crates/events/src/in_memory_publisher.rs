//! In-memory publisher for tests/dev.

use std::sync::{Mutex, mpsc};

use crate::message::OutboundMessage;
use crate::publisher::{EventPublisher, Subscription};

#[derive(Debug, thiserror::Error)]
pub enum InMemoryPublisherError {
    /// Publish failed due to internal lock poisoning.
    #[error("publisher lock poisoned")]
    Poisoned,
}

/// In-memory publisher.
///
/// - No IO / no async
/// - Keeps every published message (inspect with [`InMemoryPublisher::published`])
/// - Best-effort fan-out to subscribers
#[derive(Debug)]
pub struct InMemoryPublisher<M> {
    log: Mutex<Vec<M>>,
    subscribers: Mutex<Vec<mpsc::Sender<M>>>,
}

impl<M> InMemoryPublisher<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();

        // If the lock is poisoned, we still return a subscription;
        // it just won't receive messages until the process restarts.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}

impl<M: Clone> InMemoryPublisher<M> {
    /// Snapshot of everything published so far, in publish order.
    pub fn published(&self) -> Vec<M> {
        match self.log.lock() {
            Ok(log) => log.clone(),
            Err(_) => vec![],
        }
    }
}

impl<M> Default for InMemoryPublisher<M> {
    fn default() -> Self {
        Self {
            log: Mutex::new(Vec::new()),
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<M> EventPublisher<M> for InMemoryPublisher<M>
where
    M: OutboundMessage + Clone + 'static,
{
    type Error = InMemoryPublisherError;

    fn publish(&self, message: &M) -> Result<(), Self::Error> {
        self.log
            .lock()
            .map_err(|_| InMemoryPublisherError::Poisoned)?
            .push(message.clone());

        let mut subs = self
            .subscribers
            .lock()
            .map_err(|_| InMemoryPublisherError::Poisoned)?;

        // Drop any dead subscribers while publishing.
        subs.retain(|tx| tx.send(message.clone()).is_ok());

        tracing::debug!(message_type = message.message_type(), "published in-memory message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Ping(u32);

    impl OutboundMessage for Ping {
        fn message_type(&self) -> &'static str {
            "Ping"
        }
    }

    #[test]
    fn keeps_messages_in_publish_order() {
        let publisher = InMemoryPublisher::new();
        publisher.publish(&Ping(1)).unwrap();
        publisher.publish(&Ping(2)).unwrap();

        assert_eq!(publisher.published(), vec![Ping(1), Ping(2)]);
    }

    #[test]
    fn subscribers_receive_messages_published_after_subscribing() {
        let publisher = InMemoryPublisher::new();
        publisher.publish(&Ping(0)).unwrap();

        let sub = publisher.subscribe();
        publisher.publish(&Ping(7)).unwrap();

        assert_eq!(sub.try_recv().unwrap(), Ping(7));
        assert!(sub.try_recv().is_err());
    }

    #[test]
    fn dropped_subscribers_do_not_fail_publish() {
        let publisher = InMemoryPublisher::new();
        drop(publisher.subscribe());

        assert!(publisher.publish(&Ping(3)).is_ok());
    }
}
