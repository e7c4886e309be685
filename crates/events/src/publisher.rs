//! Event publishing abstraction.
//!
//! A publisher hands a message to exactly one fixed destination and returns
//! once the transport has confirmed it took the message (the "flush"). There is
//! no retry and no partial-failure handling here: a failed publish is returned
//! to the caller as-is.
//!
//! Publishing is fire-and-forget from the domain's point of view. Nothing in
//! this process reads back what it published, and there is no ordering
//! guarantee relative to direct storage writes made by other requests.

use std::sync::Arc;
use std::sync::mpsc::Receiver;

/// A subscription to published messages.
///
/// Each subscription gets a copy of every message published after it was
/// created (broadcast semantics). Only in-process publishers hand these out;
/// broker-backed publishers are consumed out of band.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }
}

/// Transport-agnostic publisher.
///
/// `publish` is synchronous: it blocks until the underlying client confirms
/// the message is buffered. Implementations must be safe to share across
/// threads; concurrent requests publish through the same instance.
pub trait EventPublisher<M>: Send + Sync {
    type Error: core::fmt::Debug + core::fmt::Display + Send + Sync + 'static;

    fn publish(&self, message: &M) -> Result<(), Self::Error>;
}

impl<M, P> EventPublisher<M> for Arc<P>
where
    P: EventPublisher<M> + ?Sized,
{
    type Error = P::Error;

    fn publish(&self, message: &M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }
}
