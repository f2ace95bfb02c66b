//! Subscriber registry and ordered event delivery.
//!
//! A [`Subscriber`] is a remote (or in-process) peer that wants service
//! notifications. Peers can die at any time; the registry links a death
//! recipient to each one and forgets it when the recipient fires or when a
//! delivery to it fails.
mod dispatcher;
mod event;
mod local;
mod registry;

pub use dispatcher::*;
pub use event::*;
pub use local::*;
pub use registry::*;


#[cfg(test)]
use mockall::automock;

use crate::CallbackError;

/// Stable identity of a subscriber across calls.
pub type SubscriberId = u64;

/// Invoked at most once when the subscriber's peer dies.
pub type DeathRecipient = Box<dyn FnOnce() + Send + 'static>;

#[cfg_attr(test, automock)]
pub trait Subscriber: Send + Sync + 'static {
    /// Two handles with the same id are the same subscriber.
    fn id(&self) -> SubscriberId;

    fn notify(
        &self,
        event: &Event,
    ) -> std::result::Result<(), CallbackError>;

    /// Must fail with [`CallbackError::PeerDead`] rather than invoke
    /// `recipient` when the peer is already dead.
    fn link_to_death(
        &self,
        recipient: DeathRecipient,
    ) -> std::result::Result<(), CallbackError>;

    fn unlink_to_death(&self);
}
