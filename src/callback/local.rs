use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use tracing::debug;

use super::DeathRecipient;
use super::Event;
use super::Subscriber;
use super::SubscriberId;
use crate::CallbackError;

static NEXT_LOCAL_ID: AtomicU64 = AtomicU64::new(1);

/// Fresh id for an in-process subscriber.
pub(crate) fn next_local_id() -> SubscriberId {
    NEXT_LOCAL_ID.fetch_add(1, Ordering::Relaxed)
}

/// In-process subscriber that forwards events into a channel.
///
/// The subscriber is alive until [`LocalSubscriber::disconnect`] is called
/// or its receiver is dropped.
pub struct LocalSubscriber {
    id: SubscriberId,
    sender: Sender<Event>,
    alive: AtomicBool,
    death: Mutex<Option<DeathRecipient>>,
}

impl LocalSubscriber {
    pub fn channel() -> (Arc<Self>, Receiver<Event>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let subscriber = Self {
            id: next_local_id(),
            sender,
            alive: AtomicBool::new(true),
            death: Mutex::new(None),
        };
        (Arc::new(subscriber), receiver)
    }

    /// Simulates the peer dying: fires the linked death recipient.
    pub fn disconnect(&self) {
        if !self.alive.swap(false, Ordering::AcqRel) {
            return;
        }
        let recipient = self.death.lock().take();
        if let Some(recipient) = recipient {
            debug!(id = self.id, "local subscriber disconnected");
            recipient();
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

impl Subscriber for LocalSubscriber {
    fn id(&self) -> SubscriberId {
        self.id
    }

    fn notify(
        &self,
        event: &Event,
    ) -> std::result::Result<(), CallbackError> {
        if !self.is_alive() {
            return Err(CallbackError::PeerDead);
        }
        self.sender.send(event.clone()).map_err(|_| CallbackError::PeerDead)
    }

    fn link_to_death(
        &self,
        recipient: DeathRecipient,
    ) -> std::result::Result<(), CallbackError> {
        if !self.is_alive() {
            return Err(CallbackError::PeerDead);
        }
        *self.death.lock() = Some(recipient);
        Ok(())
    }

    fn unlink_to_death(&self) {
        self.death.lock().take();
    }
}
