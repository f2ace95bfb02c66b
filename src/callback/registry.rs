use std::panic::catch_unwind;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Weak;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::Event;
use super::Subscriber;
use super::SubscriberId;
use crate::metrics::BROADCAST_FAILURES;
use crate::metrics::REGISTERED_CALLBACKS;
use crate::CallbackError;

/// Delivery counts of a single broadcast.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub pruned: usize,
}

/// Death-aware set of subscribers.
///
/// Cloning yields another handle to the same set.
#[derive(Clone, Default)]
pub struct CallbackRegistry {
    inner: Arc<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    subscribers: DashMap<SubscriberId, Arc<dyn Subscriber>>,
    closed: AtomicBool,
}

impl RegistryInner {
    fn forget(
        &self,
        id: SubscriberId,
    ) -> Option<Arc<dyn Subscriber>> {
        let removed = self.subscribers.remove(&id).map(|(_, s)| s);
        if removed.is_some() {
            REGISTERED_CALLBACKS.dec();
        }
        removed
    }
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `subscriber` and links a death recipient that forgets it.
    ///
    /// Returns `Ok(false)` when the subscriber is already registered.
    pub fn register(
        &self,
        subscriber: Arc<dyn Subscriber>,
    ) -> std::result::Result<bool, CallbackError> {
        if self.is_closed() {
            return Err(CallbackError::RegistryClosed);
        }
        let id = subscriber.id();
        match self.inner.subscribers.entry(id) {
            Entry::Occupied(_) => return Ok(false),
            Entry::Vacant(vacant) => {
                vacant.insert(subscriber.clone());
                REGISTERED_CALLBACKS.inc();
            }
        }

        // Linked outside the map lock: a recipient firing concurrently must
        // be able to remove the entry.
        let died = Arc::new(AtomicBool::new(false));
        let registry: Weak<RegistryInner> = Arc::downgrade(&self.inner);
        let recipient_died = died.clone();
        let linked = subscriber.link_to_death(Box::new(move || {
            recipient_died.store(true, Ordering::Release);
            if let Some(inner) = registry.upgrade() {
                if inner.forget(id).is_some() {
                    info!(id, "subscriber died, removed from registry");
                }
            }
        }));
        if let Err(e) = linked {
            self.inner.forget(id);
            return Err(e);
        }
        if died.load(Ordering::Acquire) {
            // Died while linking
            self.inner.forget(id);
            return Err(CallbackError::PeerDead);
        }

        if self.is_closed() {
            // Lost a race with kill_all
            if let Some(s) = self.inner.forget(id) {
                s.unlink_to_death();
            }
            return Err(CallbackError::RegistryClosed);
        }
        Ok(true)
    }

    /// Returns whether the subscriber was registered.
    pub fn unregister(
        &self,
        id: SubscriberId,
    ) -> bool {
        match self.inner.forget(id) {
            Some(subscriber) => {
                subscriber.unlink_to_death();
                true
            }
            None => false,
        }
    }

    /// Delivers `event` to a snapshot of the current subscribers.
    ///
    /// Subscribers whose delivery fails or panics are unregistered; the
    /// remaining subscribers still receive the event.
    pub fn broadcast(
        &self,
        event: &Event,
    ) -> BroadcastReport {
        let snapshot: Vec<Arc<dyn Subscriber>> = self
            .inner
            .subscribers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        let mut report = BroadcastReport::default();
        for subscriber in snapshot {
            let outcome = catch_unwind(AssertUnwindSafe(|| subscriber.notify(event)));
            match outcome {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(e)) => {
                    warn!(id = subscriber.id(), event = event.name(), "delivery failed: {}", e);
                    self.prune(subscriber.id(), &mut report);
                }
                Err(_) => {
                    warn!(id = subscriber.id(), event = event.name(), "subscriber panicked during delivery");
                    self.prune(subscriber.id(), &mut report);
                }
            }
        }
        debug!(event = event.name(), ?report, "broadcast finished");
        report
    }

    fn prune(
        &self,
        id: SubscriberId,
        report: &mut BroadcastReport,
    ) {
        BROADCAST_FAILURES.inc();
        if self.unregister(id) {
            report.pruned += 1;
        }
    }

    pub fn count(&self) -> usize {
        self.inner.subscribers.len()
    }

    pub fn contains(
        &self,
        id: SubscriberId,
    ) -> bool {
        self.inner.subscribers.contains_key(&id)
    }

    /// Drops every subscriber and refuses further registrations.
    /// Returns the number dropped.
    pub fn kill_all(&self) -> usize {
        self.inner.closed.store(true, Ordering::SeqCst);
        let ids: Vec<SubscriberId> = self.inner.subscribers.iter().map(|e| *e.key()).collect();
        ids.into_iter().filter(|id| self.unregister(*id)).count()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("count", &self.count())
            .field("closed", &self.is_closed())
            .finish()
    }
}
