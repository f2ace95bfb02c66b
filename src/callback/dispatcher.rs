use std::collections::VecDeque;
use std::thread;
use std::thread::ThreadId;

use parking_lot::Condvar;
use parking_lot::Mutex;
use parking_lot::MutexGuard;

use super::CallbackRegistry;
use super::Event;

/// Position of an event in the outbox. Tickets start at 1 and grow by one
/// per enqueued event.
pub type Ticket = u64;

/// Ordered outbox in front of the registry.
///
/// Producers enqueue events inside the critical section that made the state
/// change visible, so queue order matches the order of the changes. Each
/// flushing caller delivers at most up to its own ticket, with no lock held,
/// and waits while another thread delivers earlier tickets. A subscriber
/// that calls back into the service from `notify` only enqueues; the
/// running delivery picks its events up after the current one.
#[derive(Debug)]
pub struct EventDispatcher {
    registry: CallbackRegistry,
    outbox: Mutex<Outbox>,
    progress: Condvar,
}

#[derive(Debug)]
struct Outbox {
    queue: VecDeque<(Ticket, Event)>,
    next_ticket: Ticket,
    delivered: Ticket,
    drainer: Option<ThreadId>,
    drain_to: Ticket,
}

impl Default for Outbox {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            next_ticket: 1,
            delivered: 0,
            drainer: None,
            drain_to: 0,
        }
    }
}

impl EventDispatcher {
    pub fn new(registry: CallbackRegistry) -> Self {
        Self {
            registry,
            outbox: Mutex::new(Outbox::default()),
            progress: Condvar::new(),
        }
    }

    /// Queues `event` without delivering it. Safe to call under other locks.
    pub fn enqueue(
        &self,
        event: Event,
    ) -> Ticket {
        let mut outbox = self.outbox.lock();
        let ticket = outbox.next_ticket;
        outbox.next_ticket += 1;
        outbox.queue.push_back((ticket, event));
        ticket
    }

    /// Returns once everything queued so far has been delivered.
    pub fn flush(&self) {
        let outbox = self.outbox.lock();
        let target = outbox.next_ticket - 1;
        self.deliver_through(outbox, target);
    }

    /// Returns once `event` and everything queued before it have been
    /// delivered.
    pub fn publish(
        &self,
        event: Event,
    ) {
        let ticket = self.enqueue(event);
        self.flush_through(ticket);
    }

    /// Returns once `ticket` has been delivered.
    ///
    /// Called from inside a `notify` on the delivering thread, it returns
    /// immediately and the ongoing delivery is extended to `ticket`.
    pub fn flush_through(
        &self,
        ticket: Ticket,
    ) {
        let outbox = self.outbox.lock();
        self.deliver_through(outbox, ticket);
    }

    pub fn pending(&self) -> usize {
        self.outbox.lock().queue.len()
    }

    /// Whether the current thread is running a delivery, i.e. is inside
    /// some subscriber's `notify`.
    pub fn is_delivering(&self) -> bool {
        self.outbox.lock().drainer == Some(thread::current().id())
    }

    fn deliver_through(
        &self,
        mut outbox: MutexGuard<'_, Outbox>,
        ticket: Ticket,
    ) {
        let me = thread::current().id();
        loop {
            if outbox.delivered >= ticket {
                return;
            }
            match outbox.drainer {
                Some(drainer) if drainer == me => {
                    outbox.drain_to = outbox.drain_to.max(ticket);
                    return;
                }
                Some(_) => self.progress.wait(&mut outbox),
                None => break,
            }
        }

        outbox.drainer = Some(me);
        outbox.drain_to = ticket;
        loop {
            let due = outbox
                .queue
                .front()
                .map_or(false, |(queued, _)| *queued <= outbox.drain_to);
            if !due {
                break;
            }
            let Some((queued, event)) = outbox.queue.pop_front() else {
                break;
            };
            MutexGuard::unlocked(&mut outbox, || {
                self.registry.broadcast(&event);
            });
            outbox.delivered = queued;
            self.progress.notify_all();
        }
        outbox.drainer = None;
        drop(outbox);
        self.progress.notify_all();
    }
}
