//! Single background thread executing tasks one at a time in submission order.
//!
//! `quit_safely` stops intake, lets the thread drain everything already
//! queued, then joins it.

use std::panic::catch_unwind;
use std::panic::AssertUnwindSafe;
use std::thread;
use std::thread::JoinHandle;
use std::thread::ThreadId;

use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use crossbeam_channel::TrySendError;
use parking_lot::Mutex;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::metrics::WORKER_TASKS;
use crate::Result;
use crate::WorkerConfig;
use crate::WorkerError;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub struct Worker {
    name: String,
    thread_id: ThreadId,
    sender: Mutex<Option<Sender<Task>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Worker {
    pub fn start(config: &WorkerConfig) -> Result<Self> {
        let (sender, receiver) = if config.queue_capacity > 0 {
            crossbeam_channel::bounded(config.queue_capacity)
        } else {
            crossbeam_channel::unbounded()
        };

        let name = config.thread_name.clone();
        let thread_name = name.clone();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || run(thread_name, receiver))
            .map_err(WorkerError::SpawnFailed)?;

        info!(worker = %name, "worker started");
        Ok(Self {
            name,
            thread_id: handle.thread().id(),
            sender: Mutex::new(Some(sender)),
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Queues `task` behind every previously submitted task.
    ///
    /// Blocks while a bounded queue is full, except on the worker thread
    /// itself, where a full queue fails with `QueueFull` like `try_submit`.
    pub fn submit<F>(
        &self,
        task: F,
    ) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.on_worker_thread() {
            return self.try_submit(task);
        }
        let sender = self.sender.lock().clone().ok_or(WorkerError::ShutDown)?;
        sender.send(Box::new(task)).map_err(|_| WorkerError::ShutDown)?;
        Ok(())
    }

    /// Queues `task` without waiting for room in a bounded queue.
    pub fn try_submit<F>(
        &self,
        task: F,
    ) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender.lock().clone().ok_or(WorkerError::ShutDown)?;
        sender.try_send(Box::new(task)).map_err(|e| match e {
            TrySendError::Full(_) => {
                warn!(worker = %self.name, "queue full, task rejected");
                WorkerError::QueueFull
            }
            TrySendError::Disconnected(_) => WorkerError::ShutDown,
        })?;
        Ok(())
    }

    pub fn on_worker_thread(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    /// Tasks queued but not yet started.
    pub fn pending(&self) -> usize {
        self.sender.lock().as_ref().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_running(&self) -> bool {
        self.sender.lock().is_some()
            && self.handle.lock().as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stops intake, drains queued tasks and joins the thread.
    ///
    /// Called from a task running on this worker, it stops intake without
    /// joining.
    pub fn quit_safely(&self) {
        let sender = self.sender.lock().take();
        drop(sender);

        let handle = self.handle.lock().take();
        let Some(handle) = handle else {
            return;
        };
        if self.on_worker_thread() {
            warn!(worker = %self.name, "quit requested from the worker thread, not joining");
            return;
        }
        if handle.join().is_err() {
            error!(worker = %self.name, "worker thread terminated abnormally");
        }
        info!(worker = %self.name, "worker stopped");
    }

    /// Stops intake and lets the thread finish its queue unobserved.
    pub fn detach(&self) {
        let sender = self.sender.lock().take();
        drop(sender);
        if self.handle.lock().take().is_some() {
            info!(worker = %self.name, "worker detached");
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.quit_safely();
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("name", &self.name)
            .field("pending", &self.pending())
            .finish()
    }
}

fn run(
    name: String,
    receiver: Receiver<Task>,
) {
    debug!(worker = %name, "worker loop entered");
    for task in receiver.iter() {
        match catch_unwind(AssertUnwindSafe(task)) {
            Ok(()) => WORKER_TASKS.with_label_values(&["completed"]).inc(),
            Err(_) => {
                WORKER_TASKS.with_label_values(&["panicked"]).inc();
                error!(worker = %name, "task panicked, continuing with next task");
            }
        }
    }
    debug!(worker = %name, "worker queue drained");
}
