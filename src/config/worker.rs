use serde::Deserialize;
use serde::Serialize;

use super::invalid_config;
use crate::constants::DEFAULT_WORKER_THREAD_NAME;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorkerConfig {
    /// Name given to the background thread
    #[serde(default = "default_thread_name")]
    pub thread_name: String,

    /// Maximum queued tasks before `submit` blocks. Submits from the worker
    /// thread or from inside a `notify` fail instead of waiting.
    /// 0 means unbounded.
    #[serde(default)]
    pub queue_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            thread_name: default_thread_name(),
            queue_capacity: 0,
        }
    }
}

impl WorkerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.thread_name.trim().is_empty() {
            return Err(invalid_config("worker.thread_name must not be empty"));
        }
        Ok(())
    }
}

fn default_thread_name() -> String {
    DEFAULT_WORKER_THREAD_NAME.to_string()
}
