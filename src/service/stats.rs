use parking_lot::Mutex;
use serde::Serialize;

use crate::metrics::OPERATIONS_TOTAL;
use crate::utils::now_millis;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OperationCounters {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
}

/// Operation counters guarded by one lock, so every snapshot satisfies
/// `total == successful + failed`.
#[derive(Debug)]
pub struct OperationStats {
    start_time: i64,
    counters: Mutex<OperationCounters>,
}

impl Default for OperationStats {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationStats {
    pub fn new() -> Self {
        Self {
            start_time: now_millis(),
            counters: Mutex::new(OperationCounters::default()),
        }
    }

    pub fn record(
        &self,
        op: &'static str,
        success: bool,
    ) {
        {
            let mut counters = self.counters.lock();
            counters.total += 1;
            if success {
                counters.successful += 1;
            } else {
                counters.failed += 1;
            }
        }
        let outcome = if success { "success" } else { "failure" };
        OPERATIONS_TOTAL.with_label_values(&[op, outcome]).inc();
    }

    pub fn reset(&self) {
        *self.counters.lock() = OperationCounters::default();
    }

    pub fn counters(&self) -> OperationCounters {
        *self.counters.lock()
    }

    pub fn start_time(&self) -> i64 {
        self.start_time
    }
}

/// Point-in-time service statistics returned by `get_statistics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub start_time: i64,
    /// Milliseconds since construction
    pub uptime: i64,
    pub total_operations: u64,
    pub successful_operations: u64,
    pub failed_operations: u64,
    pub data_store_size: usize,
    pub custom_data_store_size: usize,
    pub analysis_cache_size: usize,
    pub callback_count: usize,
    pub pending_tasks: usize,
    pub version: String,
}

impl Statistics {
    /// Failed over total operations; 0 when nothing was counted.
    pub fn failure_rate(&self) -> f64 {
        if self.total_operations == 0 {
            return 0.0;
        }
        self.failed_operations as f64 / self.total_operations as f64
    }
}
