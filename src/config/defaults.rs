use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

use super::invalid_config;
use crate::constants::OPTION_CACHE_SIZE;
use crate::constants::OPTION_ENABLE_AI;
use crate::constants::OPTION_LOG_LEVEL;
use crate::constants::OPTION_WORKER_THREADS;
use crate::ConfigValue;
use crate::Result;

const LOG_LEVELS: [&str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];

/// Runtime options written into the configuration store by `system_ready`.
///
/// Clients may later overwrite any of them through `set_configuration`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DefaultOptions {
    /// Gates the background change analysis after `set_data`
    #[serde(default = "default_enable_ai")]
    pub enable_ai: bool,

    /// Upper bound applied to the analysis cache by the `optimize` action
    #[serde(default = "default_cache_size")]
    pub cache_size: i32,

    /// Informational only; the worker is always a single thread
    #[serde(default = "default_worker_threads")]
    pub worker_threads: i32,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for DefaultOptions {
    fn default() -> Self {
        Self {
            enable_ai: default_enable_ai(),
            cache_size: default_cache_size(),
            worker_threads: default_worker_threads(),
            log_level: default_log_level(),
        }
    }
}

impl DefaultOptions {
    pub fn validate(&self) -> Result<()> {
        if self.cache_size <= 0 {
            return Err(invalid_config(format!(
                "defaults.cache_size must be positive, got {}",
                self.cache_size
            )));
        }
        if self.worker_threads <= 0 {
            return Err(invalid_config(format!(
                "defaults.worker_threads must be positive, got {}",
                self.worker_threads
            )));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_uppercase().as_str()) {
            return Err(invalid_config(format!(
                "defaults.log_level {} is not one of {:?}",
                self.log_level, LOG_LEVELS
            )));
        }
        Ok(())
    }

    /// The options under the names clients use in `get_configuration`.
    pub fn to_options(&self) -> IndexMap<String, ConfigValue> {
        let mut options = IndexMap::new();
        options.insert(OPTION_ENABLE_AI.to_string(), ConfigValue::from(self.enable_ai));
        options.insert(OPTION_CACHE_SIZE.to_string(), ConfigValue::from(self.cache_size));
        options.insert(
            OPTION_WORKER_THREADS.to_string(),
            ConfigValue::from(self.worker_threads),
        );
        options.insert(
            OPTION_LOG_LEVEL.to_string(),
            ConfigValue::from(self.log_level.as_str()),
        );
        options
    }
}

fn default_enable_ai() -> bool {
    true
}
fn default_cache_size() -> i32 {
    1000
}
fn default_worker_threads() -> i32 {
    4
}
fn default_log_level() -> String {
    "INFO".to_string()
}
