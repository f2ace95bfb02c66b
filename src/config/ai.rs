use serde::Deserialize;
use serde::Serialize;

use super::invalid_config;
use crate::Result;

/// Parameters of the rule-based analytics engine
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AiConfig {
    #[serde(default = "default_model_name")]
    pub model_name: String,

    #[serde(default = "default_model_version")]
    pub model_version: String,

    /// Analyses retained for `model_info` and the history-size suggestion
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    #[serde(default)]
    pub anomaly: AnomalyThresholds,

    #[serde(default)]
    pub suggestion: SuggestionThresholds,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model_name: default_model_name(),
            model_version: default_model_version(),
            history_limit: default_history_limit(),
            anomaly: AnomalyThresholds::default(),
            suggestion: SuggestionThresholds::default(),
        }
    }
}

impl AiConfig {
    pub fn validate(&self) -> Result<()> {
        if self.model_name.trim().is_empty() {
            return Err(invalid_config("ai.model_name must not be empty"));
        }
        if self.history_limit == 0 {
            return Err(invalid_config("ai.history_limit must be at least 1"));
        }
        self.anomaly.validate()?;
        self.suggestion.validate()
    }
}

/// Metric limits above which `detect_anomalies` reports an anomaly
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnomalyThresholds {
    /// CPU usage percentage
    #[serde(default = "default_cpu")]
    pub cpu: f64,
    /// Ratio of used to total memory
    #[serde(default = "default_memory_ratio")]
    pub memory_ratio: f64,
    /// Milliseconds
    #[serde(default = "default_response_time")]
    pub response_time: f64,
    #[serde(default = "default_error_rate")]
    pub error_rate: f64,
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            cpu: default_cpu(),
            memory_ratio: default_memory_ratio(),
            response_time: default_response_time(),
            error_rate: default_error_rate(),
        }
    }
}

impl AnomalyThresholds {
    fn validate(&self) -> Result<()> {
        if !(self.cpu > 0.0 && self.cpu <= 100.0) {
            return Err(invalid_config(format!(
                "ai.anomaly.cpu must be in (0, 100], got {}",
                self.cpu
            )));
        }
        if !(self.memory_ratio > 0.0 && self.memory_ratio <= 1.0) {
            return Err(invalid_config(format!(
                "ai.anomaly.memory_ratio must be in (0, 1], got {}",
                self.memory_ratio
            )));
        }
        if self.response_time <= 0.0 {
            return Err(invalid_config("ai.anomaly.response_time must be positive"));
        }
        if !(self.error_rate > 0.0 && self.error_rate <= 1.0) {
            return Err(invalid_config(format!(
                "ai.anomaly.error_rate must be in (0, 1], got {}",
                self.error_rate
            )));
        }
        Ok(())
    }
}

/// Limits that trigger optimization suggestions
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SuggestionThresholds {
    #[serde(default = "default_data_store_size")]
    pub data_store_size: usize,
    #[serde(default = "default_failure_rate")]
    pub failure_rate: f64,
    #[serde(default = "default_uptime_ms")]
    pub uptime_ms: i64,
    #[serde(default = "default_callback_count")]
    pub callback_count: usize,
    #[serde(default = "default_analysis_history")]
    pub analysis_history: usize,
}

impl Default for SuggestionThresholds {
    fn default() -> Self {
        Self {
            data_store_size: default_data_store_size(),
            failure_rate: default_failure_rate(),
            uptime_ms: default_uptime_ms(),
            callback_count: default_callback_count(),
            analysis_history: default_analysis_history(),
        }
    }
}

impl SuggestionThresholds {
    fn validate(&self) -> Result<()> {
        if !(self.failure_rate > 0.0 && self.failure_rate <= 1.0) {
            return Err(invalid_config(format!(
                "ai.suggestion.failure_rate must be in (0, 1], got {}",
                self.failure_rate
            )));
        }
        if self.uptime_ms <= 0 {
            return Err(invalid_config("ai.suggestion.uptime_ms must be positive"));
        }
        Ok(())
    }
}

fn default_model_name() -> String {
    "CustomService-AI-Model".to_string()
}
fn default_model_version() -> String {
    "1.0.0".to_string()
}
fn default_history_limit() -> usize {
    1000
}
fn default_cpu() -> f64 {
    80.0
}
fn default_memory_ratio() -> f64 {
    0.85
}
fn default_response_time() -> f64 {
    1000.0
}
fn default_error_rate() -> f64 {
    0.05
}
fn default_data_store_size() -> usize {
    10_000
}
fn default_failure_rate() -> f64 {
    0.1
}
// 24 hours
fn default_uptime_ms() -> i64 {
    86_400_000
}
fn default_callback_count() -> usize {
    100
}
fn default_analysis_history() -> usize {
    100
}
