use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use indexmap::IndexMap;
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::json;
use serde_json::Map;
use serde_json::Value;
use tracing::debug;
use tracing::info;

use super::AiEngine;
use super::Anomaly;
use super::AnomalyReport;
use super::ModelInfo;
use crate::utils::now_millis;
use crate::AiConfig;
use crate::AiError;
use crate::ConfigValue;
use crate::Result;
use crate::Statistics;

pub const ANALYSIS_TYPES: [&str; 5] = ["pattern", "anomaly", "prediction", "sentiment", "classification"];

const DATA_SIZE_LIMIT: usize = 10_000;
const PREDICTION_WINDOW: usize = 5;

const POSITIVE_WORDS: [&str; 4] = ["good", "great", "excellent", "success"];
const NEGATIVE_WORDS: [&str; 4] = ["bad", "error", "fail", "problem"];

const CATEGORIES: [(&str, &[&str]); 4] = [
    ("system_config", &["config", "setting", "option"]),
    ("user_data", &["user", "name", "email", "profile"]),
    ("performance_metrics", &["cpu", "memory", "latency", "throughput"]),
    ("error_log", &["error", "exception", "fail", "panic"]),
];
const FALLBACK_CATEGORY: &str = "other";

#[derive(Debug, Clone)]
struct AnalysisEntry {
    analysis_type: String,
    timestamp: i64,
}

/// Heuristic analytics engine.
///
/// Thresholds come from [`AiConfig`]; randomized fields (confidences,
/// trend direction) are simulated.
#[derive(Debug)]
pub struct RuleBasedAssistant {
    config: AiConfig,
    initialized: AtomicBool,
    history: Mutex<VecDeque<AnalysisEntry>>,
}

impl RuleBasedAssistant {
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            initialized: AtomicBool::new(false),
            history: Mutex::new(VecDeque::new()),
        }
    }

    fn ensure_initialized(&self) -> Result<()> {
        if !self.is_initialized() {
            return Err(AiError::NotInitialized.into());
        }
        Ok(())
    }

    fn remember(
        &self,
        analysis_type: &str,
    ) {
        let mut history = self.history.lock();
        history.push_back(AnalysisEntry {
            analysis_type: analysis_type.to_string(),
            timestamp: now_millis(),
        });
        while history.len() > self.config.history_limit {
            history.pop_front();
        }
    }

    pub fn history_size(&self) -> usize {
        self.history.lock().len()
    }

    /// Type and timestamp of the most recent analysis.
    pub fn last_analysis(&self) -> Option<(String, i64)> {
        self.history
            .lock()
            .back()
            .map(|e| (e.analysis_type.clone(), e.timestamp))
    }
}

impl AiEngine for RuleBasedAssistant {
    fn initialize(&self) -> Result<()> {
        if self.initialized.swap(true, Ordering::AcqRel) {
            debug!("assistant already initialized");
            return Ok(());
        }
        info!(
            model = %self.config.model_name,
            version = %self.config.model_version,
            "rule-based assistant initialized"
        );
        Ok(())
    }

    fn shutdown(&self) {
        self.initialized.store(false, Ordering::Release);
        self.history.lock().clear();
        info!("rule-based assistant shut down");
    }

    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    fn analyze(
        &self,
        data: &str,
        analysis_type: &str,
    ) -> Result<String> {
        self.ensure_initialized()?;

        let mut report = Map::new();
        report.insert("analysisType".into(), json!(analysis_type));
        report.insert("timestamp".into(), json!(now_millis()));
        match analysis_type {
            "pattern" => report.insert("patterns".into(), analyze_patterns(data)),
            "anomaly" => report.insert("anomalies".into(), detect_data_anomalies(data)),
            "prediction" => report.insert("prediction".into(), predict_trend()),
            "sentiment" => report.insert("sentiment".into(), analyze_sentiment(data)),
            "classification" => report.insert("classification".into(), classify(data)),
            other => report.insert(
                "error".into(),
                json!(format!("Unknown analysis type: {other}")),
            ),
        };

        self.remember(analysis_type);
        debug!(analysis_type, "analysis complete");
        Ok(serde_json::to_string_pretty(&Value::Object(report))?)
    }

    fn optimization_suggestions(
        &self,
        context: &HashMap<String, String>,
        statistics: &Statistics,
    ) -> Vec<String> {
        let limits = &self.config.suggestion;
        let mut suggestions = Vec::new();

        if statistics.data_store_size > limits.data_store_size {
            suggestions.push(format!(
                "Data store holds {} entries; purge stale keys",
                statistics.data_store_size
            ));
            suggestions.push("Prefer batch operations to reduce per-key overhead".to_string());
        }

        let failure_rate = statistics.failure_rate();
        if failure_rate > limits.failure_rate {
            suggestions.push(format!(
                "Operation failure rate is {:.2}%; review caller error handling",
                failure_rate * 100.0
            ));
        }

        if statistics.uptime > limits.uptime_ms {
            suggestions.push(
                "Service has been up for more than a day; schedule a periodic restart".to_string(),
            );
        }

        if statistics.callback_count > limits.callback_count {
            suggestions.push(format!(
                "{} registered callbacks; broadcasts may slow down",
                statistics.callback_count
            ));
        }

        if self.history_size() > limits.analysis_history {
            suggestions.push("Analysis history is large; enable periodic cleanup".to_string());
        }

        if let Some(value) = context.get("newValue") {
            if value.len() > DATA_SIZE_LIMIT {
                let key = context.get("key").map(String::as_str).unwrap_or("?");
                suggestions.push(format!(
                    "Value for key '{}' is {} bytes; store large payloads externally",
                    key,
                    value.len()
                ));
            }
        }

        if suggestions.is_empty() {
            suggestions.push("System is running well; no optimization needed".to_string());
            suggestions.push("Keep monitoring key metrics".to_string());
        }
        suggestions
    }

    fn predict(
        &self,
        history: &[String],
        horizon: u32,
    ) -> Result<String> {
        self.ensure_initialized()?;

        let window: Vec<f64> = history
            .iter()
            .rev()
            .take(PREDICTION_WINDOW)
            .filter_map(|v| v.trim().parse::<f64>().ok())
            .collect();
        let baseline = if window.is_empty() {
            0.0
        } else {
            window.iter().sum::<f64>() / window.len() as f64
        };

        let mut rng = rand::thread_rng();
        let predictions: Vec<Value> = (1..=horizon)
            .map(|offset| {
                let trend: f64 = rng.gen_range(-5.0..5.0);
                json!({
                    "timeOffset": offset,
                    "predictedValue": baseline + trend * f64::from(offset),
                    "confidence": rng.gen_range(0.7..0.9),
                })
            })
            .collect();

        self.remember("prediction");
        let report = json!({
            "predictionHorizon": horizon,
            "dataPoints": history.len(),
            "timestamp": now_millis(),
            "predictions": predictions,
            "accuracy": "simulated",
        });
        Ok(serde_json::to_string_pretty(&report)?)
    }

    fn detect_anomalies(
        &self,
        metrics: &HashMap<String, f64>,
    ) -> Result<AnomalyReport> {
        self.ensure_initialized()?;
        let limits = &self.config.anomaly;
        let mut anomalies = Vec::new();

        if let Some(&cpu) = metrics.get("cpu") {
            if cpu > limits.cpu {
                anomalies.push(Anomaly {
                    anomaly_type: "HIGH_CPU".to_string(),
                    value: cpu,
                    threshold: Some(limits.cpu),
                    percentage: None,
                    severity: if cpu > 95.0 { 5 } else { 3 },
                    recommendation: "CPU usage is high; inspect background services".to_string(),
                });
            }
        }

        if let (Some(&used), Some(&total)) = (metrics.get("memory"), metrics.get("totalMemory")) {
            if total > 0.0 {
                let ratio = used / total;
                if ratio > limits.memory_ratio {
                    anomalies.push(Anomaly {
                        anomaly_type: "HIGH_MEMORY".to_string(),
                        value: used,
                        threshold: Some(limits.memory_ratio),
                        percentage: Some(ratio * 100.0),
                        severity: if ratio > 0.95 { 5 } else { 3 },
                        recommendation: "Memory usage is high; release cached resources".to_string(),
                    });
                }
            }
        }

        if let Some(&response_time) = metrics.get("responseTime") {
            if response_time > limits.response_time {
                anomalies.push(Anomaly {
                    anomaly_type: "SLOW_RESPONSE".to_string(),
                    value: response_time,
                    threshold: Some(limits.response_time),
                    percentage: None,
                    severity: if response_time > 5000.0 { 4 } else { 2 },
                    recommendation: "Responses are slow; optimize queries or add caching".to_string(),
                });
            }
        }

        if let Some(&error_rate) = metrics.get("errorRate") {
            if error_rate > limits.error_rate {
                anomalies.push(Anomaly {
                    anomaly_type: "HIGH_ERROR_RATE".to_string(),
                    value: error_rate * 100.0,
                    threshold: Some(limits.error_rate),
                    percentage: None,
                    severity: if error_rate > 0.2 { 5 } else { 3 },
                    recommendation: "Error rate is high; inspect the error log".to_string(),
                });
            }
        }

        self.remember("anomaly_detection");
        let total_anomalies = anomalies.len();
        let (status, message) = if anomalies.is_empty() {
            ("healthy", "No anomalies detected".to_string())
        } else {
            ("warning", format!("Detected {total_anomalies} anomalies"))
        };
        Ok(AnomalyReport {
            anomalies,
            timestamp: now_millis(),
            total_anomalies,
            status: status.to_string(),
            message,
        })
    }

    fn auto_tune(
        &self,
        target_metric: &str,
    ) -> Result<Option<IndexMap<String, ConfigValue>>> {
        self.ensure_initialized()?;

        let mut overrides = IndexMap::new();
        match target_metric {
            "performance" => {
                overrides.insert("workerThreads".to_string(), ConfigValue::from(8));
                overrides.insert("cacheSize".to_string(), ConfigValue::from(2000));
            }
            "battery" => {
                overrides.insert("workerThreads".to_string(), ConfigValue::from(2));
                overrides.insert("pollingInterval".to_string(), ConfigValue::from(60_000));
            }
            "memory" => {
                overrides.insert("cacheSize".to_string(), ConfigValue::from(500));
                overrides.insert("aggressiveGC".to_string(), ConfigValue::from(true));
            }
            other => {
                debug!(target_metric = other, "no tuning profile");
                return Ok(None);
            }
        }
        info!(target_metric, "auto-tune profile selected");
        Ok(Some(overrides))
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            model_name: self.config.model_name.clone(),
            model_version: self.config.model_version.clone(),
            initialized: self.is_initialized(),
            analysis_history_size: self.history_size(),
            framework: "rule-based".to_string(),
            supported_analysis_types: ANALYSIS_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

fn analyze_patterns(data: &str) -> Value {
    json!([
        {
            "type": "frequency",
            "description": "High-frequency access pattern",
            "confidence": 0.85,
            "sampleSize": data.len(),
        },
        {
            "type": "temporal",
            "description": "Periodic access pattern",
            "period": "hourly",
            "confidence": 0.78,
        },
    ])
}

fn detect_data_anomalies(data: &str) -> Value {
    if data.len() > DATA_SIZE_LIMIT {
        json!([{
            "type": "size_anomaly",
            "description": "Data size outside the expected range",
            "value": data.len(),
            "expectedRange": format!("0-{DATA_SIZE_LIMIT}"),
        }])
    } else {
        json!([])
    }
}

fn predict_trend() -> Value {
    let mut rng = rand::thread_rng();
    let direction = if rng.gen_bool(0.5) { "rising" } else { "stable" };
    json!({
        "direction": direction,
        "confidence": rng.gen_range(0.75..0.95),
        "estimatedChange": format!("{}%", rng.gen_range(-10..10)),
    })
}

/// Score in [-1, 1] from counts of known positive and negative words.
pub(crate) fn sentiment_score(data: &str) -> f64 {
    let lower = data.to_lowercase();
    let positive = POSITIVE_WORDS.iter().filter(|w| lower.contains(*w)).count() as f64;
    let negative = NEGATIVE_WORDS.iter().filter(|w| lower.contains(*w)).count() as f64;
    if positive + negative == 0.0 {
        return 0.0;
    }
    (positive - negative) / (positive + negative)
}

fn analyze_sentiment(data: &str) -> Value {
    let score = sentiment_score(data);
    let label = if score > 0.2 {
        "positive"
    } else if score < -0.2 {
        "negative"
    } else {
        "neutral"
    };
    json!({
        "score": score,
        "label": label,
        "confidence": 0.6 + score.abs() * 0.3,
    })
}

/// First category with a keyword present in `data`.
pub(crate) fn category_of(data: &str) -> &'static str {
    let lower = data.to_lowercase();
    CATEGORIES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(name, _)| *name)
        .unwrap_or(FALLBACK_CATEGORY)
}

fn classify(data: &str) -> Value {
    let category = category_of(data);
    let mut rng = rand::thread_rng();
    let mut related: Vec<&str> = CATEGORIES
        .iter()
        .map(|(name, _)| *name)
        .chain(std::iter::once(FALLBACK_CATEGORY))
        .filter(|name| *name != category)
        .collect();
    related.shuffle(&mut rng);
    related.truncate(2);
    json!({
        "category": category,
        "confidence": rng.gen_range(0.7..0.95),
        "relatedCategories": related,
    })
}
