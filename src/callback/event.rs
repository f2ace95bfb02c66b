use serde::Serialize;

use crate::ServiceStatus;

/// Notifications delivered to every registered subscriber.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Event {
    #[serde(rename_all = "camelCase")]
    StatusChanged { status: ServiceStatus, message: String },

    #[serde(rename_all = "camelCase")]
    DataUpdated {
        key: String,
        value: String,
        timestamp: i64,
    },

    /// `keys` and `values` are parallel, in the order the batch was given
    #[serde(rename_all = "camelCase")]
    BatchDataUpdated { keys: Vec<String>, values: Vec<String> },

    #[serde(rename_all = "camelCase")]
    Error { code: i32, message: String },

    ServiceReady,

    ServiceReset,

    #[serde(rename_all = "camelCase")]
    ConfigurationChanged { name: String, value: String },

    #[serde(rename_all = "camelCase")]
    AiAnalysisComplete { analysis_id: String, result: String },

    #[serde(rename_all = "camelCase")]
    AnomalyDetected {
        anomaly_type: String,
        severity: i32,
        details: String,
    },

    #[serde(rename_all = "camelCase")]
    OptimizationSuggestion {
        category: String,
        suggestions: Vec<String>,
    },

    #[serde(rename_all = "camelCase")]
    CustomEvent { event_type: String, payload: String },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::StatusChanged { .. } => "statusChanged",
            Event::DataUpdated { .. } => "dataUpdated",
            Event::BatchDataUpdated { .. } => "batchDataUpdated",
            Event::Error { .. } => "error",
            Event::ServiceReady => "serviceReady",
            Event::ServiceReset => "serviceReset",
            Event::ConfigurationChanged { .. } => "configurationChanged",
            Event::AiAnalysisComplete { .. } => "aiAnalysisComplete",
            Event::AnomalyDetected { .. } => "anomalyDetected",
            Event::OptimizationSuggestion { .. } => "optimizationSuggestion",
            Event::CustomEvent { .. } => "customEvent",
        }
    }
}
