use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    #[serde(rename = "type")]
    pub anomaly_type: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    /// 1 (informational) to 5 (critical)
    pub severity: i32,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyReport {
    pub anomalies: Vec<Anomaly>,
    pub timestamp: i64,
    pub total_anomalies: usize,
    /// `healthy` or `warning`
    pub status: String,
    pub message: String,
}

impl AnomalyReport {
    pub fn is_healthy(&self) -> bool {
        self.anomalies.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub model_name: String,
    pub model_version: String,
    pub initialized: bool,
    pub analysis_history_size: usize,
    pub framework: String,
    pub supported_analysis_types: Vec<String>,
}
