//! Analytics engine seam.
//!
//! The service talks to an [`AiEngine`]; the bundled implementation is the
//! heuristic [`RuleBasedAssistant`]. Hosts can plug in any other engine
//! through the service builder.
mod rule_based;
mod types;

pub use rule_based::*;
pub use types::*;

#[cfg(test)]
mod rule_based_test;

use std::collections::HashMap;

use indexmap::IndexMap;
#[cfg(test)]
use mockall::automock;

use crate::ConfigValue;
use crate::Result;
use crate::Statistics;

#[cfg_attr(test, automock)]
pub trait AiEngine: Send + Sync + 'static {
    fn initialize(&self) -> Result<()>;

    /// Releases history; later calls fail with `AiError::NotInitialized`.
    fn shutdown(&self);

    fn is_initialized(&self) -> bool;

    /// JSON report for `analysis_type`. An unknown type yields a report with
    /// an `error` field rather than an error.
    fn analyze(
        &self,
        data: &str,
        analysis_type: &str,
    ) -> Result<String>;

    fn optimization_suggestions(
        &self,
        context: &HashMap<String, String>,
        statistics: &Statistics,
    ) -> Vec<String>;

    /// JSON with one prediction per future step.
    fn predict(
        &self,
        history: &[String],
        horizon: u32,
    ) -> Result<String>;

    fn detect_anomalies(
        &self,
        metrics: &HashMap<String, f64>,
    ) -> Result<AnomalyReport>;

    /// Option overrides for `target_metric`; `None` for an unknown target.
    fn auto_tune(
        &self,
        target_metric: &str,
    ) -> Result<Option<IndexMap<String, ConfigValue>>>;

    fn model_info(&self) -> ModelInfo;
}
