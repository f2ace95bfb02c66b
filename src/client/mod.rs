//! Thin caller-side wrapper around a [`CustomService`] handle.
//!
//! Mirrors what a remote client library does: every call is made with a
//! fixed invocation context, and failures are logged and folded into
//! `None`/`false` instead of being returned.
mod waiter;


use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use tracing::debug;
use tracing::error;
use tracing::warn;

use self::waiter::AnalysisWaiter;
use self::waiter::Expectation;
use crate::ActionParams;
use crate::ConfigValue;
use crate::CustomService;
use crate::InvocationContext;
use crate::ModelInfo;
use crate::Record;
use crate::Result;
use crate::ServiceError;
use crate::Statistics;
use crate::Subscriber;

pub struct CustomServiceClient {
    service: CustomService,
    context: Arc<dyn InvocationContext>,
    waiter: Arc<AnalysisWaiter>,
}

impl CustomServiceClient {
    /// Binds `context` to `service` and subscribes for analysis outcomes.
    ///
    /// # Errors
    /// - [`ServiceError::PermissionDenied`] when `context` lacks the permission
    /// - [`ServiceError::NotReady`] after the service was shut down
    pub fn connect(
        service: CustomService,
        context: Arc<dyn InvocationContext>,
    ) -> Result<Self> {
        let waiter = Arc::new(AnalysisWaiter::new());
        service.register_callback(context.as_ref(), waiter.clone())?;
        debug!("client connected");
        Ok(Self {
            service,
            context,
            waiter,
        })
    }

    pub fn service(&self) -> &CustomService {
        &self.service
    }

    fn ctx(&self) -> &dyn InvocationContext {
        self.context.as_ref()
    }

    fn settle<T>(
        &self,
        op: &'static str,
        result: Result<T>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                error!(op, code = e.code(), "service call failed: {}", e);
                None
            }
        }
    }

    /// Status code of the service.
    pub fn get_service_status(&self) -> i32 {
        self.service.get_service_status().code()
    }

    pub fn is_ready(&self) -> bool {
        self.service.is_ready()
    }

    pub fn get_version(&self) -> String {
        self.service.get_version().to_string()
    }

    pub fn get_data(
        &self,
        key: &str,
    ) -> Option<String> {
        self.settle("get_data", self.service.get_data(self.ctx(), key))
            .flatten()
    }

    pub fn set_data(
        &self,
        key: &str,
        value: &str,
    ) -> bool {
        self.settle("set_data", self.service.set_data(self.ctx(), key, value))
            .is_some()
    }

    /// Empty on failure.
    pub fn get_batch_data(
        &self,
        keys: &[String],
    ) -> Vec<Option<String>> {
        self.settle(
            "get_batch_data",
            self.service.get_batch_data(self.ctx(), keys),
        )
        .unwrap_or_default()
    }

    pub fn set_batch_data(
        &self,
        entries: &IndexMap<String, String>,
    ) -> bool {
        self.settle(
            "set_batch_data",
            self.service.set_batch_data(self.ctx(), entries),
        )
        .is_some()
    }

    pub fn remove_data(
        &self,
        key: &str,
    ) -> bool {
        self.settle("remove_data", self.service.remove_data(self.ctx(), key))
            .unwrap_or(false)
    }

    pub fn clear_all_data(&self) -> bool {
        self.settle("clear_all_data", self.service.clear_all_data(self.ctx()))
            .is_some()
    }

    pub fn get_custom_data(
        &self,
        id: i32,
    ) -> Option<Record> {
        self.settle(
            "get_custom_data",
            self.service.get_custom_data(self.ctx(), id),
        )
        .flatten()
    }

    pub fn set_custom_data(
        &self,
        record: Record,
    ) -> bool {
        self.settle(
            "set_custom_data",
            self.service.set_custom_data(self.ctx(), record),
        )
        .is_some()
    }

    pub fn remove_custom_data(
        &self,
        id: i32,
    ) -> bool {
        self.settle(
            "remove_custom_data",
            self.service.remove_custom_data(self.ctx(), id),
        )
        .unwrap_or(false)
    }

    pub fn register_callback(
        &self,
        subscriber: Arc<dyn Subscriber>,
    ) -> bool {
        self.settle(
            "register_callback",
            self.service.register_callback(self.ctx(), subscriber),
        )
        .is_some()
    }

    pub fn unregister_callback(
        &self,
        subscriber: &dyn Subscriber,
    ) -> bool {
        self.service.unregister_callback(subscriber)
    }

    pub fn perform_action(
        &self,
        action: &str,
        params: &ActionParams,
    ) -> bool {
        self.settle(
            "perform_action",
            self.service.perform_action(self.ctx(), action, params),
        )
        .unwrap_or(false)
    }

    pub fn reset_service(&self) -> bool {
        self.settle("reset_service", self.service.reset_service(self.ctx()))
            .is_some()
    }

    pub fn get_statistics(&self) -> Option<Statistics> {
        self.settle("get_statistics", self.service.get_statistics(self.ctx()))
    }

    pub fn set_configuration(
        &self,
        config: &IndexMap<String, ConfigValue>,
    ) -> bool {
        self.settle(
            "set_configuration",
            self.service.set_configuration(self.ctx(), config),
        )
        .is_some()
    }

    pub fn get_configuration(&self) -> Option<BTreeMap<String, ConfigValue>> {
        self.settle(
            "get_configuration",
            self.service.get_configuration(self.ctx()),
        )
    }

    /// Schedules an analysis and returns its id.
    pub fn analyze_data(
        &self,
        data: &str,
        analysis_type: &str,
    ) -> Option<String> {
        self.settle(
            "analyze_data",
            self.service
                .analyze_data_with_ai(self.ctx(), data, analysis_type),
        )
    }

    /// Waits for the outcome of analysis `analysis_id`.
    ///
    /// # Errors
    /// [`ServiceError::AiAnalysisFailed`] when the analysis failed or no
    /// outcome arrived within `timeout`.
    pub async fn await_analysis(
        &self,
        analysis_id: &str,
        timeout: Duration,
    ) -> Result<String> {
        let rx = match self.waiter.expect(analysis_id) {
            Expectation::Ready(outcome) => return outcome.map_err(analysis_failed),
            Expectation::Pending(rx) => rx,
        };

        // Outcome may have been delivered before this client subscribed
        if let Ok(Some(result)) = self.service.get_analysis_result(self.ctx(), analysis_id) {
            self.waiter.cancel(analysis_id);
            return Ok(result);
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(outcome)) => outcome.map_err(analysis_failed),
            Ok(Err(_)) => Err(analysis_failed("analysis waiter dropped".to_string())),
            Err(_) => {
                self.waiter.cancel(analysis_id);
                warn!(analysis_id, ?timeout, "analysis timed out");
                Err(analysis_failed(format!(
                    "analysis {analysis_id} timed out after {timeout:?}"
                )))
            }
        }
    }

    /// Schedules an analysis and waits for its outcome.
    pub async fn analyze_and_wait(
        &self,
        data: &str,
        analysis_type: &str,
        timeout: Duration,
    ) -> Result<String> {
        let analysis_id = self
            .service
            .analyze_data_with_ai(self.ctx(), data, analysis_type)?;
        self.await_analysis(&analysis_id, timeout).await
    }

    pub fn get_optimization_suggestions(
        &self,
        context: &HashMap<String, String>,
    ) -> Vec<String> {
        self.settle(
            "get_optimization_suggestions",
            self.service
                .get_optimization_suggestions(self.ctx(), context),
        )
        .unwrap_or_default()
    }

    pub fn predict_with_ai(
        &self,
        history: &[String],
        horizon: u32,
    ) -> Option<String> {
        self.settle(
            "predict_with_ai",
            self.service.predict_with_ai(self.ctx(), history, horizon),
        )
    }

    pub fn detect_anomalies(
        &self,
        metrics: &HashMap<String, f64>,
    ) -> Option<String> {
        self.settle(
            "detect_anomalies",
            self.service.detect_anomalies(self.ctx(), metrics),
        )
    }

    pub fn auto_tune_with_ai(
        &self,
        target_metric: &str,
    ) -> bool {
        self.settle(
            "auto_tune_with_ai",
            self.service.auto_tune_with_ai(self.ctx(), target_metric),
        )
        .unwrap_or(false)
    }

    pub fn get_ai_model_info(&self) -> Option<ModelInfo> {
        self.settle(
            "get_ai_model_info",
            self.service.get_ai_model_info(self.ctx()),
        )
    }
}

impl Drop for CustomServiceClient {
    fn drop(&mut self) {
        self.service.unregister_callback(self.waiter.as_ref());
    }
}

fn analysis_failed(message: String) -> crate::Error {
    ServiceError::AiAnalysisFailed(message).into()
}
