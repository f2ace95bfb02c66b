use std::collections::BTreeMap;
use std::collections::HashMap;
use std::panic::catch_unwind;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicI32;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;
use uuid::Uuid;

use super::Action;
use super::ActionParams;
use super::InvocationContext;
use super::LifecycleState;
use super::OperationStats;
use super::ServiceStatus;
use super::Statistics;
use crate::constants::CUSTOM_DATA_REMOVED;
use crate::constants::CUSTOM_DATA_UPDATED;
use crate::constants::DATA_CHANGE_CATEGORY;
use crate::constants::ERROR_AI_ANALYSIS_FAILED;
use crate::constants::ERROR_SERVICE_NOT_READY;
use crate::constants::OPTION_CACHE_SIZE;
use crate::constants::OPTION_ENABLE_AI;
use crate::constants::STORE_ANALYSIS_CATEGORY;
use crate::utils::now_millis;
use crate::validate_key;
use crate::AiEngine;
use crate::AnalysisCache;
use crate::CallbackError;
use crate::CallbackRegistry;
use crate::ConfigStore;
use crate::ConfigValue;
use crate::DataSnapshot;
use crate::DataStore;
use crate::Error;
use crate::Event;
use crate::EventDispatcher;
use crate::ModelInfo;
use crate::Record;
use crate::Result;
use crate::ServiceConfig;
use crate::ServiceError;
use crate::Subscriber;
use crate::Worker;
use crate::WorkerError;

/// The platform service facade.
///
/// Every gated operation checks, in order: the caller's permission, the
/// service readiness, then its parameters. Cloning yields another handle to
/// the same service.
#[derive(Clone)]
pub struct CustomService {
    inner: Arc<ServiceInner>,
}

struct ServiceInner {
    settings: ServiceConfig,
    /// Guards lifecycle transitions, reset and configuration merges.
    /// Never held while an event is delivered.
    lifecycle: Mutex<LifecycleState>,
    ready: AtomicBool,
    status: AtomicI32,
    data: DataStore,
    options: ConfigStore,
    analyses: AnalysisCache,
    callbacks: CallbackRegistry,
    events: EventDispatcher,
    worker: ArcSwapOption<Worker>,
    ai: Arc<dyn AiEngine>,
    stats: OperationStats,
    backup: Mutex<Option<DataSnapshot>>,
}

impl std::fmt::Debug for CustomService {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("CustomService")
            .field("state", &self.lifecycle_state())
            .field("status", &self.get_service_status())
            .finish()
    }
}

impl CustomService {
    pub(crate) fn from_parts(
        settings: ServiceConfig,
        ai: Arc<dyn AiEngine>,
    ) -> Self {
        let callbacks = CallbackRegistry::new();
        let events = EventDispatcher::new(callbacks.clone());
        Self {
            inner: Arc::new(ServiceInner {
                settings,
                lifecycle: Mutex::new(LifecycleState::Constructed),
                ready: AtomicBool::new(false),
                status: AtomicI32::new(ServiceStatus::Idle.code()),
                data: DataStore::new(),
                options: ConfigStore::new(),
                analyses: AnalysisCache::new(),
                callbacks,
                events,
                worker: ArcSwapOption::empty(),
                ai,
                stats: OperationStats::new(),
                backup: Mutex::new(None),
            }),
        }
    }

    // ---------------------------------------------------------------------
    // Lifecycle

    /// Host signal that the platform is up. Allowed once, from `Constructed`.
    ///
    /// Seeds the default options, starts the worker and initializes the
    /// analytics engine. On failure the service moves to `Error`.
    pub fn system_ready(&self) -> Result<()> {
        info!("system ready, initializing service");
        let mut state = self.inner.lifecycle.lock();
        if *state != LifecycleState::Constructed {
            return Err(ServiceError::IllegalState(format!(
                "system_ready called in {:?} state",
                *state
            ))
            .into());
        }

        self.inner.options.merge(&self.inner.settings.defaults.to_options());

        let startup = Worker::start(&self.inner.settings.worker).and_then(|worker| {
            self.inner.ai.initialize()?;
            Ok(worker)
        });

        match startup {
            Ok(worker) => {
                self.inner.worker.store(Some(Arc::new(worker)));
                self.inner.ready.store(true, Ordering::Release);
                *state = LifecycleState::Ready;
                self.inner.events.enqueue(Event::ServiceReady);
                self.transition_status(ServiceStatus::Running);
                drop(state);
                self.inner.events.flush();
                info!(version = %self.get_version(), "service ready");
                Ok(())
            }
            Err(e) => {
                error!("service initialization failed: {}", e);
                *state = LifecycleState::Error;
                self.transition_status(ServiceStatus::Error);
                drop(state);
                self.inner.events.flush();
                Err(e)
            }
        }
    }

    /// Terminal. Queued worker tasks still run before the subscribers are
    /// dropped. Idempotent.
    pub fn shutdown(&self) {
        {
            let mut state = self.inner.lifecycle.lock();
            if *state == LifecycleState::Shutdown {
                debug!("shutdown already completed");
                return;
            }
            *state = LifecycleState::Shutdown;
            self.inner.ready.store(false, Ordering::Release);
            self.transition_status(ServiceStatus::Idle);
        }
        info!("shutting down service");
        self.inner.events.flush();

        if let Some(worker) = self.inner.worker.swap(None) {
            if self.inner.events.is_delivering() {
                // A worker task may be waiting for this very delivery
                warn!("shutdown called from a subscriber, not waiting for queued tasks");
                worker.detach();
            } else {
                worker.quit_safely();
            }
        }
        let dropped = self.inner.callbacks.kill_all();
        self.inner.ai.shutdown();
        info!(dropped_callbacks = dropped, "service shut down");
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        *self.inner.lifecycle.lock()
    }

    // ---------------------------------------------------------------------
    // Ungated queries

    pub fn get_service_status(&self) -> ServiceStatus {
        ServiceStatus::from_code(self.inner.status.load(Ordering::Acquire)).unwrap_or(ServiceStatus::Error)
    }

    pub fn is_ready(&self) -> bool {
        self.inner.ready.load(Ordering::Acquire)
    }

    pub fn get_version(&self) -> &str {
        &self.inner.settings.service.version
    }

    // ---------------------------------------------------------------------
    // Data

    pub fn get_data(
        &self,
        ctx: &dyn InvocationContext,
        key: &str,
    ) -> Result<Option<String>> {
        self.admit(ctx)?;
        let value = self.inner.data.get(key)?;
        self.inner.stats.record("get_data", value.is_some());
        debug!(key, found = value.is_some(), "get_data");
        Ok(value)
    }

    /// Stores `value` and broadcasts `DataUpdated`. When `enableAI` is on,
    /// also schedules a background analysis of the change.
    pub fn set_data(
        &self,
        ctx: &dyn InvocationContext,
        key: &str,
        value: &str,
    ) -> Result<()> {
        self.admit(ctx)?;
        let events = &self.inner.events;
        let mut ticket = 0;
        let previous = self.inner.data.set_with(key, value, || {
            ticket = events.enqueue(Event::DataUpdated {
                key: key.to_string(),
                value: value.to_string(),
                timestamp: now_millis(),
            });
        })?;
        self.inner.stats.record("set_data", true);
        debug!(key, replaced = previous.is_some(), "set_data");
        events.flush_through(ticket);

        if self.ai_enabled() {
            let mut context = HashMap::new();
            context.insert("key".to_string(), key.to_string());
            if let Some(previous) = previous {
                context.insert("oldValue".to_string(), previous);
            }
            context.insert("newValue".to_string(), value.to_string());
            let service = self.clone();
            if let Err(e) = self.submit(move || service.suggest(DATA_CHANGE_CATEGORY, &context)) {
                warn!(key, "change analysis not scheduled: {}", e);
            }
        }
        Ok(())
    }

    /// Values for `keys` in input order; absent and empty keys yield `None`.
    pub fn get_batch_data(
        &self,
        ctx: &dyn InvocationContext,
        keys: &[String],
    ) -> Result<Vec<Option<String>>> {
        self.admit(ctx)?;
        let values = self.inner.data.get_batch(keys);
        self.inner.stats.record("get_batch_data", true);
        Ok(values)
    }

    /// Writes every entry, then broadcasts a single `BatchDataUpdated`.
    /// Nothing is written when any key is empty.
    pub fn set_batch_data(
        &self,
        ctx: &dyn InvocationContext,
        entries: &IndexMap<String, String>,
    ) -> Result<()> {
        self.admit(ctx)?;
        self.inner.data.set_batch(entries)?;
        self.inner.stats.record("set_batch_data", true);
        debug!(size = entries.len(), "set_batch_data");
        self.inner.events.publish(Event::BatchDataUpdated {
            keys: entries.keys().cloned().collect(),
            values: entries.values().cloned().collect(),
        });
        Ok(())
    }

    pub fn remove_data(
        &self,
        ctx: &dyn InvocationContext,
        key: &str,
    ) -> Result<bool> {
        self.admit(ctx)?;
        let removed = self.inner.data.remove(key)?;
        self.inner.stats.record("remove_data", removed);
        debug!(key, removed, "remove_data");
        Ok(removed)
    }

    /// Empties the data store, the record store and the analysis cache.
    pub fn clear_all_data(
        &self,
        ctx: &dyn InvocationContext,
    ) -> Result<()> {
        self.admit(ctx)?;
        {
            let _guard = self.inner.lifecycle.lock();
            self.inner.data.clear();
            self.inner.analyses.clear();
        }
        self.inner.stats.record("clear_all_data", true);
        info!("all data cleared");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Records

    pub fn get_custom_data(
        &self,
        ctx: &dyn InvocationContext,
        id: i32,
    ) -> Result<Option<Record>> {
        self.admit(ctx)?;
        let record = self.inner.data.get_record(id);
        self.inner.stats.record("get_custom_data", record.is_some());
        Ok(record)
    }

    /// Stores `record` under its id and broadcasts it as a custom event.
    pub fn set_custom_data(
        &self,
        ctx: &dyn InvocationContext,
        record: Record,
    ) -> Result<Option<Record>> {
        self.admit(ctx)?;
        if record.name.is_empty() {
            return Err(ServiceError::invalid("record name must not be empty").into());
        }
        if !record.is_well_typed() {
            return Err(ServiceError::invalid(format!(
                "record {} value does not parse as {:?}",
                record.id, record.type_tag
            ))
            .into());
        }
        let payload = serde_json::to_string(&record)?;
        let id = record.id;
        let previous = self.inner.data.put_record(record);
        self.inner.stats.record("set_custom_data", true);
        debug!(id, replaced = previous.is_some(), "set_custom_data");
        self.inner.events.publish(Event::CustomEvent {
            event_type: CUSTOM_DATA_UPDATED.to_string(),
            payload,
        });
        Ok(previous)
    }

    pub fn remove_custom_data(
        &self,
        ctx: &dyn InvocationContext,
        id: i32,
    ) -> Result<bool> {
        self.admit(ctx)?;
        let removed = self.inner.data.remove_record(id);
        self.inner.stats.record("remove_custom_data", removed);
        if removed {
            self.inner.events.publish(Event::CustomEvent {
                event_type: CUSTOM_DATA_REMOVED.to_string(),
                payload: id.to_string(),
            });
        }
        Ok(removed)
    }

    // ---------------------------------------------------------------------
    // Callbacks

    /// Returns `Ok(false)` when the subscriber is already registered.
    /// Allowed before `system_ready`.
    pub fn register_callback(
        &self,
        ctx: &dyn InvocationContext,
        subscriber: Arc<dyn Subscriber>,
    ) -> Result<bool> {
        self.enforce_permission(ctx)?;
        let id = subscriber.id();
        let added = self.inner.callbacks.register(subscriber).map_err(|e| match e {
            CallbackError::RegistryClosed => ServiceError::NotReady,
            other => ServiceError::InvalidParameter(other.to_string()),
        })?;
        info!(
            id,
            added,
            count = self.inner.callbacks.count(),
            "callback registered"
        );
        Ok(added)
    }

    pub fn unregister_callback(
        &self,
        subscriber: &dyn Subscriber,
    ) -> bool {
        let removed = self.inner.callbacks.unregister(subscriber.id());
        info!(
            id = subscriber.id(),
            removed,
            count = self.inner.callbacks.count(),
            "callback unregistered"
        );
        removed
    }

    // ---------------------------------------------------------------------
    // Maintenance

    /// Runs a named action. An unknown name, or an action that fails,
    /// returns `Ok(false)` and counts as a failed operation.
    pub fn perform_action(
        &self,
        ctx: &dyn InvocationContext,
        name: &str,
        params: &ActionParams,
    ) -> Result<bool> {
        self.admit(ctx)?;
        info!(action = name, "performing action");

        let Some(action) = Action::parse(name) else {
            warn!(action = name, "unknown action");
            self.inner.stats.record("perform_action", false);
            return Ok(false);
        };

        let outcome = match action {
            Action::Reset => {
                // Counters are zeroed by the reset itself
                return Ok(self.reset());
            }
            Action::Optimize => self.optimize(params),
            Action::Analyze => self.analyze_store(),
            Action::Backup => Ok(self.backup()),
            Action::Restore => Ok(self.restore()),
        };

        let succeeded = match outcome {
            Ok(succeeded) => succeeded,
            Err(e) => {
                error!(action = %action, "action failed: {}", e);
                false
            }
        };
        self.inner.stats.record("perform_action", succeeded);
        Ok(succeeded)
    }

    /// Clears all data and counters and returns the status to `Running`.
    pub fn reset_service(
        &self,
        ctx: &dyn InvocationContext,
    ) -> Result<()> {
        self.admit(ctx)?;
        if !self.reset() {
            return Err(ServiceError::NotReady.into());
        }
        Ok(())
    }

    pub fn get_statistics(
        &self,
        ctx: &dyn InvocationContext,
    ) -> Result<Statistics> {
        self.admit(ctx)?;
        Ok(self.collect_statistics())
    }

    // ---------------------------------------------------------------------
    // Configuration

    /// Merges `config` into the options and broadcasts one
    /// `ConfigurationChanged` per entry.
    pub fn set_configuration(
        &self,
        ctx: &dyn InvocationContext,
        config: &IndexMap<String, ConfigValue>,
    ) -> Result<()> {
        self.admit(ctx)?;
        for name in config.keys() {
            validate_key(name)?;
        }
        self.apply_options(config);
        info!(size = config.len(), "configuration updated");
        Ok(())
    }

    pub fn get_configuration(
        &self,
        ctx: &dyn InvocationContext,
    ) -> Result<BTreeMap<String, ConfigValue>> {
        self.admit(ctx)?;
        Ok(self.inner.options.snapshot())
    }

    // ---------------------------------------------------------------------
    // Analytics

    /// Schedules an analysis and returns its id right away.
    ///
    /// The outcome arrives later as `AiAnalysisComplete` carrying the id, or
    /// as an `Error` event whose message names the id.
    pub fn analyze_data_with_ai(
        &self,
        ctx: &dyn InvocationContext,
        data: &str,
        analysis_type: &str,
    ) -> Result<String> {
        self.admit(ctx)?;
        if analysis_type.is_empty() {
            return Err(ServiceError::invalid("analysis type must not be empty").into());
        }

        let analysis_id = Uuid::new_v4().to_string();
        let service = self.clone();
        let id = analysis_id.clone();
        let data = data.to_string();
        let analysis_type = analysis_type.to_string();
        self.submit(move || service.run_analysis(&id, &data, &analysis_type))?;

        info!(analysis_id = %analysis_id, "analysis scheduled");
        Ok(analysis_id)
    }

    /// Cached result of a completed analysis.
    pub fn get_analysis_result(
        &self,
        ctx: &dyn InvocationContext,
        analysis_id: &str,
    ) -> Result<Option<String>> {
        self.admit(ctx)?;
        Ok(self.inner.analyses.get(analysis_id))
    }

    pub fn get_optimization_suggestions(
        &self,
        ctx: &dyn InvocationContext,
        context: &HashMap<String, String>,
    ) -> Result<Vec<String>> {
        self.admit(ctx)?;
        Ok(self
            .inner
            .ai
            .optimization_suggestions(context, &self.collect_statistics()))
    }

    pub fn predict_with_ai(
        &self,
        ctx: &dyn InvocationContext,
        history: &[String],
        horizon: u32,
    ) -> Result<String> {
        self.admit(ctx)?;
        self.inner.ai.predict(history, horizon).map_err(ai_failure)
    }

    /// Returns the anomaly report as JSON. When anomalies were found, the
    /// first one is also broadcast as `AnomalyDetected`.
    pub fn detect_anomalies(
        &self,
        ctx: &dyn InvocationContext,
        metrics: &HashMap<String, f64>,
    ) -> Result<String> {
        self.admit(ctx)?;
        let report = self.inner.ai.detect_anomalies(metrics).map_err(ai_failure)?;
        let details = serde_json::to_string_pretty(&report)?;

        if let Some(first) = report.anomalies.first() {
            warn!(
                anomaly = %first.anomaly_type,
                severity = first.severity,
                total = report.total_anomalies,
                "anomalies detected"
            );
            self.inner.events.publish(Event::AnomalyDetected {
                anomaly_type: first.anomaly_type.clone(),
                severity: first.severity,
                details: details.clone(),
            });
        }
        Ok(details)
    }

    /// Applies the engine's tuning profile for `target_metric`.
    /// Returns `Ok(false)` when the engine has no profile for it.
    pub fn auto_tune_with_ai(
        &self,
        ctx: &dyn InvocationContext,
        target_metric: &str,
    ) -> Result<bool> {
        self.admit(ctx)?;
        match self.inner.ai.auto_tune(target_metric).map_err(ai_failure)? {
            Some(overrides) => {
                self.apply_options(&overrides);
                info!(target_metric, "auto-tune applied");
                Ok(true)
            }
            None => {
                warn!(target_metric, "no auto-tune profile");
                Ok(false)
            }
        }
    }

    pub fn get_ai_model_info(
        &self,
        ctx: &dyn InvocationContext,
    ) -> Result<ModelInfo> {
        self.admit(ctx)?;
        Ok(self.inner.ai.model_info())
    }

    // ---------------------------------------------------------------------
    // Internals

    fn enforce_permission(
        &self,
        ctx: &dyn InvocationContext,
    ) -> Result<()> {
        let permission = &self.inner.settings.service.permission;
        if ctx.check_permission(permission) {
            return Ok(());
        }
        let caller = ctx.caller();
        warn!(pid = caller.pid, uid = caller.uid, %permission, "permission denied");
        Err(ServiceError::PermissionDenied {
            permission: permission.clone(),
        }
        .into())
    }

    fn admit(
        &self,
        ctx: &dyn InvocationContext,
    ) -> Result<()> {
        self.enforce_permission(ctx)?;
        if !self.is_ready() {
            return Err(ServiceError::NotReady.into());
        }
        Ok(())
    }

    /// Must be called with the lifecycle lock held or from a single-writer
    /// path, so the enqueued event matches the stored status.
    fn transition_status(
        &self,
        status: ServiceStatus,
    ) {
        let previous = self.inner.status.swap(status.code(), Ordering::AcqRel);
        if previous != status.code() {
            debug!(?status, "status changed");
            self.inner.events.enqueue(Event::StatusChanged {
                status,
                message: status.message().to_string(),
            });
        }
    }

    fn submit<F>(
        &self,
        task: F,
    ) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let Some(worker) = self.inner.worker.load_full() else {
            return Err(ServiceError::NotReady.into());
        };
        // Inside a notify the worker may itself be waiting on this delivery
        let submitted = if self.inner.events.is_delivering() {
            worker.try_submit(task)
        } else {
            worker.submit(task)
        };
        match submitted {
            Ok(()) => Ok(()),
            Err(Error::Worker(WorkerError::QueueFull)) => Err(ServiceError::NotReady.into()),
            Err(e) => {
                if self.is_ready() {
                    self.fail(&format!("worker rejected task: {e}"));
                }
                Err(ServiceError::NotReady.into())
            }
        }
    }

    /// Moves a ready service to `Error` after an unrecoverable internal failure.
    fn fail(
        &self,
        reason: &str,
    ) {
        {
            let mut state = self.inner.lifecycle.lock();
            if *state != LifecycleState::Ready {
                return;
            }
            error!("service failure: {}", reason);
            *state = LifecycleState::Error;
            self.transition_status(ServiceStatus::Error);
            self.inner.events.enqueue(Event::Error {
                code: ERROR_SERVICE_NOT_READY,
                message: reason.to_string(),
            });
        }
        self.inner.events.flush();
    }

    /// Returns false when the service was shut down first.
    pub(super) fn reset(&self) -> bool {
        {
            let mut state = self.inner.lifecycle.lock();
            if *state == LifecycleState::Shutdown {
                warn!("reset raced with shutdown, ignored");
                return false;
            }
            self.inner.data.clear();
            self.inner.analyses.clear();
            self.inner.stats.reset();
            let worker_alive = self.inner.worker.load_full().map(|w| w.is_running()).unwrap_or(false);
            if !worker_alive {
                match Worker::start(&self.inner.settings.worker) {
                    Ok(worker) => self.inner.worker.store(Some(Arc::new(worker))),
                    Err(e) => error!("worker restart failed: {}", e),
                }
            }
            *state = LifecycleState::Ready;
            self.transition_status(ServiceStatus::Running);
            self.inner.events.enqueue(Event::ServiceReset);
        }
        self.inner.events.flush();
        info!("service reset");
        true
    }

    fn apply_options(
        &self,
        options: &IndexMap<String, ConfigValue>,
    ) {
        {
            let _guard = self.inner.lifecycle.lock();
            for (name, value) in self.inner.options.merge(options) {
                self.inner.events.enqueue(Event::ConfigurationChanged { name, value });
            }
        }
        self.inner.events.flush();
    }

    fn ai_enabled(&self) -> bool {
        self.inner
            .options
            .get(OPTION_ENABLE_AI)
            .and_then(|v| v.as_bool())
            .unwrap_or(true)
    }

    fn collect_statistics(&self) -> Statistics {
        let counters = self.inner.stats.counters();
        let start_time = self.inner.stats.start_time();
        Statistics {
            start_time,
            uptime: now_millis() - start_time,
            total_operations: counters.total,
            successful_operations: counters.successful,
            failed_operations: counters.failed,
            data_store_size: self.inner.data.len(),
            custom_data_store_size: self.inner.data.record_count(),
            analysis_cache_size: self.inner.analyses.len(),
            callback_count: self.inner.callbacks.count(),
            pending_tasks: self.inner.worker.load_full().map(|w| w.pending()).unwrap_or(0),
            version: self.get_version().to_string(),
        }
    }

    /// Worker task: runs one analysis and reports its outcome.
    fn run_analysis(
        &self,
        analysis_id: &str,
        data: &str,
        analysis_type: &str,
    ) {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.inner.ai.analyze(data, analysis_type)));
        match outcome {
            Ok(Ok(result)) => {
                self.inner.analyses.insert(analysis_id, result.clone());
                info!(analysis_id, "analysis complete");
                self.inner.events.publish(Event::AiAnalysisComplete {
                    analysis_id: analysis_id.to_string(),
                    result,
                });
            }
            Ok(Err(e)) => self.report_analysis_failure(analysis_id, &e.to_string()),
            Err(_) => self.report_analysis_failure(analysis_id, "analysis engine panicked"),
        }
    }

    fn report_analysis_failure(
        &self,
        analysis_id: &str,
        reason: &str,
    ) {
        error!(analysis_id, "analysis failed: {}", reason);
        self.inner.events.publish(Event::Error {
            code: ERROR_AI_ANALYSIS_FAILED,
            message: format!("AI analysis {analysis_id} failed: {reason}"),
        });
    }

    /// Worker task: asks the engine for suggestions and broadcasts them.
    fn suggest(
        &self,
        category: &str,
        context: &HashMap<String, String>,
    ) {
        let suggestions = self
            .inner
            .ai
            .optimization_suggestions(context, &self.collect_statistics());
        if suggestions.is_empty() {
            return;
        }
        debug!(category, count = suggestions.len(), "publishing suggestions");
        self.inner.events.publish(Event::OptimizationSuggestion {
            category: category.to_string(),
            suggestions,
        });
    }

    fn optimize(
        &self,
        params: &ActionParams,
    ) -> Result<bool> {
        let limit = match params.get(OPTION_CACHE_SIZE) {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| ServiceError::invalid(format!("cacheSize {raw} is not a number")))?,
            None => self
                .inner
                .options
                .get(OPTION_CACHE_SIZE)
                .and_then(|v| v.as_i64())
                .unwrap_or(i64::from(self.inner.settings.defaults.cache_size)),
        };
        let limit = usize::try_from(limit).map_err(|_| ServiceError::invalid("cacheSize must not be negative"))?;
        let evicted = self.inner.analyses.trim_to(limit);
        info!(limit, evicted, "analysis cache optimized");
        Ok(true)
    }

    fn analyze_store(&self) -> Result<bool> {
        let statistics = self.collect_statistics();
        let mut context = HashMap::new();
        context.insert("scope".to_string(), "store".to_string());
        context.insert("entries".to_string(), statistics.data_store_size.to_string());
        context.insert("records".to_string(), statistics.custom_data_store_size.to_string());
        let service = self.clone();
        self.submit(move || service.suggest(STORE_ANALYSIS_CATEGORY, &context))?;
        Ok(true)
    }

    fn backup(&self) -> bool {
        let snapshot = self.inner.data.snapshot();
        info!(
            entries = snapshot.entries.len(),
            records = snapshot.records.len(),
            "backup taken"
        );
        *self.inner.backup.lock() = Some(snapshot);
        true
    }

    fn restore(&self) -> bool {
        let snapshot = self.inner.backup.lock().clone();
        let Some(snapshot) = snapshot else {
            warn!("restore requested without a backup");
            return false;
        };
        self.inner.data.restore(&snapshot);
        info!(entries = snapshot.entries.len(), "backup restored");
        let (keys, values) = snapshot.entries.into_iter().unzip();
        self.inner
            .events
            .publish(Event::BatchDataUpdated { keys, values });
        true
    }
}

fn ai_failure(err: crate::Error) -> crate::Error {
    ServiceError::AiAnalysisFailed(err.to_string()).into()
}
