use std::sync::Once;

use lazy_static::lazy_static;
use prometheus::Encoder;
use prometheus::IntCounter;
use prometheus::IntCounterVec;
use prometheus::IntGauge;
use prometheus::Opts;
use prometheus::Registry;
use prometheus::TextEncoder;
use tracing::error;


lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    pub static ref OPERATIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("custom_service_operations_total", "Counted facade operations"),
        &["op", "outcome"]
    )
    .expect("metric can not be created");

    pub static ref REGISTERED_CALLBACKS: IntGauge = IntGauge::new(
        "custom_service_callbacks",
        "Currently registered subscribers"
    )
    .expect("metric can not be created");

    pub static ref BROADCAST_FAILURES: IntCounter = IntCounter::new(
        "custom_service_broadcast_failures_total",
        "Deliveries that failed and pruned their subscriber"
    )
    .expect("metric can not be created");

    pub static ref WORKER_TASKS: IntCounterVec = IntCounterVec::new(
        Opts::new("custom_service_worker_tasks_total", "Background tasks executed"),
        &["outcome"]
    )
    .expect("metric can not be created");
}

static REGISTER: Once = Once::new();

pub fn register_custom_metrics() {
    REGISTER.call_once(|| {
        let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(OPERATIONS_TOTAL.clone()),
            Box::new(REGISTERED_CALLBACKS.clone()),
            Box::new(BROADCAST_FAILURES.clone()),
            Box::new(WORKER_TASKS.clone()),
        ];
        for collector in collectors {
            if let Err(e) = REGISTRY.register(collector) {
                error!("collector can not be registered: {:?}", e);
            }
        }
    });
}

/// Renders every registered metric in the Prometheus text format.
pub fn gather_metrics() -> String {
    register_custom_metrics();
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        error!("could not encode metrics: {:?}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
