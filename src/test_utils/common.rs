use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use crossbeam_channel::Receiver;

use crate::AiEngine;
use crate::CallerIdentity;
use crate::CustomService;
use crate::Event;
use crate::MockAiEngine;
use crate::ServiceBuilder;
use crate::ServiceConfig;
use crate::StaticContext;

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    let _ = env_logger::builder().is_test(true).try_init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
}

pub const TEST_CALLER: CallerIdentity = CallerIdentity { pid: 4242, uid: 10_001 };

/// Caller holding the service permission.
pub fn granted() -> StaticContext {
    StaticContext::with_permissions(TEST_CALLER, ["ACCESS_CUSTOM_SERVICE"])
}

/// Caller holding no permission.
pub fn denied() -> StaticContext {
    StaticContext::unprivileged(TEST_CALLER)
}

/// Default-configured service after `system_ready`.
pub fn ready_service() -> CustomService {
    enable_logger();
    let service = ServiceBuilder::new(ServiceConfig::default()).build();
    service.system_ready().unwrap();
    service
}

/// Service backed by `ai`, after `system_ready`.
pub fn ready_service_with(ai: impl AiEngine) -> CustomService {
    enable_logger();
    let service = ServiceBuilder::new(ServiceConfig::default())
        .ai_engine(Arc::new(ai))
        .build();
    service.system_ready().unwrap();
    service
}

/// Mock engine that initializes, shuts down and returns no suggestions.
pub fn quiet_ai() -> MockAiEngine {
    let mut ai = MockAiEngine::new();
    ai.expect_initialize().returning(|| Ok(()));
    ai.expect_shutdown().return_const(());
    ai.expect_optimization_suggestions().returning(|_, _| Vec::new());
    ai
}

/// Receives until `matches` accepts an event or `timeout` elapses.
pub fn wait_for<F>(
    rx: &Receiver<Event>,
    timeout: Duration,
    mut matches: F,
) -> Option<Event>
where
    F: FnMut(&Event) -> bool,
{
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.checked_duration_since(Instant::now())?;
        match rx.recv_timeout(remaining) {
            Ok(event) if matches(&event) => return Some(event),
            Ok(_) => continue,
            Err(_) => return None,
        }
    }
}

/// Everything already delivered.
pub fn drain(rx: &Receiver<Event>) -> Vec<Event> {
    rx.try_iter().collect()
}
