use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;
use std::time::Instant;

use crossbeam_channel::Receiver;
use custom_service::CallbackError;
use custom_service::CallerIdentity;
use custom_service::CustomService;
use custom_service::DeathRecipient;
use custom_service::Event;
use custom_service::ServiceBuilder;
use custom_service::ServiceConfig;
use custom_service::StaticContext;
use custom_service::Subscriber;
use custom_service::SubscriberId;

pub const WAIT: Duration = Duration::from_secs(5);

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    let _ = env_logger::builder().is_test(true).try_init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
}

pub fn app_context() -> StaticContext {
    StaticContext::with_permissions(
        CallerIdentity { pid: 1200, uid: 10_057 },
        ["ACCESS_CUSTOM_SERVICE"],
    )
}

/// Service with AI change analysis switched off, so event streams only carry
/// what the test itself triggers.
pub fn constructed_service() -> CustomService {
    enable_logger();
    let mut config = ServiceConfig::default();
    config.defaults.enable_ai = false;
    ServiceBuilder::new(config).build()
}

pub fn started_service() -> CustomService {
    let service = constructed_service();
    service.system_ready().expect("service should start");
    service
}

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

/// Subscriber whose every delivery fails with a transport error.
pub struct BrokenSubscriber {
    pub id: SubscriberId,
    pub attempts: AtomicUsize,
}

impl BrokenSubscriber {
    pub fn new(id: SubscriberId) -> Self {
        Self {
            id,
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Subscriber for BrokenSubscriber {
    fn id(&self) -> SubscriberId {
        self.id
    }

    fn notify(
        &self,
        _event: &Event,
    ) -> Result<(), CallbackError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(CallbackError::Transport("connection reset".to_string()))
    }

    fn link_to_death(
        &self,
        _recipient: DeathRecipient,
    ) -> Result<(), CallbackError> {
        Ok(())
    }

    fn unlink_to_death(&self) {}
}
