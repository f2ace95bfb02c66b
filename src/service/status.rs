use serde::Serialize;

/// Externally visible service status, reported by its integer code.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ServiceStatus {
    Idle = 0,
    Running = 1,
    Error = 2,
}

impl ServiceStatus {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(ServiceStatus::Idle),
            1 => Some(ServiceStatus::Running),
            2 => Some(ServiceStatus::Error),
            _ => None,
        }
    }

    /// Message carried by `StatusChanged` events.
    pub fn message(self) -> &'static str {
        match self {
            ServiceStatus::Idle => "Idle",
            ServiceStatus::Running => "Running",
            ServiceStatus::Error => "Error",
        }
    }
}

/// Internal lifecycle of the service.
///
/// ```text
/// Constructed --system_ready--> Ready --shutdown--> Shutdown
///      |                          |  ^
///      | init failure   internal  |  | reset
///      v                failure   v  |
///    Error <------------------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Constructed,
    Ready,
    Error,
    Shutdown,
}
