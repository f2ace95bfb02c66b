//! Custom Service Error Hierarchy
//!
//! Callers of the service facade only ever observe [`ServiceError`], whose
//! numeric [`ServiceError::code`] is the stable wire contract. The remaining
//! enums describe failures of internal components (registry, worker, analytics
//! engine) and are folded into that surface by the facade.

use config::ConfigError;

use crate::constants::ERROR_AI_ANALYSIS_FAILED;
use crate::constants::ERROR_INVALID_PARAMETER;
use crate::constants::ERROR_PERMISSION_DENIED;
use crate::constants::ERROR_SERVICE_NOT_READY;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Errors reported to callers of the service facade
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Subscriber registration and delivery failures
    #[error(transparent)]
    Callback(#[from] CallbackError),

    /// Background worker failures
    #[error(transparent)]
    Worker(#[from] WorkerError),

    /// Analytics engine failures
    #[error(transparent)]
    Ai(#[from] AiError),

    /// Configuration loading and validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// JSON encoding of analysis reports and event payloads
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Binary record codec failures
    #[error("Record codec error: {0}")]
    Codec(#[from] bincode::Error),

    /// Unrecoverable failures requiring process termination
    #[error("Fatal error: {0}")]
    Fatal(String),
}

impl Error {
    /// Numeric code this error surfaces as across the service boundary.
    pub fn code(&self) -> i32 {
        match self {
            Error::Service(e) => e.code(),
            Error::Callback(CallbackError::RegistryClosed) => ERROR_SERVICE_NOT_READY,
            Error::Callback(_) => ERROR_INVALID_PARAMETER,
            Error::Worker(_) => ERROR_SERVICE_NOT_READY,
            Error::Ai(_) => ERROR_AI_ANALYSIS_FAILED,
            Error::Config(_) | Error::Codec(_) => ERROR_INVALID_PARAMETER,
            Error::Serialization(_) => ERROR_AI_ANALYSIS_FAILED,
            Error::Fatal(_) => ERROR_SERVICE_NOT_READY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The caller does not hold the service permission
    #[error("Permission denial: requires {permission}")]
    PermissionDenied { permission: String },

    /// Empty key, empty analysis type, malformed input
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// `system_ready` has not completed, or the service was shut down
    #[error("Service not ready")]
    NotReady,

    /// Synchronous analytics failure
    #[error("AI analysis failed: {0}")]
    AiAnalysisFailed(String),

    /// A lifecycle transition was requested from the wrong state
    #[error("Illegal state: {0}")]
    IllegalState(String),
}

impl ServiceError {
    pub fn code(&self) -> i32 {
        match self {
            ServiceError::PermissionDenied { .. } => ERROR_PERMISSION_DENIED,
            ServiceError::InvalidParameter(_) => ERROR_INVALID_PARAMETER,
            ServiceError::NotReady | ServiceError::IllegalState(_) => ERROR_SERVICE_NOT_READY,
            ServiceError::AiAnalysisFailed(_) => ERROR_AI_ANALYSIS_FAILED,
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ServiceError::InvalidParameter(reason.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallbackError {
    /// The registry has been killed and accepts no further subscribers
    #[error("Callback registry is closed")]
    RegistryClosed,

    /// The subscriber's process is gone
    #[error("Subscriber is dead")]
    PeerDead,

    /// Delivery failed for any other reason
    #[error("Delivery failed: {0}")]
    Transport(String),
}

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The worker no longer accepts tasks
    #[error("Worker has been shut down")]
    ShutDown,

    /// A bounded queue had no room and the caller could not wait
    #[error("Worker queue is full")]
    QueueFull,

    #[error("Failed to spawn worker thread: {0}")]
    SpawnFailed(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AiError {
    #[error("AI engine is not initialized")]
    NotInitialized,

    #[error("Analysis error: {0}")]
    Analysis(String),
}
