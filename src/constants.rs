// Error codes surfaced to service callers
pub const ERROR_PERMISSION_DENIED: i32 = 1000;
pub const ERROR_INVALID_PARAMETER: i32 = 1001;
pub const ERROR_SERVICE_NOT_READY: i32 = 1002;
pub const ERROR_AI_ANALYSIS_FAILED: i32 = 1003;

pub const DEFAULT_SERVICE_VERSION: &str = "1.0.0-AI-Enhanced";
pub const DEFAULT_SERVICE_PERMISSION: &str = "ACCESS_CUSTOM_SERVICE";
pub const DEFAULT_WORKER_THREAD_NAME: &str = "custom-service-worker";

// Runtime option names seeded by `system_ready`
pub const OPTION_ENABLE_AI: &str = "enableAI";
pub const OPTION_CACHE_SIZE: &str = "cacheSize";
pub const OPTION_WORKER_THREADS: &str = "workerThreads";
pub const OPTION_LOG_LEVEL: &str = "logLevel";

pub(crate) const DATA_CHANGE_CATEGORY: &str = "data_change";
pub(crate) const STORE_ANALYSIS_CATEGORY: &str = "store_analysis";
pub(crate) const CUSTOM_DATA_UPDATED: &str = "customDataUpdated";
pub(crate) const CUSTOM_DATA_REMOVED: &str = "customDataRemoved";
