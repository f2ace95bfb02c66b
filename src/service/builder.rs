//! A builder for constructing a [`CustomService`].
//!
//! The builder starts from a [`ServiceConfig`] and the bundled
//! [`RuleBasedAssistant`]; hosts can swap the analytics engine before
//! `build()`. The built service is in the `Constructed` state: call
//! `system_ready()` once the platform is up.
//!
//! ## Example
//! ```ignore
//! let service = ServiceBuilder::from_env()?
//!     .ai_engine(Arc::new(MyEngine::default())) // Optional override
//!     .build();
//! service.system_ready()?;
//! ```

use std::sync::Arc;

use tracing::info;

use super::CustomService;
use crate::metrics::register_custom_metrics;
use crate::AiEngine;
use crate::Result;
use crate::RuleBasedAssistant;
use crate::ServiceConfig;

pub struct ServiceBuilder {
    config: ServiceConfig,
    ai: Option<Arc<dyn AiEngine>>,
}

impl ServiceBuilder {
    /// Constructs a builder from an in-memory configuration
    pub fn new(config: ServiceConfig) -> Self {
        Self { config, ai: None }
    }

    /// Loads configuration from `CONFIG_PATH` and `CUSTOM__*` variables,
    /// then validates it.
    pub fn from_env() -> Result<Self> {
        let config = ServiceConfig::new()?.validate()?;
        Ok(Self::new(config))
    }

    /// Applies an override file on top of the current configuration
    pub fn with_override_config(
        mut self,
        path: &str,
    ) -> Result<Self> {
        info!("with_override_config from: {}", path);
        self.config = self.config.with_override_config(path)?.validate()?;
        Ok(self)
    }

    /// Sets a custom analytics engine
    pub fn ai_engine(
        mut self,
        ai: Arc<dyn AiEngine>,
    ) -> Self {
        self.ai = Some(ai);
        self
    }

    pub fn build(self) -> CustomService {
        register_custom_metrics();
        let ai: Arc<dyn AiEngine> = match self.ai {
            Some(ai) => ai,
            None => Arc::new(RuleBasedAssistant::new(self.config.ai.clone())),
        };
        info!(version = %self.config.service.version, "service constructed");
        CustomService::from_parts(self.config, ai)
    }
}
