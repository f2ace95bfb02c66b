//! Configuration management for the custom platform service.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base
//! - Environment variable overrides
//! - Configuration file support
//! - Component-wise validation
mod ai;
mod defaults;
mod service;
mod worker;
pub use ai::*;
pub use defaults::*;
pub use service::*;
pub use worker::*;

use std::env;
use std::fmt::Debug;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Main configuration container for the service components
///
/// Combines all subsystem configurations with hierarchical override support:
/// 1. Default values from code implementation
/// 2. Configuration file specified by `CONFIG_PATH`
/// 3. Environment variables with `CUSTOM__` prefix (highest priority)
#[derive(Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ServiceConfig {
    /// Identity and access control of the service
    #[serde(default)]
    pub service: ServiceSettings,
    /// Background worker parameters
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Runtime options seeded into the configuration store at startup
    #[serde(default)]
    pub defaults: DefaultOptions,
    /// Rule-based analytics engine parameters
    #[serde(default)]
    pub ai: AiConfig,
}

impl Debug for ServiceConfig {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("service", &self.service)
            .field("worker", &self.worker)
            .finish()
    }
}

impl ServiceConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// Callers MUST call `validate()` before handing the result to the
    /// service builder.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("CUSTOM__WORKER__QUEUE_CAPACITY", "64");
    /// let cfg = ServiceConfig::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(environment());

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies additional overrides from a file, then from the environment.
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Consumes self and validates every section.
    pub fn validate(self) -> Result<Self> {
        self.service.validate()?;
        self.worker.validate()?;
        self.defaults.validate()?;
        self.ai.validate()?;
        Ok(self)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("CUSTOM")
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}

pub(crate) fn invalid_config(reason: impl Into<String>) -> Error {
    Error::Config(ConfigError::Message(reason.into()))
}
