use serde::Deserialize;
use serde::Serialize;

use super::invalid_config;
use crate::constants::DEFAULT_SERVICE_PERMISSION;
use crate::constants::DEFAULT_SERVICE_VERSION;
use crate::Result;

/// Identity and access control of the service
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServiceSettings {
    /// Version string reported by `get_version`
    #[serde(default = "default_version")]
    pub version: String,

    /// Permission every gated caller must hold
    #[serde(default = "default_permission")]
    pub permission: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            permission: default_permission(),
        }
    }
}

impl ServiceSettings {
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(invalid_config("service.version must not be empty"));
        }
        if self.permission.trim().is_empty() {
            return Err(invalid_config("service.permission must not be empty"));
        }
        Ok(())
    }
}

fn default_version() -> String {
    DEFAULT_SERVICE_VERSION.to_string()
}
fn default_permission() -> String {
    DEFAULT_SERVICE_PERMISSION.to_string()
}
