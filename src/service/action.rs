use std::collections::HashMap;
use std::fmt;

/// String parameters accompanying an action.
pub type ActionParams = HashMap<String, String>;

/// Named maintenance actions accepted by `perform_action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Full service reset
    Reset,
    /// Trim the analysis cache to the `cacheSize` option
    Optimize,
    /// Schedule a background analysis of the whole store
    Analyze,
    /// Copy the data and record stores into the backup slot
    Backup,
    /// Replace the stores with the backup slot
    Restore,
}

impl Action {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "reset" => Some(Action::Reset),
            "optimize" => Some(Action::Optimize),
            "analyze" => Some(Action::Analyze),
            "backup" => Some(Action::Backup),
            "restore" => Some(Action::Restore),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Reset => "reset",
            Action::Optimize => "optimize",
            Action::Analyze => "analyze",
            Action::Backup => "backup",
            Action::Restore => "restore",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}
