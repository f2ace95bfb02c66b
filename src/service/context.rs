use std::collections::HashSet;

#[cfg(test)]
use mockall::automock;

/// Identity of the process invoking the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CallerIdentity {
    pub pid: u32,
    pub uid: u32,
}

/// Host-provided view of the current invocation.
///
/// The host decides what a permission check means; the service only asks.
#[cfg_attr(test, automock)]
pub trait InvocationContext: Send + Sync {
    fn caller(&self) -> CallerIdentity;

    fn check_permission(
        &self,
        permission: &str,
    ) -> bool;
}

/// Fixed caller with a fixed set of granted permissions.
#[derive(Debug, Clone, Default)]
pub struct StaticContext {
    caller: CallerIdentity,
    grant_all: bool,
    granted: HashSet<String>,
}

impl StaticContext {
    /// In-process caller holding every permission.
    pub fn system() -> Self {
        Self {
            caller: CallerIdentity {
                pid: std::process::id(),
                uid: 0,
            },
            grant_all: true,
            granted: HashSet::new(),
        }
    }

    pub fn with_permissions<I, S>(
        caller: CallerIdentity,
        permissions: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            caller,
            grant_all: false,
            granted: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// Caller holding no permission at all.
    pub fn unprivileged(caller: CallerIdentity) -> Self {
        Self {
            caller,
            ..Self::default()
        }
    }
}

impl InvocationContext for StaticContext {
    fn caller(&self) -> CallerIdentity {
        self.caller
    }

    fn check_permission(
        &self,
        permission: &str,
    ) -> bool {
        self.grant_all || self.granted.contains(permission)
    }
}
