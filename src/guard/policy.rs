//! Route policy table: ordered `(path prefix, allowed roles)` entries.
//!
//! Lookup is a linear scan in declared order and the first entry whose prefix
//! matches wins, even if a later entry is more specific. Entry order therefore
//! matters: put narrower prefixes before the broader ones they overlap.

use thiserror::Error;

pub const ROLE_EMPLOYEE: &str = "Employee";
pub const ROLE_ADMIN: &str = "Admin";
pub const ROLE_SUPER_ADMIN: &str = "Super Admin";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("policy prefix must start with '/': {0:?}")]
    InvalidPrefix(String),
    #[error("policy for {0} has no roles")]
    EmptyRoles(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicy {
    prefix: String,
    roles: Vec<String>,
}

impl RoutePolicy {
    pub fn new<P, I, R>(prefix: P, roles: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self {
            prefix: prefix.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    /// True when at least one of `roles` is allowed by this entry.
    #[must_use]
    pub fn allows(&self, roles: &[String]) -> bool {
        roles.iter().any(|role| self.roles.contains(role))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicyTable {
    entries: Vec<RoutePolicy>,
}

impl RoutePolicyTable {
    /// Build a table, keeping the given order.
    ///
    /// # Errors
    /// Returns an error if a prefix does not start with `/` or an entry has no roles.
    pub fn new(entries: Vec<RoutePolicy>) -> Result<Self, PolicyError> {
        for entry in &entries {
            if !entry.prefix.starts_with('/') {
                return Err(PolicyError::InvalidPrefix(entry.prefix.clone()));
            }
            if entry.roles.is_empty() {
                return Err(PolicyError::EmptyRoles(entry.prefix.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// First entry whose prefix matches `path`.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&RoutePolicy> {
        self.entries.iter().find(|entry| entry.matches(path))
    }

    #[must_use]
    pub fn entries(&self) -> &[RoutePolicy] {
        &self.entries
    }

    /// Dashboard policies for the HRMS screens.
    #[must_use]
    pub fn hrms() -> Self {
        let admins = [ROLE_ADMIN, ROLE_SUPER_ADMIN];
        let everyone = [ROLE_EMPLOYEE, ROLE_ADMIN, ROLE_SUPER_ADMIN];

        Self {
            entries: vec![
                RoutePolicy::new("/dashboard/admin", admins),
                RoutePolicy::new("/dashboard/list/users", admins),
                RoutePolicy::new("/dashboard/list/employees", admins),
                RoutePolicy::new("/dashboard/company", admins),
                RoutePolicy::new("/dashboard/register", admins),
                RoutePolicy::new("/dashboard/dash", everyone),
                RoutePolicy::new("/dashboard/attendance", everyone),
                RoutePolicy::new("/dashboard/leave", everyone),
            ],
        }
    }
}

impl Default for RoutePolicyTable {
    fn default() -> Self {
        Self::hrms()
    }
}
