//! Role model and the role → capability-class partition.

use std::borrow::Cow;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Role tag attached to a principal.
///
/// Roles are intentionally opaque strings at this layer; what a role may do
/// is decided by [`RoleConfig::classify`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capability class of a role. Every role belongs to exactly one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleClass {
    /// Staff: may access every tenant without restriction.
    Unrestricted,
    /// May access only tenants linked via membership rows.
    TenantScoped,
    /// Authenticated but authorized for nothing.
    NoAccess,
}

/// Static role-class configuration: two disjoint role-name lists.
///
/// Any role name present in neither list classifies as [`RoleClass::NoAccess`]
/// — unknown roles never gain access.
#[derive(Debug, Clone)]
pub struct RoleConfig {
    unrestricted: HashSet<String>,
    tenant_scoped: HashSet<String>,
}

impl RoleConfig {
    /// Invariant: the two lists are disjoint. A name accidentally present in
    /// both gets the narrower grant (tenant-scoped wins in `classify`).
    pub fn new<U, T>(unrestricted: U, tenant_scoped: T) -> Self
    where
        U: IntoIterator,
        U::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            unrestricted: unrestricted.into_iter().map(Into::into).collect(),
            tenant_scoped: tenant_scoped.into_iter().map(Into::into).collect(),
        }
    }

    /// Partition a role into its capability class.
    ///
    /// Pure and total: no I/O, no failure path, and every input maps to
    /// exactly one class.
    pub fn classify(&self, role: &Role) -> RoleClass {
        if self.tenant_scoped.contains(role.as_str()) {
            RoleClass::TenantScoped
        } else if self.unrestricted.contains(role.as_str()) {
            RoleClass::Unrestricted
        } else {
            RoleClass::NoAccess
        }
    }
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self::new(["admin", "staff"], ["clientadmin", "clientuser"])
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn staff_roles_classify_unrestricted() {
        let config = RoleConfig::default();
        assert_eq!(config.classify(&Role::new("admin")), RoleClass::Unrestricted);
        assert_eq!(config.classify(&Role::new("staff")), RoleClass::Unrestricted);
    }

    #[test]
    fn client_roles_classify_tenant_scoped() {
        let config = RoleConfig::default();
        assert_eq!(
            config.classify(&Role::new("clientadmin")),
            RoleClass::TenantScoped
        );
        assert_eq!(
            config.classify(&Role::new("clientuser")),
            RoleClass::TenantScoped
        );
    }

    #[test]
    fn unknown_roles_classify_no_access() {
        let config = RoleConfig::default();
        assert_eq!(config.classify(&Role::new("billing")), RoleClass::NoAccess);
        assert_eq!(config.classify(&Role::new("")), RoleClass::NoAccess);
        assert_eq!(config.classify(&Role::new("Admin")), RoleClass::NoAccess);
    }

    #[test]
    fn name_in_both_lists_gets_narrower_grant() {
        let config = RoleConfig::new(["ops"], ["ops"]);
        assert_eq!(config.classify(&Role::new("ops")), RoleClass::TenantScoped);
    }

    proptest! {
        // Fail closed: any role outside the configured lists has no access.
        #[test]
        fn arbitrary_unknown_roles_have_no_access(name in "\\PC*") {
            let config = RoleConfig::default();
            prop_assume!(
                !["admin", "staff", "clientadmin", "clientuser"].contains(&name.as_str())
            );
            prop_assert_eq!(config.classify(&Role::new(name)), RoleClass::NoAccess);
        }
    }
}
