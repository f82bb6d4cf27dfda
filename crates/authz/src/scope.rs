//! Query scoping: narrowing a base query to the caller's access set.

use std::collections::BTreeSet;

use postdesk_core::TenantId;

use crate::{AccessSet, AuthzError};

/// Tenant restriction attached to a query.
///
/// `Never` exists so an empty access set renders as an always-false
/// predicate: a naive empty `IN ()` is read by some query engines as "no
/// restriction", which is exactly the leak this type closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantPredicate {
    /// No tenant restriction.
    All,
    /// Rows owned by exactly this tenant.
    Eq(TenantId),
    /// Rows owned by any of these tenants. Never empty — an empty access
    /// set becomes `Never` instead.
    In(BTreeSet<TenantId>),
    /// Matches no row.
    Never,
}

impl TenantPredicate {
    /// Row-wise evaluation (used by in-memory stores).
    pub fn matches(&self, tenant_id: TenantId) -> bool {
        match self {
            TenantPredicate::All => true,
            TenantPredicate::Eq(id) => *id == tenant_id,
            TenantPredicate::In(ids) => ids.contains(&tenant_id),
            TenantPredicate::Never => false,
        }
    }
}

/// A tenant predicate bound to the column holding the owning tenant's id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantFilter {
    pub column: String,
    pub predicate: TenantPredicate,
}

/// A caller's base query plus the tenant restriction the gate decided on.
///
/// Generic over the query representation: the store layer renders the
/// filter into SQL, in-memory stores evaluate it row-wise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedQuery<Q> {
    pub query: Q,
    pub filter: TenantFilter,
}

/// Decide the tenant restriction for a list request.
///
/// | requested | access            | result              |
/// |-----------|-------------------|---------------------|
/// | Some(t)   | Unrestricted      | `Eq(t)`             |
/// | Some(t)   | set containing t  | `Eq(t)`             |
/// | Some(t)   | set without t     | `Err(Forbidden)`    |
/// | None      | Unrestricted      | `All`               |
/// | None      | empty set         | `Never` (zero rows) |
/// | None      | non-empty set     | `In(set)`           |
///
/// `Forbidden` carries no detail: whether the tenant exists at all must not
/// be observable from the response.
pub fn scope_access(
    access: &AccessSet,
    requested: Option<TenantId>,
) -> Result<TenantPredicate, AuthzError> {
    match (requested, access) {
        (Some(tenant_id), AccessSet::Unrestricted) => Ok(TenantPredicate::Eq(tenant_id)),
        (Some(tenant_id), AccessSet::Scoped(ids)) => {
            if ids.contains(&tenant_id) {
                Ok(TenantPredicate::Eq(tenant_id))
            } else {
                Err(AuthzError::Forbidden)
            }
        }
        (None, AccessSet::Unrestricted) => Ok(TenantPredicate::All),
        (None, AccessSet::Scoped(ids)) => {
            if ids.is_empty() {
                Ok(TenantPredicate::Never)
            } else {
                Ok(TenantPredicate::In(ids.clone()))
            }
        }
    }
}
