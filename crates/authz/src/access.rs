//! Per-request tenant access computation.

use std::collections::BTreeSet;
use std::sync::Arc;

use postdesk_core::{PrincipalId, TenantId};

use crate::{MembershipStore, Role, RoleClass, RoleConfig, StoreError};

/// The tenants a principal may touch for one request.
///
/// A tagged variant so "everything" can never be confused with an empty
/// enumeration — `Unrestricted` is not an empty set, and an empty set is
/// not "no restriction".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessSet {
    /// Staff sentinel: every tenant, no enumeration performed.
    Unrestricted,
    /// Exactly these tenants (possibly none).
    Scoped(BTreeSet<TenantId>),
}

impl AccessSet {
    /// Empty scoped set — authenticated, authorized for nothing.
    pub fn none() -> Self {
        AccessSet::Scoped(BTreeSet::new())
    }

    pub fn covers(&self, tenant_id: TenantId) -> bool {
        match self {
            AccessSet::Unrestricted => true,
            AccessSet::Scoped(ids) => ids.contains(&tenant_id),
        }
    }
}

/// Computes the access set from the role class and membership rows.
///
/// Computed fresh per request and discarded with it; membership changes take
/// effect on the next request without any invalidation machinery.
pub struct TenantAccessResolver {
    memberships: Arc<dyn MembershipStore>,
    config: RoleConfig,
}

impl TenantAccessResolver {
    pub fn new(memberships: Arc<dyn MembershipStore>, config: RoleConfig) -> Self {
        Self {
            memberships,
            config,
        }
    }

    pub fn config(&self) -> &RoleConfig {
        &self.config
    }

    /// Resolve the access set for `principal_id` acting as `role`.
    ///
    /// Only tenant-scoped roles read the membership store: unrestricted
    /// principals must not force a membership scan, and no-access principals
    /// get the empty set even if stale membership rows exist for them —
    /// role, not leftover rows, is authoritative.
    ///
    /// A membership store failure propagates (fail closed). Access-set
    /// correctness is never traded for availability, in contrast with role
    /// resolution.
    pub async fn allowed_tenants(
        &self,
        principal_id: PrincipalId,
        role: &Role,
    ) -> Result<AccessSet, StoreError> {
        match self.config.classify(role) {
            RoleClass::Unrestricted => Ok(AccessSet::Unrestricted),
            RoleClass::TenantScoped => {
                let ids = self.memberships.tenant_ids(principal_id).await?;
                Ok(AccessSet::Scoped(ids))
            }
            RoleClass::NoAccess => Ok(AccessSet::none()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use proptest::prelude::*;

    use super::*;

    /// Counts lookups so tests can assert the store was never touched.
    struct CountingMemberships {
        rows: Vec<(PrincipalId, TenantId)>,
        lookups: AtomicUsize,
    }

    impl CountingMemberships {
        fn new(rows: Vec<(PrincipalId, TenantId)>) -> Self {
            Self {
                rows,
                lookups: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MembershipStore for CountingMemberships {
        async fn tenant_ids(
            &self,
            principal_id: PrincipalId,
        ) -> Result<BTreeSet<TenantId>, StoreError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .rows
                .iter()
                .filter(|(p, _)| *p == principal_id)
                .map(|(_, t)| *t)
                .collect())
        }
    }

    struct DownMemberships;

    #[async_trait]
    impl MembershipStore for DownMemberships {
        async fn tenant_ids(&self, _: PrincipalId) -> Result<BTreeSet<TenantId>, StoreError> {
            Err(StoreError::Unavailable("timeout".to_string()))
        }
    }

    fn rows(principal: i64, tenants: &[i64]) -> Vec<(PrincipalId, TenantId)> {
        tenants
            .iter()
            .map(|t| (PrincipalId::new(principal), TenantId::new(*t)))
            .collect()
    }

    #[tokio::test]
    async fn unrestricted_skips_membership_scan() {
        let store = Arc::new(CountingMemberships::new(rows(1, &[3, 4])));
        let resolver = TenantAccessResolver::new(store.clone(), RoleConfig::default());

        let access = resolver
            .allowed_tenants(PrincipalId::new(1), &Role::new("admin"))
            .await
            .unwrap();

        assert_eq!(access, AccessSet::Unrestricted);
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn no_access_ignores_stale_membership_rows() {
        let store = Arc::new(CountingMemberships::new(rows(7, &[3])));
        let resolver = TenantAccessResolver::new(store.clone(), RoleConfig::default());

        let access = resolver
            .allowed_tenants(PrincipalId::new(7), &Role::new("ex-employee"))
            .await
            .unwrap();

        assert_eq!(access, AccessSet::none());
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn tenant_scoped_collects_deduplicated_memberships() {
        let store = Arc::new(CountingMemberships::new(rows(42, &[3, 9, 3])));
        let resolver = TenantAccessResolver::new(store, RoleConfig::default());

        let access = resolver
            .allowed_tenants(PrincipalId::new(42), &Role::new("clientuser"))
            .await
            .unwrap();

        let expected: BTreeSet<TenantId> = [TenantId::new(3), TenantId::new(9)].into();
        assert_eq!(access, AccessSet::Scoped(expected));
    }

    #[tokio::test]
    async fn tenant_scoped_with_no_memberships_is_empty_not_unrestricted() {
        let store = Arc::new(CountingMemberships::new(Vec::new()));
        let resolver = TenantAccessResolver::new(store, RoleConfig::default());

        let access = resolver
            .allowed_tenants(PrincipalId::new(42), &Role::new("clientuser"))
            .await
            .unwrap();

        assert_eq!(access, AccessSet::none());
    }

    #[tokio::test]
    async fn membership_store_failure_propagates() {
        let resolver = TenantAccessResolver::new(Arc::new(DownMemberships), RoleConfig::default());

        let result = resolver
            .allowed_tenants(PrincipalId::new(42), &Role::new("clientuser"))
            .await;

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    proptest! {
        // Row order and duplication never change the computed set.
        #[test]
        fn access_set_is_stable_under_row_order_and_duplication(
            tenants in proptest::collection::vec(1i64..100, 0..20),
            seed in any::<u64>(),
        ) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();

            let principal = PrincipalId::new(42);
            let base = rows(42, &tenants);

            let mut shuffled = base.clone();
            // Deterministic pseudo-shuffle plus a duplicated prefix.
            let rotate_by = (seed as usize) % shuffled.len().max(1);
            shuffled.rotate_left(rotate_by);
            let dup_count = (seed as usize) % (shuffled.len() + 1);
            let dups: Vec<_> = shuffled.iter().take(dup_count).copied().collect();
            shuffled.extend(dups);

            let a = rt.block_on(async {
                TenantAccessResolver::new(
                    Arc::new(CountingMemberships::new(base)),
                    RoleConfig::default(),
                )
                .allowed_tenants(principal, &Role::new("clientuser"))
                .await
                .unwrap()
            });
            let b = rt.block_on(async {
                TenantAccessResolver::new(
                    Arc::new(CountingMemberships::new(shuffled)),
                    RoleConfig::default(),
                )
                .allowed_tenants(principal, &Role::new("clientuser"))
                .await
                .unwrap()
            });

            prop_assert_eq!(a, b);
        }
    }
}
