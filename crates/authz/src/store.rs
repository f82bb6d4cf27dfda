//! Read-only storage seams the authorization core depends on.
//!
//! Role and membership rows are owned and mutated elsewhere (admin
//! consoles); here they are only ever read, fresh, once per request.

use std::collections::BTreeSet;

use async_trait::async_trait;
use thiserror::Error;

use postdesk_core::{PrincipalId, TenantId};

use crate::Role;

/// Failure reading a collaborator store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Authoritative principal records.
#[async_trait]
pub trait PrincipalDirectory: Send + Sync {
    /// Current role of a principal.
    ///
    /// `Ok(None)` when the principal does not exist or is soft-deleted;
    /// soft-deleted principals must never resolve a role.
    async fn find_role(&self, principal_id: PrincipalId) -> Result<Option<Role>, StoreError>;
}

/// Membership rows linking tenant-scoped principals to the tenants they may
/// access.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Every tenant id granted to the principal.
    ///
    /// Implementations must return the complete set — no pagination cap.
    /// Duplicate rows collapse in the set.
    async fn tenant_ids(&self, principal_id: PrincipalId)
    -> Result<BTreeSet<TenantId>, StoreError>;
}
