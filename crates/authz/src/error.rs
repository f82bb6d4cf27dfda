//! Authorization error taxonomy.

use thiserror::Error;

use crate::StoreError;

/// Terminal authorization outcome for a request.
///
/// An empty result is deliberately *not* here: a correctly scoped query that
/// structurally returns zero rows is a success
/// ([`crate::TenantPredicate::Never`]), indistinguishable from "query ran
/// and found nothing".
#[derive(Debug, Error)]
pub enum AuthzError {
    /// No live session. Precedes all role and tenant logic.
    #[error("unauthenticated")]
    Unauthenticated,

    /// The requested tenant is outside the caller's access set.
    ///
    /// Carries no detail: a denied tenant id must not be distinguishable
    /// from a nonexistent one.
    #[error("forbidden")]
    Forbidden,

    /// A collaborator store failed in a way that cannot be degraded safely
    /// (membership reads fail closed; see [`crate::TenantAccessResolver`]).
    #[error(transparent)]
    Store(#[from] StoreError),
}
