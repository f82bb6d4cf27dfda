//! Authoritative role resolution.

use std::sync::Arc;

use crate::{PrincipalDirectory, Role, Session};

/// Resolves a principal's effective role for one request.
///
/// The principal store wins over the credential's claim, so a role change
/// (e.g. a demotion) applies on the very next request rather than after
/// re-authentication. The claim is used only when the store has no answer:
/// an availability-over-freshness tradeoff — a transient store outage must
/// not take the whole request pipeline down with it.
pub struct RoleResolver {
    directory: Arc<dyn PrincipalDirectory>,
}

impl RoleResolver {
    pub fn new(directory: Arc<dyn PrincipalDirectory>) -> Self {
        Self { directory }
    }

    /// Best-effort authoritative read; never fails the request.
    pub async fn resolve(&self, session: &Session) -> Role {
        match self.directory.find_role(session.principal_id).await {
            Ok(Some(role)) => role,
            Ok(None) => {
                tracing::debug!(
                    principal_id = %session.principal_id,
                    claimed_role = %session.claimed_role,
                    "principal not in directory; using claimed role"
                );
                session.claimed_role.clone()
            }
            Err(err) => {
                tracing::warn!(
                    principal_id = %session.principal_id,
                    claimed_role = %session.claimed_role,
                    error = %err,
                    "role lookup failed; falling back to claimed role"
                );
                session.claimed_role.clone()
            }
        }
    }
}
