//! The authorization gate route handlers call into.

use std::sync::Arc;

use postdesk_core::{PrincipalId, TenantId};

use crate::{
    AccessSet, AuthzError, MembershipStore, PrincipalDirectory, Role, RoleConfig, RoleResolver,
    ScopedQuery, SessionAccessor, SessionToken, TenantAccessResolver, TenantFilter, scope_access,
};

/// Outcome of [`AuthorizationGate::require_auth`]: who is calling, with
/// their effective (authoritatively resolved) role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    pub principal_id: PrincipalId,
    pub role: Role,
}

/// Per-request orchestration: session → role → access set → decision.
///
/// The gate holds no per-request state and nothing is cached across calls;
/// every decision re-reads the stores so role and membership changes apply
/// immediately. One pass per request, no retries — collaborator failures
/// become terminal decisions for that request.
pub struct AuthorizationGate {
    sessions: Arc<dyn SessionAccessor>,
    roles: RoleResolver,
    access: TenantAccessResolver,
}

impl AuthorizationGate {
    pub fn new(
        sessions: Arc<dyn SessionAccessor>,
        directory: Arc<dyn PrincipalDirectory>,
        memberships: Arc<dyn MembershipStore>,
        config: RoleConfig,
    ) -> Self {
        Self {
            sessions,
            roles: RoleResolver::new(directory),
            access: TenantAccessResolver::new(memberships, config),
        }
    }

    /// Resolve the caller or fail `Unauthenticated`.
    ///
    /// Short-circuits before any role or tenant logic: absence of a session
    /// is a distinct, earlier failure than `Forbidden`.
    pub async fn require_auth(
        &self,
        token: &SessionToken,
    ) -> Result<AuthenticatedPrincipal, AuthzError> {
        let session = self
            .sessions
            .current_session(token)
            .await
            .ok_or(AuthzError::Unauthenticated)?;

        let role = self.roles.resolve(&session).await;

        Ok(AuthenticatedPrincipal {
            principal_id: session.principal_id,
            role,
        })
    }

    /// Document-level check: may the caller touch a record owned by
    /// `tenant_id`?
    pub async fn authorize_document(
        &self,
        token: &SessionToken,
        tenant_id: TenantId,
    ) -> Result<bool, AuthzError> {
        let principal = self.require_auth(token).await?;
        let access = self.access_set(&principal).await?;
        let allowed = access.covers(tenant_id);

        tracing::debug!(
            principal_id = %principal.principal_id,
            role = %principal.role,
            %tenant_id,
            allowed,
            "document authorization"
        );

        Ok(allowed)
    }

    /// List-level check: narrow `query` to the tenants the caller may see,
    /// optionally pinned to a specific requested tenant.
    pub async fn authorize_list<Q>(
        &self,
        token: &SessionToken,
        query: Q,
        requested_tenant: Option<TenantId>,
        tenant_column: &str,
    ) -> Result<ScopedQuery<Q>, AuthzError> {
        let principal = self.require_auth(token).await?;
        let access = self.access_set(&principal).await?;
        let predicate = scope_access(&access, requested_tenant)?;

        tracing::debug!(
            principal_id = %principal.principal_id,
            role = %principal.role,
            ?predicate,
            "list authorization"
        );

        Ok(ScopedQuery {
            query,
            filter: TenantFilter {
                column: tenant_column.to_string(),
                predicate,
            },
        })
    }

    async fn access_set(
        &self,
        principal: &AuthenticatedPrincipal,
    ) -> Result<AccessSet, AuthzError> {
        let access = self
            .access
            .allowed_tenants(principal.principal_id, &principal.role)
            .await?;
        Ok(access)
    }
}
