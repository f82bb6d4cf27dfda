//! Postgres-backed collaborator stores.
//!
//! Every read here is a single-query consistent snapshot; the authorization
//! core needs nothing stronger. No query caps: a principal with many
//! memberships gets all of them.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::collections::BTreeSet;

use postdesk_authz::{MembershipStore, PrincipalDirectory, Role, ScopedQuery, StoreError};
use postdesk_core::{PrincipalId, TenantId};

use crate::query::{TableQuery, Value, render_count, render_select};

/// Principal directory over the `principals` table.
pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrincipalDirectory for PgDirectory {
    async fn find_role(&self, principal_id: PrincipalId) -> Result<Option<Role>, StoreError> {
        // Soft-deleted principals never resolve a role.
        let row = sqlx::query("SELECT role FROM principals WHERE id = $1 AND deleted_at IS NULL")
            .bind(principal_id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Other(e.into()))?;

        Ok(row.map(|row| Role::new(row.get::<String, _>("role"))))
    }
}

/// Membership store over the `client_memberships` table.
pub struct PgMemberships {
    pool: PgPool,
}

impl PgMemberships {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipStore for PgMemberships {
    async fn tenant_ids(
        &self,
        principal_id: PrincipalId,
    ) -> Result<BTreeSet<TenantId>, StoreError> {
        let rows =
            sqlx::query("SELECT tenant_id FROM client_memberships WHERE principal_id = $1")
                .bind(principal_id.as_i64())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| StoreError::Other(e.into()))?;

        Ok(rows
            .iter()
            .map(|row| TenantId::new(row.get::<i64, _>("tenant_id")))
            .collect())
    }
}

/// Execute a scoped query, returning raw rows for the caller to map.
pub async fn fetch_scoped(
    pool: &PgPool,
    scoped: &ScopedQuery<TableQuery>,
) -> Result<Vec<PgRow>, StoreError> {
    let (sql, binds) = render_select(scoped);
    tracing::debug!(sql = %sql, "executing scoped select");

    let mut query = sqlx::query(&sql);
    for value in binds {
        query = match value {
            Value::Int(i) => query.bind(i),
            Value::Text(s) => query.bind(s),
        };
    }

    query
        .fetch_all(pool)
        .await
        .map_err(|e| StoreError::Other(e.into()))
}

/// Count the rows a scoped query would return.
pub async fn count_scoped(
    pool: &PgPool,
    scoped: &ScopedQuery<TableQuery>,
) -> Result<i64, StoreError> {
    let (sql, binds) = render_count(scoped);
    tracing::debug!(sql = %sql, "executing scoped count");

    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    for value in binds {
        query = match value {
            Value::Int(i) => query.bind(i),
            Value::Text(s) => query.bind(s),
        };
    }

    query
        .fetch_one(pool)
        .await
        .map_err(|e| StoreError::Other(e.into()))
}
