//! In-memory store implementations for tests and dev wiring.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use postdesk_authz::{
    MembershipStore, PrincipalDirectory, Role, Session, SessionAccessor, SessionToken, StoreError,
    TenantFilter,
};
use postdesk_core::{PrincipalId, TenantId};

use crate::query::TenantOwned;

/// In-memory session store.
///
/// Sessions are pre-seeded (issuance is not this repo's concern); expired
/// entries resolve to `None` like absent ones.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: RwLock<HashMap<String, StoredSession>>,
}

#[derive(Debug, Clone)]
struct StoredSession {
    session: Session,
    expires_at: Option<DateTime<Utc>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, token: SessionToken, session: Session) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(
                token.as_str().to_string(),
                StoredSession {
                    session,
                    expires_at: None,
                },
            );
        }
    }

    pub fn insert_with_expiry(
        &self,
        token: SessionToken,
        session: Session,
        expires_at: DateTime<Utc>,
    ) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(
                token.as_str().to_string(),
                StoredSession {
                    session,
                    expires_at: Some(expires_at),
                },
            );
        }
    }

    pub fn remove(&self, token: &SessionToken) {
        if let Ok(mut map) = self.inner.write() {
            map.remove(token.as_str());
        }
    }
}

#[async_trait]
impl SessionAccessor for InMemorySessionStore {
    async fn current_session(&self, token: &SessionToken) -> Option<Session> {
        let map = self.inner.read().ok()?;
        let stored = map.get(token.as_str())?;
        if let Some(expires_at) = stored.expires_at {
            if Utc::now() >= expires_at {
                return None;
            }
        }
        Some(stored.session.clone())
    }
}

/// In-memory principal directory with soft deletion.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    inner: RwLock<HashMap<PrincipalId, PrincipalRecord>>,
}

#[derive(Debug, Clone)]
struct PrincipalRecord {
    role: Role,
    deleted: bool,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, principal_id: PrincipalId, role: Role) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(
                principal_id,
                PrincipalRecord {
                    role,
                    deleted: false,
                },
            );
        }
    }

    pub fn soft_delete(&self, principal_id: PrincipalId) {
        if let Ok(mut map) = self.inner.write() {
            if let Some(record) = map.get_mut(&principal_id) {
                record.deleted = true;
            }
        }
    }
}

#[async_trait]
impl PrincipalDirectory for InMemoryDirectory {
    async fn find_role(&self, principal_id: PrincipalId) -> Result<Option<Role>, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StoreError::Unavailable("directory lock poisoned".to_string()))?;

        Ok(map
            .get(&principal_id)
            .filter(|record| !record.deleted)
            .map(|record| record.role.clone()))
    }
}

/// In-memory membership rows.
///
/// Kept as a plain row list: admin consoles may write duplicate grants, and
/// the set returned from `tenant_ids` must absorb them.
#[derive(Debug, Default)]
pub struct InMemoryMemberships {
    rows: RwLock<Vec<(PrincipalId, TenantId)>>,
}

impl InMemoryMemberships {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, principal_id: PrincipalId, tenant_id: TenantId) {
        if let Ok(mut rows) = self.rows.write() {
            rows.push((principal_id, tenant_id));
        }
    }

    pub fn revoke(&self, principal_id: PrincipalId, tenant_id: TenantId) {
        if let Ok(mut rows) = self.rows.write() {
            rows.retain(|(p, t)| !(*p == principal_id && *t == tenant_id));
        }
    }
}

#[async_trait]
impl MembershipStore for InMemoryMemberships {
    async fn tenant_ids(
        &self,
        principal_id: PrincipalId,
    ) -> Result<BTreeSet<TenantId>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Unavailable("membership lock poisoned".to_string()))?;

        Ok(rows
            .iter()
            .filter(|(p, _)| *p == principal_id)
            .map(|(_, t)| *t)
            .collect())
    }
}

/// In-memory tenant-owned row store (demo read model).
///
/// Evaluates a [`TenantFilter`] row-wise instead of rendering SQL.
#[derive(Debug, Default)]
pub struct InMemoryRowStore<R> {
    rows: RwLock<Vec<R>>,
}

impl<R> InMemoryRowStore<R>
where
    R: TenantOwned + Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    pub fn insert(&self, row: R) {
        if let Ok(mut rows) = self.rows.write() {
            rows.push(row);
        }
    }

    pub fn select(&self, filter: &TenantFilter) -> Vec<R> {
        let rows = match self.rows.read() {
            Ok(rows) => rows,
            Err(_) => return Vec::new(),
        };

        rows.iter()
            .filter(|row| filter.predicate.matches(row.tenant_id()))
            .cloned()
            .collect()
    }

    pub fn count(&self, filter: &TenantFilter) -> usize {
        self.select(filter).len()
    }
}
