//! Router construction and the sample client-scoped routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;

use postdesk_authz::{
    AuthorizationGate, AuthzError, Role, RoleConfig, Session, SessionToken, TenantFilter,
    TenantPredicate,
};
use postdesk_core::{PrincipalId, TenantId};
use postdesk_store::{
    InMemoryDirectory, InMemoryMemberships, InMemoryRowStore, InMemorySessionStore, TableQuery,
    TenantOwned,
};

use crate::error::ApiError;
use crate::middleware::{extract_bearer, request_id_middleware};

/// Content row owned by a client (demo read model).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRow {
    pub id: i64,
    pub client_id: TenantId,
    pub title: String,
    pub status: String,
}

impl TenantOwned for ContentRow {
    fn tenant_id(&self) -> TenantId {
        self.client_id
    }
}

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<AuthorizationGate>,
    pub rows: Arc<InMemoryRowStore<ContentRow>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/content", get(list_content))
        .route("/content/:id", get(get_content))
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(request_id_middleware)))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Optional client pin: staff narrow to one client, client users may
    /// only name a client they belong to.
    pub client_id: Option<i64>,
}

/// List content rows, scoped to the caller's access set.
pub async fn list_content(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ContentRow>>, ApiError> {
    let token = extract_bearer(&headers).ok_or(AuthzError::Unauthenticated)?;

    let base = TableQuery::new("content_rows");
    let scoped = state
        .gate
        .authorize_list(
            &token,
            base,
            params.client_id.map(TenantId::new),
            "client_id",
        )
        .await?;

    Ok(Json(state.rows.select(&scoped.filter)))
}

/// Fetch one content row, with a document-level ownership check.
pub async fn get_content(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<ContentRow>, ApiError> {
    let token = extract_bearer(&headers).ok_or(AuthzError::Unauthenticated)?;

    // Internal unscoped lookup; the decision below is what the caller sees.
    let unscoped = TenantFilter {
        column: "client_id".to_string(),
        predicate: TenantPredicate::All,
    };
    let row = state
        .rows
        .select(&unscoped)
        .into_iter()
        .find(|row| row.id == id)
        .ok_or(ApiError::NotFound)?;

    let allowed = state.gate.authorize_document(&token, row.client_id).await?;
    if !allowed {
        return Err(AuthzError::Forbidden.into());
    }

    Ok(Json(row))
}

/// In-memory wiring with seeded sessions and rows (dev/demo).
pub fn demo_state() -> AppState {
    let sessions = Arc::new(InMemorySessionStore::new());
    let directory = Arc::new(InMemoryDirectory::new());
    let memberships = Arc::new(InMemoryMemberships::new());

    let staff = PrincipalId::new(1);
    sessions.insert(
        SessionToken::new("staff-token"),
        Session {
            principal_id: staff,
            claimed_role: Role::new("staff"),
        },
    );
    directory.upsert(staff, Role::new("staff"));

    let client_user = PrincipalId::new(42);
    sessions.insert(
        SessionToken::new("client-token"),
        Session {
            principal_id: client_user,
            claimed_role: Role::new("clientuser"),
        },
    );
    directory.upsert(client_user, Role::new("clientuser"));
    memberships.grant(client_user, TenantId::new(3));

    let rows = Arc::new(InMemoryRowStore::new());
    rows.insert(ContentRow {
        id: 1,
        client_id: TenantId::new(3),
        title: "Spring campaign".to_string(),
        status: "published".to_string(),
    });
    rows.insert(ContentRow {
        id: 2,
        client_id: TenantId::new(3),
        title: "Product launch teaser".to_string(),
        status: "draft".to_string(),
    });
    rows.insert(ContentRow {
        id: 3,
        client_id: TenantId::new(9),
        title: "Holiday promo".to_string(),
        status: "published".to_string(),
    });

    let gate = Arc::new(AuthorizationGate::new(
        sessions,
        directory,
        memberships,
        RoleConfig::default(),
    ));

    AppState { gate, rows }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn staff_sees_all_clients() {
        let state = demo_state();
        let Json(rows) = list_content(
            State(state),
            bearer("staff-token"),
            Query(ListParams { client_id: None }),
        )
        .await
        .unwrap();

        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn client_user_sees_only_their_client() {
        let state = demo_state();
        let Json(rows) = list_content(
            State(state),
            bearer("client-token"),
            Query(ListParams { client_id: None }),
        )
        .await
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.client_id == TenantId::new(3)));
    }

    #[tokio::test]
    async fn client_user_pinning_foreign_client_is_forbidden() {
        let state = demo_state();
        let result = list_content(
            State(state),
            bearer("client-token"),
            Query(ListParams {
                client_id: Some(9),
            }),
        )
        .await;

        assert!(matches!(
            result,
            Err(ApiError::Authz(AuthzError::Forbidden))
        ));
    }

    #[tokio::test]
    async fn client_user_cannot_read_foreign_document() {
        let state = demo_state();
        // Row 3 is owned by client 9.
        let result = get_content(State(state), bearer("client-token"), Path(3)).await;

        assert!(matches!(
            result,
            Err(ApiError::Authz(AuthzError::Forbidden))
        ));
    }

    #[tokio::test]
    async fn missing_credential_is_unauthenticated() {
        let state = demo_state();
        let result = list_content(
            State(state),
            HeaderMap::new(),
            Query(ListParams { client_id: None }),
        )
        .await;

        assert!(matches!(
            result,
            Err(ApiError::Authz(AuthzError::Unauthenticated))
        ));
    }
}
