//! Error-to-status mapping for the HTTP surface.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use postdesk_authz::AuthzError;

/// API-level error wrapper.
///
/// Bodies are deliberately generic: a forbidden response must not confirm
/// that the denied tenant exists, and store failures must not leak internal
/// detail (that goes to the log instead).
#[derive(Debug)]
pub enum ApiError {
    Authz(AuthzError),
    NotFound,
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        Self::Authz(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Authz(AuthzError::Unauthenticated) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "authentication required" })),
            )
                .into_response(),
            ApiError::Authz(AuthzError::Forbidden) => (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "access denied" })),
            )
                .into_response(),
            ApiError::Authz(AuthzError::Store(err)) => {
                tracing::error!(error = %err, "authorization store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal error" })),
                )
                    .into_response()
            }
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "not found" })),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use postdesk_authz::StoreError;

    use super::*;

    #[test]
    fn authz_errors_map_to_distinct_statuses() {
        let unauthenticated = ApiError::Authz(AuthzError::Unauthenticated).into_response();
        assert_eq!(unauthenticated.status(), StatusCode::UNAUTHORIZED);

        let forbidden = ApiError::Authz(AuthzError::Forbidden).into_response();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let store = ApiError::Authz(AuthzError::Store(StoreError::Unavailable(
            "db down".to_string(),
        )))
        .into_response();
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
