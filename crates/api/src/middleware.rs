use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use postdesk_authz::SessionToken;

use crate::context::RequestId;

/// Attach a correlation id to the request and echo it on the response.
pub async fn request_id_middleware(mut req: Request<Body>, next: Next) -> Response {
    let request_id = RequestId::new();
    req.extensions_mut().insert(request_id);

    tracing::debug!(%request_id, method = %req.method(), uri = %req.uri(), "request");

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// Extract the bearer session token, if any.
///
/// A missing or malformed header is "no credential", not an error — the
/// gate turns it into `Unauthenticated`.
pub fn extract_bearer(headers: &HeaderMap) -> Option<SessionToken> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        return None;
    }

    Some(SessionToken::new(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_str(value).unwrap(),
        );
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        let token = extract_bearer(&headers("Bearer abc123")).unwrap();
        assert_eq!(token.as_str(), "abc123");
    }

    #[test]
    fn rejects_missing_and_malformed_headers() {
        assert!(extract_bearer(&HeaderMap::new()).is_none());
        assert!(extract_bearer(&headers("Basic abc123")).is_none());
        assert!(extract_bearer(&headers("Bearer ")).is_none());
    }
}
