//! Token gate for protected endpoints.
//! Callers pass the shared secret as the `auth_token` query parameter.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Query parameter carrying the token.
pub const AUTH_QUERY_KEY: &str = "auth_token";

/// Holds the SHA-256 digest of the configured secret.
#[derive(Clone)]
pub struct TokenGate {
    expected: [u8; 32],
}

impl TokenGate {
    pub fn new(secret: &str) -> Self {
        Self {
            expected: Sha256::digest(secret.as_bytes()).into(),
        }
    }

    /// Compare digests so timing does not depend on where the tokens differ.
    pub fn verify(&self, provided: &str) -> bool {
        let provided: [u8; 32] = Sha256::digest(provided.as_bytes()).into();
        constant_time_eq(&provided, &self.expected)
    }
}

impl std::fmt::Debug for TokenGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGate").finish_non_exhaustive()
    }
}

fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Extract `auth_token` from a raw query string. Missing means empty.
pub fn token_from_query(query: Option<&str>) -> String {
    query
        .and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == AUTH_QUERY_KEY)
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_default()
}

/// Reject requests whose token does not match before the handler runs.
pub async fn require_token(
    State(gate): State<Arc<TokenGate>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let provided = token_from_query(request.uri().query());

    if !gate.verify(&provided) {
        tracing::warn!(path = %request.uri().path(), "Rejected request: invalid auth token");
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }

    next.run(request).await
}
