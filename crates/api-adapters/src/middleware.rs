//! Request-level checks applied ahead of routing: Host allow-listing and the
//! origin check on mutating requests.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{HOST, ORIGIN, REFERER};
use axum::http::{Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

/// Outside debug mode the Host header must be on the allow list (when one is
/// configured). Mirrors the allowed-hosts setting of conventional web
/// frameworks.
pub async fn enforce_host(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !state.site.debug && !state.site.allowed_hosts.is_empty() {
        let host = req
            .headers()
            .get(HOST)
            .and_then(|h| h.to_str().ok())
            // Strip the port before comparing.
            .map(|h| h.split(':').next().unwrap_or(h).to_string());
        let allowed = host
            .as_deref()
            .is_some_and(|h| state.site.allowed_hosts.iter().any(|a| a == h));
        if !allowed {
            tracing::warn!(host = host.as_deref().unwrap_or("<missing>"), "host not allowed");
            return (StatusCode::BAD_REQUEST, "bad request: disallowed host").into_response();
        }
    }
    next.run(req).await
}

/// Cross-origin write protection: when a mutating request carries an Origin
/// (or, failing that, a Referer), it must match the trusted origin list.
/// Requests without either header pass; they cannot be cross-site form posts.
pub async fn enforce_origin(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if matches!(*req.method(), Method::POST | Method::PUT | Method::DELETE) {
        let origin = req
            .headers()
            .get(ORIGIN)
            .or_else(|| req.headers().get(REFERER))
            .and_then(|h| h.to_str().ok());
        if let Some(origin) = origin {
            let trusted = state
                .site
                .trusted_origins
                .iter()
                .any(|t| origin == t || origin.starts_with(&format!("{t}/")));
            if !trusted {
                tracing::warn!(origin, "rejected untrusted origin");
                return (StatusCode::FORBIDDEN, "forbidden: untrusted origin").into_response();
            }
        }
    }
    next.run(req).await
}
