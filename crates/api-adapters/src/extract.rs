//! Session extractors: the first stage of the access-control gate.
//!
//! `MaybeAccount` resolves the signed session cookie to an account when one
//! exists; `CurrentAccount` additionally rejects anonymous requests with a
//! redirect to the login page. Both re-evaluate per request; nothing is
//! cached in-process.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use domains::{Account, AppError};

use crate::error::PageError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "inkwell_session";

/// Pulls the session token out of the Cookie header, rejecting values whose
/// HMAC tag does not verify.
pub(crate) fn session_token(headers: &HeaderMap, state: &AppState) -> Option<String> {
    let prefix = format!("{SESSION_COOKIE}=");
    for header in headers.get_all(COOKIE) {
        let Ok(header) = header.to_str() else {
            continue;
        };
        for pair in header.split(';') {
            if let Some(value) = pair.trim().strip_prefix(prefix.as_str()) {
                if let Some(token) = state.codec.decode(value) {
                    return Some(token);
                }
                tracing::debug!("session cookie failed signature check");
            }
        }
    }
    None
}

/// The Set-Cookie value opening a session.
pub fn session_cookie(state: &AppState, token: &str) -> String {
    let encoded = state.codec.encode(token);
    let mut cookie = format!(
        "{SESSION_COOKIE}={encoded}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        state.site.session_max_age
    );
    if !state.site.debug {
        cookie.push_str("; Secure");
    }
    cookie
}

/// The Set-Cookie value closing a session.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// The viewer, when logged in.
pub struct MaybeAccount(pub Option<Account>);

/// The viewer; anonymous requests are redirected to the login page.
pub struct CurrentAccount(pub Account);

impl FromRequestParts<Arc<AppState>> for MaybeAccount {
    type Rejection = PageError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers, state) else {
            return Ok(Self(None));
        };
        Ok(Self(state.accounts.current(&token).await?))
    }
}

impl FromRequestParts<Arc<AppState>> for CurrentAccount {
    type Rejection = PageError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let MaybeAccount(account) = MaybeAccount::from_request_parts(parts, state).await?;
        account
            .map(Self)
            .ok_or(PageError(AppError::AuthenticationRequired))
    }
}
