//! Credential verification middleware
//!
//! Resolves the caller's identity from an established session, a
//! bearer token, or basic credentials, in that order. Session identity
//! takes precedence so a bearer header cannot clobber an interactive
//! login. Failures here never abort the request; an unidentified
//! request proceeds as anonymous and is rejected, if at all, at the
//! authorization boundary.

use aerobook_application::IdentityContext;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use base64::Engine;
use tracing::{debug, warn};

use super::jwt::TokenType;
use super::sessions::session_id_from_headers;
use crate::AppState;

/// Paths that bypass bearer processing entirely; they must be
/// reachable before any credential exists.
const BEARER_EXEMPT_PATHS: &[&str] = &[
    "/api/auth/login",
    "/api/auth/register",
    "/api/auth/refresh",
    "/login",
    "/register",
];

/// Prefixes that bypass bearer processing (asset paths)
const BEARER_EXEMPT_PREFIXES: &[&str] = &["/css/", "/js/", "/img/", "/static/"];

fn bearer_exempt(path: &str) -> bool {
    BEARER_EXEMPT_PATHS.contains(&path)
        || path == "/favicon.ico"
        || BEARER_EXEMPT_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// Identity middleware. Populates the request with an
/// [`IdentityContext`] when any scheme succeeds; otherwise the request
/// continues anonymously.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    // An established session wins over everything else
    if let Some(session_id) = session_id_from_headers(request.headers()) {
        if let Some(record) = state.sessions.get(&session_id) {
            let context =
                IdentityContext::new(record.subject, record.username, record.active_role);
            request.extensions_mut().insert(context);
            return next.run(request).await;
        }
        debug!("Stale session cookie presented; continuing unauthenticated");
    }

    if bearer_exempt(&path) {
        return next.run(request).await;
    }

    if let Some(context) = identity_from_authorization(&state, request.headers()) {
        request.extensions_mut().insert(context);
    }

    next.run(request).await
}

/// Try the Authorization header: bearer first, then basic. Any decode
/// or validation failure yields `None` so the request falls through to
/// the authorization boundary as anonymous.
fn identity_from_authorization(state: &AppState, headers: &HeaderMap) -> Option<IdentityContext> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?;

    if let Some(token) = auth_header.strip_prefix("Bearer ") {
        return identity_from_bearer(state, token);
    }

    if let Some(encoded) = auth_header.strip_prefix("Basic ") {
        return identity_from_basic(state, encoded);
    }

    None
}

fn identity_from_bearer(state: &AppState, token: &str) -> Option<IdentityContext> {
    let claims = match state.jwt.verify_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!("Bearer token rejected, treating request as anonymous: {}", e);
            return None;
        }
    };

    // Refresh tokens only buy new access tokens, never direct access
    if claims.token_type != TokenType::Access {
        debug!("Refresh token presented as access credential");
        return None;
    }

    // The active role comes from the user store, not the token, so a
    // role switch is visible for the whole token lifetime
    match state.users.get_by_subject(&claims.sub) {
        Some(user) if user.enabled => {
            debug!("Bearer authentication successful for user: {}", user.username);
            Some(user.to_context())
        }
        _ => {
            warn!("No active user found for valid token subject: {}", claims.sub);
            None
        }
    }
}

fn identity_from_basic(state: &AppState, encoded: &str) -> Option<IdentityContext> {
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .ok()?;
    let credentials = String::from_utf8(decoded).ok()?;
    let (username, password) = credentials.split_once(':')?;

    match state.users.authenticate(&aerobook_application::LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    }) {
        Ok(user) => {
            debug!("Basic authentication successful for user: {}", user.username);
            Some(user.to_context())
        }
        Err(e) => {
            debug!("Basic authentication failed: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_auth_paths_skip_bearer_processing() {
        assert!(bearer_exempt("/api/auth/login"));
        assert!(bearer_exempt("/register"));
        assert!(bearer_exempt("/css/site.css"));
        assert!(!bearer_exempt("/api/flights"));
    }
}
