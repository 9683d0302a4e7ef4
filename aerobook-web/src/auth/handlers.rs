//! Authentication handlers: registration, login, token refresh, and
//! role switching
//!
//! Most operations exist twice: a JSON endpoint for API clients and a
//! form/redirect variant for interactive sessions.

use aerobook_application::{LoginRequest, RegisterRequest, Role, UserInfo};
use aerobook_core::error::AerobookError;
use aerobook_core::ErrorContext;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Json, Redirect, Response},
    Form,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::jwt::{TokenPair, TokenType};
use super::sessions::{clear_session_cookie, session_cookie, session_id_from_headers};
use super::CurrentIdentity;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Token refresh request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Role switch parameters
#[derive(Debug, Deserialize)]
pub struct SwitchRoleParams {
    pub role: String,
}

/// Registration/login response: user info plus a token pair
#[derive(Debug, serde::Serialize)]
pub struct AuthResponse {
    pub user: UserInfo,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// User registration endpoint
///
/// Registers a new account and returns its info with a fresh token
/// pair. New accounts hold every role and start acting as a regular
/// user.
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    info!("User registration attempt: {}", request.username);

    let user = state.users.register(request)?;
    let tokens = state.jwt.generate_token_pair(&user)?;

    info!("User registered successfully: {}", user.username);
    Ok(Json(AuthResponse {
        user: user.to_user_info(),
        tokens,
    }))
}

/// User login endpoint
///
/// Authenticates with username and password and returns JWT tokens.
pub async fn login_user(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    info!("User login attempt: {}", request.username);

    let user = state.users.authenticate(&request)?;
    let tokens = state.jwt.generate_token_pair(&user)?;

    info!("User logged in successfully: {}", user.username);
    Ok(Json(AuthResponse {
        user: user.to_user_info(),
        tokens,
    }))
}

/// Token refresh endpoint
///
/// Exchanges a valid refresh token for a new access token. The
/// password is not re-checked.
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> ApiResult<Json<Value>> {
    let claims = state.jwt.verify_token(&request.refresh_token)?;

    if claims.token_type != TokenType::Refresh {
        return Err(ApiError(AerobookError::Authentication {
            message: "Invalid token type for refresh".to_string(),
            context: ErrorContext::new("auth").with_operation("refresh"),
        }));
    }

    let user = state.users.get_by_subject(&claims.sub).ok_or_else(|| {
        AerobookError::Authentication {
            message: "User for refresh token no longer exists".to_string(),
            context: ErrorContext::new("auth").with_operation("refresh"),
        }
    })?;

    let access_token = state.jwt.generate_access_token(&user)?;
    info!("Token refreshed for user: {}", user.username);

    Ok(Json(json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": state.jwt.access_lifetime_secs(),
    })))
}

/// Current user information (API)
pub async fn get_current_user(
    State(state): State<AppState>,
    CurrentIdentity(context): CurrentIdentity,
) -> ApiResult<Json<UserInfo>> {
    let user = state.users.get_by_subject(&context.subject).ok_or_else(|| {
        AerobookError::Authentication {
            message: "Current user not found".to_string(),
            context: ErrorContext::new("auth").with_operation("me"),
        }
    })?;

    Ok(Json(user.to_user_info()))
}

/// Current role view: the caller's single active authority plus the
/// roles it could switch to
pub async fn current_user_roles(
    State(state): State<AppState>,
    CurrentIdentity(context): CurrentIdentity,
) -> ApiResult<Json<Value>> {
    let user = state.users.get_by_subject(&context.subject).ok_or_else(|| {
        AerobookError::Authentication {
            message: "Current user not found".to_string(),
            context: ErrorContext::new("auth").with_operation("current_user"),
        }
    })?;

    Ok(Json(json!({
        "username": user.username,
        "current_role": context.active_role.to_string(),
        "available_roles": user.identity.role_names(),
    })))
}

/// Switch the caller's active role (API)
///
/// The requested role must be in the caller's assigned set; anything
/// else is rejected by name with no state change. On success the
/// session's authority, if one exists, is replaced so that every
/// subsequent request in the session acts under the new role only.
pub async fn switch_role(
    State(state): State<AppState>,
    CurrentIdentity(context): CurrentIdentity,
    headers: HeaderMap,
    Query(params): Query<SwitchRoleParams>,
) -> ApiResult<Json<Value>> {
    info!(
        "Role switch requested by '{}': {}",
        context.username, params.role
    );

    let requested = parse_role(&params.role)?;
    let user = state.users.switch_role(&context.subject, requested)?;

    if let Some(session_id) = session_id_from_headers(&headers) {
        state.sessions.set_active_role(&session_id, requested);
    }

    info!(
        "Role switch complete for '{}': now {}",
        user.username, requested
    );

    Ok(Json(json!({
        "success": true,
        "message": "Role switched successfully",
        "new_role": requested.to_string(),
        "available_roles": user.identity.role_names(),
    })))
}

/// Logout endpoint (API)
///
/// Drops the server-side session when one exists. Bearer tokens are
/// stateless; clients discard them.
pub async fn logout_user(
    State(state): State<AppState>,
    CurrentIdentity(context): CurrentIdentity,
    headers: HeaderMap,
) -> Json<Value> {
    if let Some(session_id) = session_id_from_headers(&headers) {
        state.sessions.remove(&session_id);
    }

    info!("User logout: {}", context.username);
    Json(json!({
        "message": "Logged out successfully",
        "username": context.username,
    }))
}

fn parse_role(raw: &str) -> Result<Role, ApiError> {
    raw.parse::<Role>().map_err(|_| {
        warn!("Unknown role requested: {}", raw);
        ApiError(AerobookError::RoleNotAssigned {
            role: raw.to_string(),
            context: ErrorContext::new("auth").with_operation("switch_role"),
        })
    })
}

// --- interactive (session) surface -----------------------------------

/// Login form target. Establishes a session and sets its cookie.
pub async fn login_form(
    State(state): State<AppState>,
    Form(request): Form<LoginRequest>,
) -> Response {
    match state.users.authenticate(&request) {
        Ok(user) => {
            let session_id = state.sessions.create(&user);
            let mut response = Redirect::to("/").into_response();
            if let Ok(cookie) = HeaderValue::from_str(&session_cookie(&session_id)) {
                response.headers_mut().insert(header::SET_COOKIE, cookie);
            }
            response
        }
        Err(e) => {
            warn!("Interactive login failed: {}", e);
            Redirect::to("/login?error").into_response()
        }
    }
}

/// Registration form target
pub async fn register_form(
    State(state): State<AppState>,
    Form(request): Form<RegisterRequest>,
) -> Response {
    match state.users.register(request) {
        Ok(user) => {
            info!("User registered via form: {}", user.username);
            Redirect::to("/login?registered").into_response()
        }
        Err(e) => {
            warn!("Form registration failed: {}", e);
            Redirect::to("/register?error").into_response()
        }
    }
}

/// Logout form target. Drops the session and clears its cookie.
pub async fn logout_form(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(session_id) = session_id_from_headers(&headers) {
        state.sessions.remove(&session_id);
    }

    let mut response = Redirect::to("/login?logout").into_response();
    if let Ok(cookie) = HeaderValue::from_str(&clear_session_cookie()) {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}

/// Role switch form target. Same semantics as the API variant but
/// reports through redirects.
pub async fn switch_role_form(
    State(state): State<AppState>,
    CurrentIdentity(context): CurrentIdentity,
    headers: HeaderMap,
    Form(params): Form<SwitchRoleParams>,
) -> Response {
    let requested = match params.role.parse::<Role>() {
        Ok(role) => role,
        Err(_) => {
            warn!("Unknown role requested via form: {}", params.role);
            return Redirect::to("/?error=role-switch-failed").into_response();
        }
    };

    match state.users.switch_role(&context.subject, requested) {
        Ok(_) => {
            if let Some(session_id) = session_id_from_headers(&headers) {
                state.sessions.set_active_role(&session_id, requested);
            }
            Redirect::to(&format!("/?roleChanged={}", requested)).into_response()
        }
        Err(e) => {
            warn!("Role switch failed for '{}': {}", context.username, e);
            Redirect::to("/?error=role-switch-failed").into_response()
        }
    }
}

/// Minimal login surface; rendering is out of scope
pub async fn login_page() -> &'static str {
    "Sign in with POST /login (username, password)."
}

/// Minimal registration surface; rendering is out of scope
pub async fn register_page() -> &'static str {
    "Create an account with POST /register."
}
