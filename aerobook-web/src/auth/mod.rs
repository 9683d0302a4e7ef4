//! Authentication and authorization for the HTTP surface
//!
//! Verification happens in [`verifier`]; handlers declare what they
//! need through the extractors here. Protected handlers take
//! [`CurrentIdentity`]; admin-only handlers take [`RequireAdmin`].

pub mod handlers;
pub mod jwt;
pub mod sessions;
pub mod verifier;

use aerobook_application::{IdentityContext, Role};
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Redirect, Response},
};
use serde_json::json;
use tracing::warn;

use crate::security::{request_class, RequestClass};

/// Rejection for unauthenticated access to a protected operation.
///
/// API callers get a 401 body; interactive callers are sent to the
/// login surface instead.
#[derive(Debug)]
pub struct AuthRejection {
    class: RequestClass,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self.class {
            RequestClass::Api => (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Unauthorized",
                    "message": "Authentication required",
                })),
            )
                .into_response(),
            RequestClass::Interactive => Redirect::temporary("/login").into_response(),
        }
    }
}

/// Rejection for operations gated on a role the caller is not
/// currently acting under
#[derive(Debug)]
pub struct RoleRejection {
    required: Role,
    active: Role,
}

impl IntoResponse for RoleRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "forbidden",
                "message": format!(
                    "Active role {} cannot perform this operation; {} required",
                    self.active, self.required
                ),
                "required_role": self.required.to_string(),
            })),
        )
            .into_response()
    }
}

fn class_of(parts: &Parts) -> RequestClass {
    parts
        .extensions
        .get::<RequestClass>()
        .copied()
        .unwrap_or_else(|| request_class(parts.uri.path(), &parts.headers))
}

/// Extractor for the authenticated caller's identity context
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub IdentityContext);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<IdentityContext>() {
            Some(context) => Ok(CurrentIdentity(context.clone())),
            None => Err(AuthRejection {
                class: class_of(parts),
            }),
        }
    }
}

/// Extractor requiring the admin role to be the caller's *active*
/// role. Merely having admin in the assigned set is not enough.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub IdentityContext);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentIdentity(context) = CurrentIdentity::from_request_parts(parts, state)
            .await
            .map_err(|rejection| rejection.into_response())?;

        if context.is_admin() {
            Ok(RequireAdmin(context))
        } else {
            warn!(
                "Admin operation refused for user '{}' acting as {}",
                context.username, context.active_role
            );
            Err(RoleRejection {
                required: Role::Admin,
                active: context.active_role,
            }
            .into_response())
        }
    }
}
