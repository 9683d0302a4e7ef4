//! Authentication integration tests
//!
//! Covers both credential schemes end to end: bearer tokens (issue,
//! verify, refresh, expire-to-anonymous) and interactive sessions,
//! plus the precedence rule between them.

mod helpers;

use axum::http::{header, StatusCode};
use base64::Engine;
use helpers::{body_json, register, register_body, send_form, send_json, session_login, test_app};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn registration_returns_tokens_and_the_full_role_set() {
    let app = test_app();

    let response = send_json(
        &app,
        "POST",
        "/api/auth/register",
        "198.51.100.1",
        None,
        Some(register_body("alice")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["access_token"].as_str().is_some());
    assert!(body["refresh_token"].as_str().is_some());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 86400);
    assert_eq!(body["user"]["current_role"], "ROLE_USER");
    assert_eq!(body["user"]["roles"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn login_rejects_a_wrong_password() {
    let app = test_app();
    register(&app, "bob", "198.51.100.2").await;

    let response = send_json(
        &app,
        "POST",
        "/api/auth/login",
        "198.51.100.2",
        None,
        Some(json!({"username": "bob", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn protected_path_without_credentials_gets_the_fixed_401_body() {
    let app = test_app();

    let response = send_json(&app, "GET", "/api/auth/me", "198.51.100.3", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Unauthorized");
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn protected_interactive_path_redirects_to_login() {
    let app = test_app();

    let response = send_form(&app, "POST", "/switch-role", "198.51.100.4", None, Some("role=ROLE_ADMIN")).await;
    assert!(response.status().is_redirection());
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
}

#[tokio::test]
async fn bearer_token_authenticates_api_calls() {
    let app = test_app();
    let (access, _) = register(&app, "carol", "198.51.100.5").await;

    let response = send_json(
        &app,
        "GET",
        "/api/auth/me",
        "198.51.100.5",
        Some(&access),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["username"], "carol");
}

#[tokio::test]
async fn malformed_bearer_token_is_treated_as_anonymous_not_an_error() {
    let app = test_app();

    let response = send_json(
        &app,
        "GET",
        "/api/auth/me",
        "198.51.100.6",
        Some("garbage.token.value"),
        None,
    )
    .await;

    // Recovered to anonymous, rejected at the authorization boundary
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn refresh_token_cannot_be_used_as_an_access_credential() {
    let app = test_app();
    let (_, refresh) = register(&app, "dave", "198.51.100.7").await;

    let response = send_json(
        &app,
        "GET",
        "/api/auth/me",
        "198.51.100.7",
        Some(&refresh),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_exchanges_for_a_new_access_token() {
    let app = test_app();
    let (_, refresh) = register(&app, "erin", "198.51.100.8").await;

    let response = send_json(
        &app,
        "POST",
        "/api/auth/refresh",
        "198.51.100.8",
        None,
        Some(json!({"refresh_token": refresh})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let new_access = body["access_token"].as_str().unwrap().to_string();
    assert_eq!(body["expires_in"], 86400);

    let response = send_json(
        &app,
        "GET",
        "/api/auth/me",
        "198.51.100.8",
        Some(&new_access),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn refresh_rejects_an_access_token() {
    let app = test_app();
    let (access, _) = register(&app, "frank", "198.51.100.9").await;

    let response = send_json(
        &app,
        "POST",
        "/api/auth/refresh",
        "198.51.100.9",
        None,
        Some(json!({"refresh_token": access})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn basic_credentials_authenticate_a_single_call() {
    let app = test_app();
    register(&app, "grace", "198.51.100.10").await;

    let encoded = base64::engine::general_purpose::STANDARD.encode("grace:password123");
    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .header("x-forwarded-for", "198.51.100.10")
        .header(header::ACCEPT, "application/json")
        .header(header::AUTHORIZATION, format!("Basic {}", encoded))
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "grace");

    let wrong = base64::engine::general_purpose::STANDARD.encode("grace:nope");
    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .header("x-forwarded-for", "198.51.100.10")
        .header(header::ACCEPT, "application/json")
        .header(header::AUTHORIZATION, format!("Basic {}", wrong))
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_login_establishes_identity_for_later_requests() {
    let app = test_app();
    register(&app, "heidi", "198.51.100.11").await;

    let cookie = session_login(&app, "heidi", "198.51.100.11").await;

    let response = send_form(
        &app,
        "GET",
        "/api/current-user",
        "198.51.100.11",
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["username"], "heidi");
    assert_eq!(body["current_role"], "ROLE_USER");
}

#[tokio::test]
async fn session_identity_wins_over_a_broken_bearer_header() {
    let app = test_app();
    register(&app, "ivan", "198.51.100.12").await;
    let cookie = session_login(&app, "ivan", "198.51.100.12").await;

    // Expired/garbage bearer alongside a valid session: the session
    // identity is honored for the same request
    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/current-user")
        .header("x-forwarded-for", "198.51.100.12")
        .header(header::ACCEPT, "application/json")
        .header(header::AUTHORIZATION, "Bearer not.a.token")
        .header(header::COOKIE, &cookie)
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "ivan");
}

#[tokio::test]
async fn logout_drops_the_session() {
    let app = test_app();
    register(&app, "judy", "198.51.100.13").await;
    let cookie = session_login(&app, "judy", "198.51.100.13").await;

    let response = send_form(
        &app,
        "POST",
        "/logout",
        "198.51.100.13",
        Some(&cookie),
        None,
    )
    .await;
    assert!(response.status().is_redirection());

    // The old cookie no longer resolves to an identity
    let response = send_form(
        &app,
        "GET",
        "/api/current-user",
        "198.51.100.13",
        Some(&cookie),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
