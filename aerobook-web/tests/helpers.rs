//! Shared helpers for router-level integration tests
//!
//! Each test builds its own application with fresh state, so accounts
//! and rate-limit windows never leak between tests. Requests carry an
//! explicit forwarded-for origin; tests that are not about admission
//! should stay under the per-window ceiling for their origin.

#![allow(dead_code)]

use aerobook_web::{create_app, AppState, WebConfig};
use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

pub fn test_app() -> Router {
    let state = AppState::new(WebConfig::default()).expect("state should initialize");
    create_app(state)
}

/// Send a JSON request with the given client origin
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    origin: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", origin)
        .header(header::ACCEPT, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

/// Send an interactive (form/page) request with an optional session
/// cookie
pub async fn send_form(
    app: &Router,
    method: &str,
    uri: &str,
    origin: &str,
    cookie: Option<&str>,
    form_body: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", origin);

    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match form_body {
        Some(form) => builder
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn register_body(username: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "password": "password123",
        "first_name": "Test",
        "last_name": "User",
    })
}

/// Register a user and return its access and refresh tokens
pub async fn register(app: &Router, username: &str, origin: &str) -> (String, String) {
    let response = send_json(
        app,
        "POST",
        "/api/auth/register",
        origin,
        None,
        Some(register_body(username)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    (
        body["access_token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
    )
}

/// Log in through the interactive surface and return the session
/// cookie value
pub async fn session_login(app: &Router, username: &str, origin: &str) -> String {
    let form = format!("username={}&password=password123", username);
    let response = send_form(app, "POST", "/login", origin, None, Some(&form)).await;
    assert!(response.status().is_redirection());

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()
        .unwrap();

    // Keep only the name=value pair
    set_cookie.split(';').next().unwrap().to_string()
}
