//! Aerobook Web Server
//!
//! HTTP surface for the tenant-aware booking service. Every request
//! passes admission control first, then credential verification, then
//! the handler; record access inside handlers is owner-isolated.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod security;
pub mod server;
pub mod state;

// Re-export main types
pub use server::AerobookServer;
pub use state::AppState;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE]);

    // Layer order matters: admission runs first, identity second, so a
    // throttled request never reaches credential verification.
    Router::new()
        .nest("/api", routes::api_routes())
        .merge(routes::page_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::verifier::identity_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security::admission_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Enable development mode
    pub dev_mode: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            dev_mode: false,
        }
    }
}

impl WebConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("AEROBOOK_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("AEROBOOK_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            dev_mode: std::env::var("AEROBOOK_DEV_MODE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        }
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;
