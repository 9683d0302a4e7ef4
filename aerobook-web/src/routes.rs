//! Route definitions for the Aerobook web server

use crate::{auth, handlers, security, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// API routes (JSON clients)
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Authentication
        .route("/auth/register", post(auth::handlers::register_user))
        .route("/auth/login", post(auth::handlers::login_user))
        .route("/auth/refresh", post(auth::handlers::refresh_token))
        .route("/auth/me", get(auth::handlers::get_current_user))
        .route("/auth/logout", post(auth::handlers::logout_user))
        // Role selection
        .route("/current-user", get(auth::handlers::current_user_roles))
        .route("/switch-role", post(auth::handlers::switch_role))
        // Flights
        .route(
            "/flights",
            post(handlers::create_flight).get(handlers::list_flights),
        )
        .route(
            "/flights/{id}",
            get(handlers::get_flight)
                .put(handlers::update_flight)
                .delete(handlers::delete_flight),
        )
        // Aircraft (admin only)
        .route(
            "/aircraft",
            post(handlers::create_aircraft).get(handlers::list_aircraft),
        )
        .route(
            "/aircraft/{id}",
            get(handlers::get_aircraft)
                .put(handlers::update_aircraft)
                .delete(handlers::delete_aircraft),
        )
}

/// Interactive routes (session clients)
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::landing))
        .route(
            "/login",
            get(auth::handlers::login_page).post(auth::handlers::login_form),
        )
        .route(
            "/register",
            get(auth::handlers::register_page).post(auth::handlers::register_form),
        )
        .route("/logout", post(auth::handlers::logout_form))
        .route("/switch-role", post(auth::handlers::switch_role_form))
        .route(
            security::RATE_LIMIT_EXCEEDED_PATH,
            get(security::rate_limit_exceeded),
        )
}
