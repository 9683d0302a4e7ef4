//! Aircraft CRUD handlers
//!
//! Fleet management requires the admin role to be *active*; a caller
//! that merely has admin assigned is refused. Records stay
//! owner-isolated on top of the role gate.

use aerobook_application::{Aircraft, AircraftRequest, Page};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use tracing::info;

use super::flights::PageParams;
use crate::auth::RequireAdmin;
use crate::error::ApiResult;
use crate::AppState;

const PAGE_SIZE: usize = 10;

/// Add an aircraft to the caller's fleet
pub async fn create_aircraft(
    State(state): State<AppState>,
    RequireAdmin(context): RequireAdmin,
    Json(request): Json<AircraftRequest>,
) -> ApiResult<(StatusCode, Json<Aircraft>)> {
    let aircraft = state
        .aircraft
        .insert(Aircraft::create(&context.subject, request));

    info!(
        "Aircraft {} {} created by user: {}",
        aircraft.manufacturer, aircraft.model, context.username
    );
    Ok((StatusCode::CREATED, Json(aircraft)))
}

/// List the caller's aircraft, one page at a time
pub async fn list_aircraft(
    State(state): State<AppState>,
    RequireAdmin(context): RequireAdmin,
    Query(params): Query<PageParams>,
) -> Json<Page<Aircraft>> {
    let page = params.page.unwrap_or(0);
    Json(state.aircraft.page_by_owner(&context.subject, page, PAGE_SIZE))
}

/// Fetch one aircraft by id
pub async fn get_aircraft(
    State(state): State<AppState>,
    RequireAdmin(context): RequireAdmin,
    Path(id): Path<String>,
) -> ApiResult<Json<Aircraft>> {
    let aircraft = state.aircraft.get(&id, &context.subject)?;
    Ok(Json(aircraft))
}

/// Replace an aircraft's details
pub async fn update_aircraft(
    State(state): State<AppState>,
    RequireAdmin(context): RequireAdmin,
    Path(id): Path<String>,
    Json(request): Json<AircraftRequest>,
) -> ApiResult<Json<Aircraft>> {
    let aircraft = state
        .aircraft
        .update(&id, &context.subject, |aircraft| aircraft.apply(request))?;

    info!("Aircraft {} updated by user: {}", id, context.username);
    Ok(Json(aircraft))
}

/// Remove an aircraft from the fleet
pub async fn delete_aircraft(
    State(state): State<AppState>,
    RequireAdmin(context): RequireAdmin,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.aircraft.delete(&id, &context.subject)?;

    info!("Aircraft {} deleted by user: {}", id, context.username);
    Ok(Json(json!({
        "success": true,
        "message": "Aircraft deleted successfully",
    })))
}
