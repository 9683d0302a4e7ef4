//! Flight CRUD handlers
//!
//! Every lookup goes through the ownership layer: a flight belonging
//! to another account answers exactly like a missing one, and listings
//! only ever enumerate the caller's own records.

use aerobook_application::{Flight, FlightRequest, Page};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::auth::CurrentIdentity;
use crate::error::ApiResult;
use crate::AppState;

/// Records per listing page
const PAGE_SIZE: usize = 10;

/// Paging parameters for listings
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
}

/// Create a flight owned by the caller
pub async fn create_flight(
    State(state): State<AppState>,
    CurrentIdentity(context): CurrentIdentity,
    Json(request): Json<FlightRequest>,
) -> ApiResult<(StatusCode, Json<Flight>)> {
    let flight = state
        .flights
        .insert(Flight::create(&context.subject, request));

    info!(
        "Flight {} created by user: {}",
        flight.flight_number, context.username
    );
    Ok((StatusCode::CREATED, Json(flight)))
}

/// List the caller's flights, one page at a time
pub async fn list_flights(
    State(state): State<AppState>,
    CurrentIdentity(context): CurrentIdentity,
    Query(params): Query<PageParams>,
) -> Json<Page<Flight>> {
    let page = params.page.unwrap_or(0);
    debug!("Listing flights for user: {} (page {})", context.username, page);

    Json(state.flights.page_by_owner(&context.subject, page, PAGE_SIZE))
}

/// Fetch one flight by id
pub async fn get_flight(
    State(state): State<AppState>,
    CurrentIdentity(context): CurrentIdentity,
    Path(id): Path<String>,
) -> ApiResult<Json<Flight>> {
    let flight = state.flights.get(&id, &context.subject)?;
    Ok(Json(flight))
}

/// Replace a flight's details
pub async fn update_flight(
    State(state): State<AppState>,
    CurrentIdentity(context): CurrentIdentity,
    Path(id): Path<String>,
    Json(request): Json<FlightRequest>,
) -> ApiResult<Json<Flight>> {
    let flight = state
        .flights
        .update(&id, &context.subject, |flight| flight.apply(request))?;

    info!("Flight {} updated by user: {}", id, context.username);
    Ok(Json(flight))
}

/// Delete a flight
pub async fn delete_flight(
    State(state): State<AppState>,
    CurrentIdentity(context): CurrentIdentity,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.flights.delete(&id, &context.subject)?;

    info!("Flight {} deleted by user: {}", id, context.username);
    Ok(Json(json!({
        "success": true,
        "message": "Flight deleted successfully",
    })))
}
