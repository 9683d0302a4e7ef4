//! Ownership isolation integration tests
//!
//! Two tenants share the service; neither can observe or mutate the
//! other's records, and the error for a foreign record is
//! indistinguishable from the error for a missing one.

mod helpers;

use axum::http::StatusCode;
use helpers::{body_json, register, send_json, test_app};
use serde_json::{json, Value};

fn flight_body(number: &str) -> Value {
    json!({
        "flight_number": number,
        "departure_airport": "HEL",
        "destination_airport": "NRT",
        "departure_date": "2025-06-01",
        "arrival_date": "2025-06-02",
        "departure_time": "10:30",
        "arrival_time": "07:45",
        "gate": "A12",
        "status": "SCHEDULED",
        "flight_charge": 420.0,
    })
}

async fn create_flight(
    app: &axum::Router,
    token: &str,
    origin: &str,
    number: &str,
) -> String {
    let response = send_json(
        app,
        "POST",
        "/api/flights",
        origin,
        Some(token),
        Some(flight_body(number)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn foreign_record_is_indistinguishable_from_a_missing_one() {
    let app = test_app();
    let (token_a, _) = register(&app, "owner-a", "198.18.0.1").await;
    let (token_b, _) = register(&app, "owner-b", "198.18.0.2").await;

    let flight_id = create_flight(&app, &token_a, "198.18.0.1", "AA100").await;

    // B requesting A's record
    let response = send_json(
        &app,
        "GET",
        &format!("/api/flights/{}", flight_id),
        "198.18.0.2",
        Some(&token_b),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let foreign_body = body_json(response).await;

    // A deletes the record, then B requests the same id again - now a
    // genuinely missing record
    let response = send_json(
        &app,
        "DELETE",
        &format!("/api/flights/{}", flight_id),
        "198.18.0.1",
        Some(&token_a),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send_json(
        &app,
        "GET",
        &format!("/api/flights/{}", flight_id),
        "198.18.0.2",
        Some(&token_b),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let missing_body = body_json(response).await;

    // Identical shape and text; the caller cannot tell which case it hit
    assert_eq!(foreign_body, missing_body);
}

#[tokio::test]
async fn isolation_is_symmetric_between_owners() {
    let app = test_app();
    let (token_a, _) = register(&app, "tenant-a", "198.18.0.3").await;
    let (token_b, _) = register(&app, "tenant-b", "198.18.0.4").await;

    let id_a = create_flight(&app, &token_a, "198.18.0.3", "AA200").await;
    let id_b = create_flight(&app, &token_b, "198.18.0.4", "BB200").await;

    let response = send_json(
        &app,
        "GET",
        &format!("/api/flights/{}", id_b),
        "198.18.0.3",
        Some(&token_a),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send_json(
        &app,
        "GET",
        &format!("/api/flights/{}", id_a),
        "198.18.0.4",
        Some(&token_b),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listings_only_ever_contain_the_callers_records() {
    let app = test_app();
    let (token_a, _) = register(&app, "lister-a", "198.18.0.5").await;
    let (token_b, _) = register(&app, "lister-b", "198.18.0.6").await;

    for i in 0..3 {
        create_flight(&app, &token_a, "198.18.0.5", &format!("AA30{}", i)).await;
    }
    for i in 0..2 {
        create_flight(&app, &token_b, "198.18.0.6", &format!("BB30{}", i)).await;
    }

    let response = send_json(&app, "GET", "/api/flights", "198.18.0.5", Some(&token_a), None).await;
    let body = body_json(response).await;
    assert_eq!(body["total_items"], 3);
    let numbers: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["flight_number"].as_str().unwrap())
        .collect();
    assert!(numbers.iter().all(|n| n.starts_with("AA")));

    // Pagination metadata reflects only the caller's records too
    let response = send_json(
        &app,
        "GET",
        "/api/flights?page=1",
        "198.18.0.6",
        Some(&token_b),
        None,
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["total_items"], 2);
    assert_eq!(body["total_pages"], 1);
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn foreign_update_and_delete_read_as_missing() {
    let app = test_app();
    let (token_a, _) = register(&app, "editor-a", "198.18.0.7").await;
    let (token_b, _) = register(&app, "editor-b", "198.18.0.8").await;

    let id_a = create_flight(&app, &token_a, "198.18.0.7", "AA400").await;

    let response = send_json(
        &app,
        "PUT",
        &format!("/api/flights/{}", id_a),
        "198.18.0.8",
        Some(&token_b),
        Some(flight_body("HIJACK")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send_json(
        &app,
        "DELETE",
        &format!("/api/flights/{}", id_a),
        "198.18.0.8",
        Some(&token_b),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The owner still sees the unmodified record
    let response = send_json(
        &app,
        "GET",
        &format!("/api/flights/{}", id_a),
        "198.18.0.7",
        Some(&token_a),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["flight_number"], "AA400");
}
