//! Flight records

use crate::ownership::Owned;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scheduled flight owned by the account that created it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub id: String,
    /// Subject id of the owning account; never reassigned
    pub owner_subject: String,
    pub flight_number: String,
    pub departure_airport: String,
    pub destination_airport: String,
    pub departure_date: NaiveDate,
    pub arrival_date: NaiveDate,
    pub departure_time: String,
    pub arrival_time: String,
    pub gate: Option<String>,
    pub status: Option<String>,
    pub flight_charge: f64,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or replacing a flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightRequest {
    pub flight_number: String,
    pub departure_airport: String,
    pub destination_airport: String,
    pub departure_date: NaiveDate,
    pub arrival_date: NaiveDate,
    pub departure_time: String,
    pub arrival_time: String,
    pub gate: Option<String>,
    pub status: Option<String>,
    pub flight_charge: f64,
}

impl Flight {
    /// Build a new flight owned by the caller
    pub fn create(owner_subject: &str, request: FlightRequest) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_subject: owner_subject.to_string(),
            flight_number: request.flight_number,
            departure_airport: request.departure_airport,
            destination_airport: request.destination_airport,
            departure_date: request.departure_date,
            arrival_date: request.arrival_date,
            departure_time: request.departure_time,
            arrival_time: request.arrival_time,
            gate: request.gate,
            status: request.status,
            flight_charge: request.flight_charge,
            created_at: Utc::now(),
        }
    }

    /// Apply an update payload, leaving id, owner, and creation time
    /// untouched
    pub fn apply(&mut self, request: FlightRequest) {
        self.flight_number = request.flight_number;
        self.departure_airport = request.departure_airport;
        self.destination_airport = request.destination_airport;
        self.departure_date = request.departure_date;
        self.arrival_date = request.arrival_date;
        self.departure_time = request.departure_time;
        self.arrival_time = request.arrival_time;
        self.gate = request.gate;
        self.status = request.status;
        self.flight_charge = request.flight_charge;
    }
}

impl Owned for Flight {
    fn id(&self) -> &str {
        &self.id
    }

    fn owner_subject(&self) -> &str {
        &self.owner_subject
    }

    fn resource_name() -> &'static str {
        "Flight"
    }
}
