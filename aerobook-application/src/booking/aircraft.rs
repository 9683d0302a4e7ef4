//! Aircraft records
//!
//! Fleet management is restricted to the admin role at the web layer;
//! records are still owner-isolated like everything else.

use crate::ownership::Owned;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An aircraft in the owning account's fleet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aircraft {
    pub id: String,
    /// Subject id of the owning account; never reassigned
    pub owner_subject: String,
    pub manufacturer: String,
    pub model: String,
    pub number_of_seats: u32,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or replacing an aircraft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AircraftRequest {
    pub manufacturer: String,
    pub model: String,
    pub number_of_seats: u32,
}

impl Aircraft {
    pub fn create(owner_subject: &str, request: AircraftRequest) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_subject: owner_subject.to_string(),
            manufacturer: request.manufacturer,
            model: request.model,
            number_of_seats: request.number_of_seats,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, request: AircraftRequest) {
        self.manufacturer = request.manufacturer;
        self.model = request.model;
        self.number_of_seats = request.number_of_seats;
    }
}

impl Owned for Aircraft {
    fn id(&self) -> &str {
        &self.id
    }

    fn owner_subject(&self) -> &str {
        &self.owner_subject
    }

    fn resource_name() -> &'static str {
        "Aircraft"
    }
}
