//! Application state shared across handlers

use aerobook_application::{Aircraft, Flight, OwnedStore, UserService};
use aerobook_core::{AuthSettings, RateLimitSettings};
use std::sync::Arc;
use tracing::info;

use crate::auth::jwt::JwtService;
use crate::auth::sessions::SessionStore;
use crate::security::AdmissionController;
use crate::{WebConfig, WebResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: WebConfig,
    /// Admission control; consulted before anything else per request
    pub admission: Arc<AdmissionController>,
    /// User accounts and role selection
    pub users: UserService,
    /// Interactive sessions
    pub sessions: SessionStore,
    /// Token issuance and verification
    pub jwt: JwtService,
    /// Flight records
    pub flights: OwnedStore<Flight>,
    /// Aircraft records
    pub aircraft: OwnedStore<Aircraft>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: WebConfig) -> WebResult<Self> {
        let admission = Arc::new(AdmissionController::new(RateLimitSettings::default()));
        let jwt = JwtService::new(AuthSettings::default());

        let state = Self {
            config,
            admission,
            users: UserService::default(),
            sessions: SessionStore::new(),
            jwt,
            flights: OwnedStore::new(),
            aircraft: OwnedStore::new(),
        };

        info!("Application state initialized successfully");
        Ok(state)
    }
}
