//! Aerobook application layer
//!
//! Identity, role selection, ownership isolation, and the booking
//! records they protect. This crate has no HTTP knowledge; the web
//! layer drives it through the types exported here.

pub mod auth;
pub mod booking;
pub mod ownership;
pub mod users;

pub use auth::{Identity, IdentityContext, Role};
pub use booking::{Aircraft, AircraftRequest, Flight, FlightRequest};
pub use ownership::{guard, Owned, OwnedStore, Page};
pub use users::{LoginRequest, RegisterRequest, UserInfo, UserRecord, UserService, UserStore};
