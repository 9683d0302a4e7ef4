//! Booking domain records
//!
//! Thin single-record entities behind the ownership layer. All the
//! interesting behavior (admission, identity, isolation) lives in
//! front of these.

pub mod aircraft;
pub mod flight;

pub use aircraft::{Aircraft, AircraftRequest};
pub use flight::{Flight, FlightRequest};
