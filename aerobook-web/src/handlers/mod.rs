//! HTTP request handlers for the booking surface
//!
//! Thin single-record CRUD; admission, identity, and ownership
//! enforcement all happen in front of or inside the stores these
//! handlers call.

pub mod aircraft;
pub mod flights;
pub mod health;

pub use aircraft::*;
pub use flights::*;
pub use health::*;
