//! Identity and role management
//!
//! A caller owns a set of assigned roles but always acts under exactly
//! one active role. Authorization decisions elsewhere in the system
//! test the active role only, never the full assigned set.

pub mod identity;
pub mod roles;

pub use identity::{Identity, IdentityContext};
pub use roles::Role;
