//! Role definitions

use serde::{Deserialize, Serialize};

/// Roles a user can hold and switch between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Regular traveller booking flights
    User,
    /// Travel agent managing bookings on behalf of customers
    Agent,
    /// Administrator with fleet management access
    Admin,
}

impl Role {
    /// All roles granted to a new account at registration
    pub fn all() -> [Role; 3] {
        [Role::User, Role::Agent, Role::Admin]
    }

    /// Role a fresh registration starts out in
    pub fn default_active() -> Role {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "ROLE_USER"),
            Role::Agent => write!(f, "ROLE_AGENT"),
            Role::Admin => write!(f, "ROLE_ADMIN"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ROLE_USER" | "USER" => Ok(Role::User),
            "ROLE_AGENT" | "AGENT" => Ok(Role::Agent),
            "ROLE_ADMIN" | "ADMIN" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}
