//! User identity and the per-request identity context

use super::Role;
use aerobook_core::error::{AerobookError, AerobookResult, ErrorContext};
use std::collections::HashSet;

/// A user's durable authorization state.
///
/// Invariant: `active_role` is always a member of `assigned_roles`.
/// Every mutation re-checks this; it is never assumed. The active role
/// is private so the invariant cannot be bypassed by construction.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Stable subject identifier (user id)
    pub subject: String,
    /// Roles the user may act under
    assigned_roles: HashSet<Role>,
    /// The single role the user currently acts under
    active_role: Role,
}

impl Identity {
    /// Create a new identity, rejecting an active role outside the
    /// assigned set.
    pub fn new(
        subject: String,
        assigned_roles: HashSet<Role>,
        active_role: Role,
    ) -> AerobookResult<Self> {
        if !assigned_roles.contains(&active_role) {
            return Err(AerobookError::RoleNotAssigned {
                role: active_role.to_string(),
                context: ErrorContext::new("identity").with_operation("new"),
            });
        }

        Ok(Self {
            subject,
            assigned_roles,
            active_role,
        })
    }

    /// Identity granted at registration: all roles assigned, default
    /// role active.
    pub fn registered(subject: String) -> Self {
        Self {
            subject,
            assigned_roles: Role::all().into_iter().collect(),
            active_role: Role::default_active(),
        }
    }

    pub fn active_role(&self) -> Role {
        self.active_role
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.assigned_roles.contains(&role)
    }

    /// Switch the active role.
    ///
    /// Rejects a role outside the assigned set and leaves the current
    /// active role unchanged in that case.
    pub fn switch_active_role(&mut self, requested: Role) -> AerobookResult<()> {
        if !self.assigned_roles.contains(&requested) {
            return Err(AerobookError::RoleNotAssigned {
                role: requested.to_string(),
                context: ErrorContext::new("identity").with_operation("switch_active_role"),
            });
        }

        self.active_role = requested;
        Ok(())
    }

    /// Assigned roles as display strings, sorted for stable output
    pub fn role_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.assigned_roles.iter().map(Role::to_string).collect();
        names.sort();
        names
    }
}

/// Per-request view of an authenticated caller.
///
/// Carries exactly one effective authority. This value is derived per
/// call and threaded explicitly through the request; it is never
/// shared mutable state.
#[derive(Debug, Clone)]
pub struct IdentityContext {
    /// Subject identifier of the caller
    pub subject: String,
    /// Login name, for logging and display
    pub username: String,
    /// The single role this request acts under
    pub active_role: Role,
}

impl IdentityContext {
    pub fn new(subject: String, username: String, active_role: Role) -> Self {
        Self {
            subject,
            username,
            active_role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.active_role == Role::Admin
    }
}
