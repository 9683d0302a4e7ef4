//! User accounts and authentication state
//!
//! In-memory user store behind the same narrow lookup contract a
//! database-backed store would expose. Registration grants the full
//! role set with the default role active; the active role changes only
//! through [`UserService::switch_role`].

use crate::auth::{Identity, IdentityContext, Role};
use aerobook_core::error::{AerobookError, AerobookResult, ErrorContext};
use aerobook_core::{authentication_error, validation_error};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// User registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// User login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Internal user data with password hash
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub identity: Identity,
    pub enabled: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl UserRecord {
    /// Create a new user with a hashed password and the registration
    /// role set
    pub fn new(request: RegisterRequest) -> AerobookResult<Self> {
        let password_hash = hash_password(&request.password)?;
        let subject = Uuid::new_v4().to_string();

        Ok(Self {
            username: request.username,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            password_hash,
            identity: Identity::registered(subject),
            enabled: true,
            created_at: chrono::Utc::now(),
        })
    }

    pub fn subject(&self) -> &str {
        &self.identity.subject
    }

    /// Verify password against the stored hash
    pub fn verify_password(&self, password: &str) -> bool {
        verify_password(password, &self.password_hash).unwrap_or(false)
    }

    /// Per-request context carrying the single active authority
    pub fn to_context(&self) -> IdentityContext {
        IdentityContext::new(
            self.identity.subject.clone(),
            self.username.clone(),
            self.identity.active_role(),
        )
    }

    /// Public user info for auth responses
    pub fn to_user_info(&self) -> UserInfo {
        UserInfo {
            username: self.username.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            current_role: self.identity.active_role().to_string(),
            roles: self.identity.role_names(),
        }
    }
}

/// Public user information
#[derive(Debug, Serialize, Clone)]
pub struct UserInfo {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub current_role: String,
    pub roles: Vec<String>,
}

/// In-memory user store keyed by username, with an email uniqueness
/// index
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
    users_by_email: Arc<RwLock<HashMap<String, String>>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, user: UserRecord) {
        let mut users = self.users.write().unwrap();
        let mut users_by_email = self.users_by_email.write().unwrap();
        users_by_email.insert(user.email.clone(), user.username.clone());
        users.insert(user.username.clone(), user);
    }

    pub fn exists_by_username(&self, username: &str) -> bool {
        self.users.read().unwrap().contains_key(username)
    }

    pub fn exists_by_email(&self, email: &str) -> bool {
        self.users_by_email.read().unwrap().contains_key(email)
    }

    pub fn get_by_username(&self, username: &str) -> Option<UserRecord> {
        self.users.read().unwrap().get(username).cloned()
    }

    pub fn get_by_subject(&self, subject: &str) -> Option<UserRecord> {
        self.users
            .read()
            .unwrap()
            .values()
            .find(|u| u.identity.subject == subject)
            .cloned()
    }
}

/// User service for registration, authentication, and role selection
#[derive(Debug, Clone)]
pub struct UserService {
    store: UserStore,
}

impl Default for UserService {
    fn default() -> Self {
        let service = Self {
            store: UserStore::new(),
        };

        // Default admin account so a fresh deployment is reachable
        if let Err(e) = service.create_default_admin() {
            warn!("Failed to create default admin user: {}", e);
        }

        service
    }
}

impl UserService {
    pub fn new(store: UserStore) -> Self {
        Self { store }
    }

    fn create_default_admin(&self) -> AerobookResult<()> {
        let mut admin = UserRecord::new(RegisterRequest {
            username: "admin".to_string(),
            email: "admin@aerobook.local".to_string(),
            password: "admin123!".to_string(),
            first_name: "Default".to_string(),
            last_name: "Administrator".to_string(),
        })?;
        admin.identity.switch_active_role(Role::Admin)?;

        info!("Creating default admin user: {}", admin.username);
        self.store.insert(admin);
        Ok(())
    }

    /// Register a new user.
    ///
    /// All roles are assigned so the account can switch between them;
    /// the active role starts as the default user role.
    pub fn register(&self, request: RegisterRequest) -> AerobookResult<UserRecord> {
        debug!("Starting user registration for: {}", request.username);

        if request.username.is_empty() || request.email.is_empty() {
            return Err(validation_error!(
                "Username and email are required",
                "username",
                "users"
            ));
        }

        if request.password.len() < 8 {
            return Err(validation_error!(
                "Password must be at least 8 characters",
                "password",
                "users"
            ));
        }

        if self.store.exists_by_username(&request.username) {
            debug!(
                "Registration failed: username '{}' already exists",
                request.username
            );
            return Err(validation_error!(
                "Username already exists",
                "username",
                "users"
            ));
        }

        if self.store.exists_by_email(&request.email) {
            debug!("Registration failed: email '{}' already exists", request.email);
            return Err(validation_error!("Email already exists", "email", "users"));
        }

        let user = UserRecord::new(request)?;
        self.store.insert(user.clone());

        info!("Registered new user: {}", user.username);
        Ok(user)
    }

    /// Authenticate a user by username and password
    pub fn authenticate(&self, request: &LoginRequest) -> AerobookResult<UserRecord> {
        let user = self
            .store
            .get_by_username(&request.username)
            .ok_or_else(|| authentication_error!("Invalid credentials", "users"))?;

        if !user.enabled || !user.verify_password(&request.password) {
            warn!("Invalid password for user: {}", request.username);
            return Err(authentication_error!("Invalid credentials", "users"));
        }

        debug!("User authenticated: {}", request.username);
        Ok(user)
    }

    pub fn get_by_username(&self, username: &str) -> Option<UserRecord> {
        self.store.get_by_username(username)
    }

    pub fn get_by_subject(&self, subject: &str) -> Option<UserRecord> {
        self.store.get_by_subject(subject)
    }

    /// Switch the caller's active role.
    ///
    /// Rejects roles outside the assigned set without touching state.
    /// On success the new active role is persisted so every later
    /// lookup of this user observes it.
    pub fn switch_role(&self, subject: &str, requested: Role) -> AerobookResult<UserRecord> {
        let mut users = self.store.users.write().unwrap();

        let user = users
            .values_mut()
            .find(|u| u.identity.subject == subject)
            .ok_or_else(|| authentication_error!("No authenticated user found", "users"))?;

        user.identity.switch_active_role(requested)?;
        info!(
            "User {} switched active role to {}",
            user.username, requested
        );
        Ok(user.clone())
    }
}

/// Hash password using Argon2
fn hash_password(password: &str) -> AerobookResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AerobookError::Internal {
            message: format!("Password hashing failed: {}", e),
            source: None,
            context: ErrorContext::new("users").with_operation("hash_password"),
        })
}

/// Verify password against hash
fn verify_password(password: &str, hash: &str) -> AerobookResult<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| AerobookError::Internal {
        message: format!("Stored password hash is malformed: {}", e),
        source: None,
        context: ErrorContext::new("users").with_operation("verify_password"),
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request(username: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "password123".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
        }
    }

    #[test]
    fn registration_grants_all_roles_with_user_active() {
        let service = UserService::default();
        let user = service.register(register_request("alice")).unwrap();

        assert_eq!(user.identity.active_role(), Role::User);
        for role in Role::all() {
            assert!(user.identity.has_role(role));
        }
    }

    #[test]
    fn registration_rejects_short_password() {
        let service = UserService::default();
        let mut request = register_request("bob");
        request.password = "short".to_string();

        assert!(matches!(
            service.register(request),
            Err(AerobookError::Validation { .. })
        ));
    }

    #[test]
    fn registration_rejects_duplicate_username_and_email() {
        let service = UserService::default();
        service.register(register_request("carol")).unwrap();

        assert!(service.register(register_request("carol")).is_err());

        let mut request = register_request("carol2");
        request.email = "carol@example.com".to_string();
        assert!(service.register(request).is_err());
    }

    #[test]
    fn authenticate_verifies_the_password_hash() {
        let service = UserService::default();
        service.register(register_request("dave")).unwrap();

        assert!(service
            .authenticate(&LoginRequest {
                username: "dave".to_string(),
                password: "password123".to_string(),
            })
            .is_ok());

        assert!(matches!(
            service.authenticate(&LoginRequest {
                username: "dave".to_string(),
                password: "wrong-password".to_string(),
            }),
            Err(AerobookError::Authentication { .. })
        ));
    }

    #[test]
    fn switch_role_persists_across_lookups() {
        let service = UserService::default();
        let user = service.register(register_request("erin")).unwrap();

        service.switch_role(user.subject(), Role::Admin).unwrap();

        let reloaded = service.get_by_subject(user.subject()).unwrap();
        assert_eq!(reloaded.identity.active_role(), Role::Admin);
    }

    #[test]
    fn default_admin_is_created() {
        let service = UserService::default();
        let admin = service.get_by_username("admin").unwrap();
        assert_eq!(admin.identity.active_role(), Role::Admin);
    }
}
