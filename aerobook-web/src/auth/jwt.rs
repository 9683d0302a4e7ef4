//! JWT bearer credentials
//!
//! Access and refresh tokens signed with a shared secret. An invalid
//! or expired token is an error here; the verification middleware
//! recovers it into an anonymous request.

use aerobook_application::UserRecord;
use aerobook_core::error::{AerobookError, AerobookResult, ErrorContext};
use aerobook_core::{authentication_error, AuthSettings};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// JWT signing keys - initialized from environment variable
static KEYS: LazyLock<Keys> = LazyLock::new(|| {
    let secret = std::env::var("AEROBOOK_JWT_SECRET")
        .unwrap_or_else(|_| "aerobook-default-secret-change-in-production".to_string());
    Keys::new(secret.as_bytes())
});

/// JWT signing and verification keys
struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Login name
    pub username: String,
    /// Active role at issuance time
    pub role: String,
    /// Assigned roles at issuance time
    pub roles: Vec<String>,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
    /// Token type (access or refresh)
    pub token_type: TokenType,
}

/// Token type enumeration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl Claims {
    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// JWT token pair (access + refresh)
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Token issuance and verification
#[derive(Debug, Clone)]
pub struct JwtService {
    settings: AuthSettings,
}

impl Default for JwtService {
    fn default() -> Self {
        Self {
            settings: AuthSettings::default(),
        }
    }
}

impl JwtService {
    pub fn new(settings: AuthSettings) -> Self {
        Self { settings }
    }

    pub fn access_lifetime_secs(&self) -> i64 {
        self.settings.access_token_lifetime_secs
    }

    /// Generate an access token for an authenticated user
    pub fn generate_access_token(&self, user: &UserRecord) -> AerobookResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.settings.access_token_lifetime_secs);

        let claims = Claims {
            sub: user.subject().to_string(),
            username: user.username.clone(),
            role: user.identity.active_role().to_string(),
            roles: user.identity.role_names(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            token_type: TokenType::Access,
        };

        self.encode_claims(&claims)
    }

    /// Generate a refresh token
    pub fn generate_refresh_token(&self, user: &UserRecord) -> AerobookResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.settings.refresh_token_lifetime_secs);

        let claims = Claims {
            sub: user.subject().to_string(),
            username: user.username.clone(),
            role: user.identity.active_role().to_string(),
            roles: vec![],
            iat: now.timestamp(),
            exp: exp.timestamp(),
            token_type: TokenType::Refresh,
        };

        self.encode_claims(&claims)
    }

    /// Generate an access + refresh token pair
    pub fn generate_token_pair(&self, user: &UserRecord) -> AerobookResult<TokenPair> {
        let access_token = self.generate_access_token(user)?;
        let refresh_token = self.generate_refresh_token(user)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.settings.access_token_lifetime_secs,
        })
    }

    /// Verify and decode a token
    pub fn verify_token(&self, token: &str) -> AerobookResult<Claims> {
        let token_data =
            decode::<Claims>(token, &KEYS.decoding, &Validation::default()).map_err(|e| {
                debug!("Token verification failed: {}", e);
                authentication_error!("Invalid or malformed token", "jwt")
            })?;

        let claims = token_data.claims;

        if claims.is_expired() {
            return Err(authentication_error!("Token has expired", "jwt"));
        }

        Ok(claims)
    }

    fn encode_claims(&self, claims: &Claims) -> AerobookResult<String> {
        encode(&Header::default(), claims, &KEYS.encoding).map_err(|e| {
            warn!("Failed to encode JWT token: {}", e);
            AerobookError::Internal {
                message: "Token creation failed".to_string(),
                source: Some(Box::new(e)),
                context: ErrorContext::new("jwt").with_operation("encode"),
            }
        })
    }
}
