//! Configuration constants for admission control and token issuance
//!
//! These are fixed operational settings, not a dynamic configuration
//! surface. Defaults match the deployed service.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the per-client sliding-window rate limiter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Window length in seconds
    pub window_secs: u64,
    /// Maximum requests per window for API traffic
    pub max_api_requests: u32,
    /// Maximum requests per window for interactive (page) traffic
    pub max_interactive_requests: u32,
    /// How often the stale-window sweep runs, in seconds
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            window_secs: 60,
            max_api_requests: 20,
            max_interactive_requests: 20,
            sweep_interval_secs: 300,
        }
    }
}

impl RateLimitSettings {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Entries idle for two full windows are reclaimed by the sweep
    pub fn eviction_age(&self) -> Duration {
        Duration::from_secs(self.window_secs * 2)
    }
}

/// Settings for credential issuance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Access token lifetime in seconds
    pub access_token_lifetime_secs: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_lifetime_secs: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            // 24 hours
            access_token_lifetime_secs: 86_400,
            // 30 days
            refresh_token_lifetime_secs: 30 * 86_400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rate_limit_settings() {
        let settings = RateLimitSettings::default();
        assert_eq!(settings.window_secs, 60);
        assert_eq!(settings.max_api_requests, 20);
        assert_eq!(settings.max_interactive_requests, 20);
        assert_eq!(settings.eviction_age(), Duration::from_secs(120));
    }

    #[test]
    fn default_auth_settings() {
        let settings = AuthSettings::default();
        assert_eq!(settings.access_token_lifetime_secs, 86_400);
    }
}
