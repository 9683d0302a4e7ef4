//! Core types shared across the Aerobook booking service
//!
//! Provides the unified error taxonomy, logging bootstrap, and the
//! configuration constants for request admission and token issuance.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{AuthSettings, RateLimitSettings};
pub use error::{AerobookError, AerobookResult, ErrorContext};
pub use logging::{init_logging, LogFormat, LoggingConfig};
