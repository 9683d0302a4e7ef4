//! Unified error handling system
//!
//! Provides structured error types with context and proper error chaining.
//! A single `NotFound` variant covers both true absence and ownership
//! mismatches; callers must never be able to tell the two apart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type AerobookResult<T> = Result<T, AerobookError>;

/// Error context providing additional information for debugging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: std::collections::HashMap<String, String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: std::collections::HashMap::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }
}

/// Main error type for the Aerobook system
#[derive(Error, Debug)]
pub enum AerobookError {
    #[error("Rate limit exceeded: {message}")]
    RateLimited {
        message: String,
        retry_after_secs: u64,
        context: ErrorContext,
    },

    #[error("Authentication error: {message}")]
    Authentication {
        message: String,
        context: ErrorContext,
    },

    #[error("Role not assigned: {role}")]
    RoleNotAssigned { role: String, context: ErrorContext },

    #[error("Resource not found: {resource}")]
    NotFound {
        resource: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: ErrorContext,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AerobookError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            AerobookError::RateLimited { context, .. } => Some(context),
            AerobookError::Authentication { context, .. } => Some(context),
            AerobookError::RoleNotAssigned { context, .. } => Some(context),
            AerobookError::NotFound { context, .. } => Some(context),
            AerobookError::Validation { context, .. } => Some(context),
            AerobookError::Storage { context, .. } => Some(context),
            AerobookError::Config { context, .. } => Some(context),
            AerobookError::Internal { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Check if the caller can recover by retrying or correcting input
    pub fn is_recoverable(&self) -> bool {
        match self {
            AerobookError::RateLimited { .. } => true,
            AerobookError::RoleNotAssigned { .. } => true,
            AerobookError::Validation { .. } => true,
            AerobookError::Authentication { .. } => false,
            AerobookError::NotFound { .. } => false,
            AerobookError::Config { .. } => false,
            _ => false,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AerobookError::RateLimited { .. }
            | AerobookError::Authentication { .. }
            | AerobookError::RoleNotAssigned { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Request rejected"
                );
            }
            AerobookError::NotFound { .. } | AerobookError::Validation { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Request failed"
                );
            }
            _ => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Internal error occurred"
                );
            }
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! authentication_error {
    ($msg:expr, $component:expr) => {
        $crate::error::AerobookError::Authentication {
            message: $msg.to_string(),
            context: $crate::error::ErrorContext::new($component),
        }
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr, $field:expr, $component:expr) => {
        $crate::error::AerobookError::Validation {
            message: $msg.to_string(),
            field: Some($field.to_string()),
            context: $crate::error::ErrorContext::new($component),
        }
    };
}

#[macro_export]
macro_rules! not_found_error {
    ($resource:expr, $component:expr) => {
        $crate::error::AerobookError::NotFound {
            resource: $resource.to_string(),
            context: $crate::error::ErrorContext::new($component),
        }
    };
}

#[macro_export]
macro_rules! internal_error {
    ($msg:expr, $component:expr) => {
        $crate::error::AerobookError::Internal {
            message: $msg.to_string(),
            source: None,
            context: $crate::error::ErrorContext::new($component),
        }
    };
}
