//! Unified error type for the ebMS core crates
//!
//! Protocol outcomes of a pull exchange are *not* represented here; those are
//! typed values in `ebms_pull::PullError` mapped onto [`crate::EbmsErrorCode`].
//! This type covers programming and configuration errors raised by the model
//! types and the channel registry.

use serde::{Deserialize, Serialize};

/// Error type for all core model and registry operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum CoreError {
    /// An argument violated a non-null or format precondition
    #[error("Invalid argument '{field}': {message}")]
    InvalidArgument {
        /// Name of the offending argument
        field: String,
        /// What was wrong with it
        message: String,
    },

    /// A record with the same key is already registered
    #[error("Already exists: {key}")]
    AlreadyExists {
        /// Key of the existing record
        key: String,
    },

    /// No record is registered under the key
    #[error("Not found: {key}")]
    NotFound {
        /// Key that failed to resolve
        key: String,
    },

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration problem
        message: String,
    },

    /// A collaborator behind one of the effect traits failed
    #[error("Collaborator error: {message}")]
    Collaborator {
        /// Error message reported by the collaborator
        message: String,
    },
}

impl CoreError {
    /// Create an invalid argument error
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an already-exists error
    pub fn already_exists(key: impl Into<String>) -> Self {
        Self::AlreadyExists { key: key.into() }
    }

    /// Create a not found error
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a collaborator error
    pub fn collaborator(message: impl Into<String>) -> Self {
        Self::Collaborator {
            message: message.into(),
        }
    }
}

/// Standard Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(err.to_string()),
            _ => Self::config(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::collaborator(format!("JSON: {err}"))
    }
}
