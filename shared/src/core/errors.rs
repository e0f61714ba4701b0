//! Core error types for the listing wizard.
//!
//! Collaborator failures arrive as [`ServiceError`] and are wrapped into a
//! [`PublishError`] at the publish pipeline boundary. Configuration problems
//! are reported separately through [`ConfigError`].

use thiserror::Error;

use crate::core::types::PublishPhase;

/// Failure reported by a persistence collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ServiceError {
    /// Raw failure detail, logged but never shown to the user
    pub message: String,

    /// Status code when the collaborator talks HTTP
    pub status: Option<u16>,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// Publish failures
///
/// Profile and item failures surface identically to the user and are only
/// told apart in logs and analytics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    #[error("Profile save failed: {source}")]
    ProfileSave { source: ServiceError },

    #[error("Item save failed: {source}")]
    ItemSave { source: ServiceError },

    #[error("Session already published")]
    SessionDone,
}

impl PublishError {
    /// Phase that failed, `None` when the publish never started
    pub fn phase(&self) -> Option<PublishPhase> {
        match self {
            PublishError::ProfileSave { .. } => Some(PublishPhase::Profile),
            PublishError::ItemSave { .. } => Some(PublishPhase::Item),
            PublishError::SessionDone => None,
        }
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: String },

    #[error("Invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("Configuration parsing failed: {message}")]
    Parse { message: String },

    #[error("Configuration I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse {
            message: err.to_string(),
        }
    }
}

/// Result of a collaborator call
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Outcome of one publish attempt: the saved item or the failure reason
pub type PublishOutcome<T> = Result<T, PublishError>;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
