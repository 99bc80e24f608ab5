//! Domain error types

use thiserror::Error;

/// Error when a state machine is asked for a transition it does not allow
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid state transition: cannot {action} while {current_state}")]
pub struct InvalidStateTransition {
    pub current_state: String,
    pub action: String,
}

impl InvalidStateTransition {
    pub fn new(current_state: impl ToString, action: &str) -> Self {
        Self {
            current_state: current_state.to_string(),
            action: action.to_string(),
        }
    }
}

/// Errors from mutating the recording collection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("Recording not found: {0}")]
    NotFound(String),

    #[error("Please enter a valid name")]
    EmptyName,

    #[error("Recording already exists: {0}")]
    DuplicateId(String),
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
