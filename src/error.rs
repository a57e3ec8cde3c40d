//! Error types for command registration and dispatch

use thiserror::Error;

use crate::platform::HostKind;

/// Errors raised while wiring commands into a host or loading collaborators.
///
/// User-input conditions (unknown subcommand, missing permission) are not
/// errors; they are answered with a message and reported as handled.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Label '{label}' is already registered on the {host} host")]
    LabelConflict { host: HostKind, label: String },

    #[error("Host rejected command '{command}': {reason}")]
    Registration { command: String, reason: String },

    #[error("Command '{command}' failed: {message}")]
    Execution { command: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
