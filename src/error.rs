//! Error types for modkeeper operations.
//!
//! This module defines [`ModkeeperError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Per-module failures (install, removal) are values the reconciler
//!   records in its reports; they never abort a batch
//! - A failed version query is not an error at all: the module is reported
//!   as absent or its latest version as unknown
//! - Use `anyhow::Error` (via `ModkeeperError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for modkeeper operations.
#[derive(Debug, Error)]
pub enum ModkeeperError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A module name passed on the command line is not a declared target.
    #[error("Unknown module: {name}")]
    UnknownModule { name: String },

    /// Installing a module failed.
    #[error("Failed to install '{module}': {message}")]
    InstallFailed { module: String, message: String },

    /// Removing a module version failed.
    #[error("Failed to remove '{module}' {version}: {message}")]
    RemovalFailed {
        module: String,
        version: String,
        message: String,
    },

    /// A package manager query could not be answered.
    #[error("Query for '{module}' failed: {message}")]
    QueryUnavailable { module: String, message: String },

    /// External command could not be run or exited non-zero.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// External command exceeded its time limit and was killed.
    #[error("Command timed out after {seconds}s: {command}")]
    CommandTimedOut { command: String, seconds: u64 },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ModkeeperError {
    /// Errors caused by configuration or arguments rather than by the
    /// package manager. The binary exits with status 2 for these.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. }
                | Self::ConfigParseError { .. }
                | Self::ConfigValidationError { .. }
                | Self::UnknownModule { .. }
        )
    }
}

/// Result type alias for modkeeper operations.
pub type Result<T> = std::result::Result<T, ModkeeperError>;
