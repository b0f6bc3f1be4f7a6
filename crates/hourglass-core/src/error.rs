//! Core error types for hourglass-core.
//!
//! Event calculations are total and never produce errors; the variants here
//! exist for the boundary layers (store, config, import) and the host's
//! create/edit validation.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for hourglass-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence-related errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors surfaced by an [`crate::store::EventStore`] implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading the stored event set failed
    #[error("Failed to read events: {0}")]
    ReadFailed(String),

    /// Writing events back failed
    #[error("Failed to write events: {0}")]
    WriteFailed(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors for the host's create/edit flow.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid date range
    #[error("Invalid date range: target_date ({end}) must be greater than start_date ({start})")]
    InvalidDateRange {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
