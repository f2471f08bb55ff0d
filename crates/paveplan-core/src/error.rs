//! Core error types for paveplan-core.
//!
//! This module defines the error hierarchy using thiserror. The conflict
//! engine itself never fails; errors here cover the durable cache, the TOML
//! configuration, and input validation. Remote sync failures have their own
//! type in the `sync` module because they are only ever surfaced through
//! notifications, never returned from store mutations.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for paveplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Local durable cache errors
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Remote synchronization errors
    #[error("Sync error: {0}")]
    Sync(#[from] crate::sync::SyncError),

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

/// Local durable cache errors.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to read the snapshot file
    #[error("Failed to read snapshot from {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },

    /// Failed to write the snapshot file
    #[error("Failed to write snapshot to {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },

    /// Snapshot payload could not be decoded
    #[error("Snapshot is corrupt: {0}")]
    Corrupt(String),
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end ({end}) must be greater than start ({start})")]
    InvalidTimeRange {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
