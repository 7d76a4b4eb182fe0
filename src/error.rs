//! # Error Types
//!
//! Custom error types for the telemetry engine using `thiserror`.

use thiserror::Error;

/// Main error type for the telemetry engine
#[derive(Debug, Error)]
pub enum GcsError {
    /// TOML parsing errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration values out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A single channel definition is malformed
    #[error("Invalid configuration for channel '{channel}': {reason}")]
    InvalidChannel {
        /// Channel identifier
        channel: String,
        /// What is wrong with it
        reason: String,
    },

    /// Query against a channel whose window holds no samples
    #[error("Channel '{0}' has an empty window")]
    EmptyWindow(String),

    /// Query against a channel (or composite group) that does not exist
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    /// The sample source failed to produce a value
    #[error("Sample source failed for channel '{channel}': {reason}")]
    Source {
        /// Channel identifier
        channel: String,
        /// Failure reported by the source
        reason: String,
    },

    /// The sample source produced NaN or infinity
    #[error("Non-finite sample for channel '{channel}'")]
    NonFiniteSample {
        /// Channel identifier
        channel: String,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the telemetry engine
pub type Result<T> = std::result::Result<T, GcsError>;
