//! Error types for the pavlov core library

use thiserror::Error;

/// Core error type for agent operations
#[derive(Error, Debug)]
pub enum PavlovError {
    /// Invalid construction arguments
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Queried event is not part of the event catalog
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// Environment keys differ from the canonical key set
    #[error("Environment keys {actual:?} do not match starting environment {expected:?}")]
    EnvironmentSchema {
        /// Canonical keys, sorted
        expected: Vec<String>,
        /// Keys that were supplied, sorted
        actual: Vec<String>,
    },

    /// Environment value above the 1.0 ceiling
    #[error("Environment variable {key} is {value}, exceeding maximum 1.0")]
    EnvironmentRange {
        /// Offending variable
        key: String,
        /// Offending value
        value: f64,
    },

    /// Failure surfaced unchanged from the function approximator
    #[error("Approximator error: {0}")]
    Approximator(#[source] anyhow::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, PavlovError>;
