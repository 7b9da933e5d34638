use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Circuit breaker errors.
///
/// `Open` is a distinct, typed rejection: callers must be able to tell a
/// fast-failed call apart from a genuine operation failure.
#[derive(Error, Debug, Clone)]
pub enum CircuitError {
    #[error("circuit '{key}' is open since {opened_at}, retry in {retry_in:?}")]
    Open {
        /// The circuit key that rejected the call.
        key: String,
        /// When the circuit transitioned to open.
        opened_at: DateTime<Utc>,
        /// Remaining cooldown before a half-open probe is allowed.
        retry_in: Duration,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Circuit(#[from] CircuitError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("source '{source_name}' timed out after {timeout:?}")]
    Timeout {
        source_name: String,
        timeout: Duration,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error is a circuit-open rejection rather than a real
    /// operation failure.
    #[must_use]
    pub fn is_circuit_open(&self) -> bool {
        matches!(self, Error::Circuit(CircuitError::Open { .. }))
    }
}
