// src/error.rs

//! Error types shared by the simulation components.

/// Errors raised by the running simulation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// An argument had the wrong length or was out of range.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// `start` was called on a component whose loop is already running.
    #[error("{0} loop is already running")]
    AlreadyRunning(&'static str),
    /// The ODE solver did not reach the end of the requested step.
    #[error("integration failed: {0}")]
    IntegrationFailed(String),
    /// A previous worker thread panicked and its private state is gone.
    #[error("{0} worker panicked and cannot be restarted")]
    WorkerLost(&'static str),
}

/// Errors raised while loading configuration documents.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not valid YAML or misses required fields.
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// The document parsed but a value is physically meaningless.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
