use thiserror::Error;

/// Failures raised by the simulation core.
#[derive(Error, Debug)]
pub enum GameError {
    /// A required argument was out of its valid domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A bounded pool was already full.
    #[error("pool is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },

    /// Index-based lookup outside the occupied prefix.
    #[error("index {index} out of range (len {len})")]
    NotFound { index: usize, len: usize },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    /// A value parsed fine but cannot drive a game.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
