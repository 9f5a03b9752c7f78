use thiserror::Error;

/// Errors raised while building or reading deployment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration for network `{0}`")]
    UnknownNetwork(String),
    #[error("invalid escrow weight schedule: {0}")]
    InvalidSchedule(String),
    #[error("invalid address `{0}`")]
    InvalidAddress(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
