use thiserror::Error;

use crate::types::FailoverTarget;

#[derive(Debug, Error)]
pub enum ShardctlError {
    // IO
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Config
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file not found at {0}, run `shardctl init` first")]
    ConfigNotFound(String),

    #[error("TOML deserialization error: {0}")]
    TomlDe(String),

    #[error("TOML serialization error: {0}")]
    TomlSer(String),

    // Local validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Broker
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Broker rejected request with status {status}: {body}")]
    BrokerRejected { status: u16, body: String },

    #[error("Cannot decode broker response: {0}")]
    Decode(String),

    // Selection
    #[error("No eligible {target} node found in cluster {cluster}")]
    NoEligibleNode {
        cluster: String,
        target: FailoverTarget,
    },
}

impl ShardctlError {
    /// HTTP status carried by a broker rejection, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ShardctlError::BrokerRejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShardctlError>;
