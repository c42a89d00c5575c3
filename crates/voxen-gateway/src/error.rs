use thiserror::Error;

/// Errors produced by the gateway boundary.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Transport-level failure reaching the remote service.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The gateway answered with a non-success status.
    #[error("Gateway returned {status}: {detail}")]
    Status { status: u16, detail: String },

    /// An operation requiring a signed-in user ran without one.
    #[error("Not signed in")]
    NotAuthenticated,

    /// A record addressed by id does not exist.
    #[error("Record not found")]
    NotFound,

    /// The gateway is unreachable or refused the call.
    #[error("Gateway unavailable: {0}")]
    Unavailable(String),

    /// (De)serialization failure at the wire boundary.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O failure reading a file for upload.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Required configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GatewayError>;
