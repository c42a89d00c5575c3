use thiserror::Error;

use voxen_gateway::GatewayError;

/// Errors surfaced by client operations.
///
/// `Validation` failures happen before any network call and leave no side
/// effects. `Gateway` failures are caught at the call site; local state is
/// left exactly as it was before the call. Neither is retried or fatal.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ClientError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }
}
