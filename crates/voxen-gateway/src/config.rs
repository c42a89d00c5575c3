//! Gateway configuration loaded from environment variables.

use crate::error::{GatewayError, Result};

/// Connection settings for the hosted gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the gateway API.
    /// Env: `VOXEN_GATEWAY_URL`
    pub base_url: String,

    /// Bearer token identifying this installation to the auth provider.
    /// Env: `VOXEN_GATEWAY_TOKEN`
    /// Default: none (login will fail until the provider flow supplies one).
    pub auth_token: Option<String>,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize(base_url.into()),
            auth_token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Load from the environment. The URL is required.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("VOXEN_GATEWAY_URL")
            .map_err(|_| GatewayError::Config("VOXEN_GATEWAY_URL is not set".to_string()))?;

        Ok(Self {
            base_url: normalize(base_url),
            auth_token: std::env::var("VOXEN_GATEWAY_TOKEN").ok(),
        })
    }
}

fn normalize(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
