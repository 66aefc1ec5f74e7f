//! Configuration management module

use crate::error::ConfigError;
use crate::error::handlers::ValidationErrorHandler;
use crate::image::Platform;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://auth.docker.io/token";
pub const DEFAULT_TOKEN_SERVICE: &str = "registry.docker.io";

/// Registry client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// URL scheme used to reach registry hosts
    pub scheme: String,
    /// Timeout in seconds for manifest and token round trips
    pub timeout: u64,
    /// Timeout in seconds for blob downloads
    pub blob_timeout: u64,
    /// Token issuer queried for every registry host
    pub token_endpoint: String,
    pub token_service: String,
    pub platform: Platform,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            timeout: 30,
            blob_timeout: 600,
            token_endpoint: DEFAULT_TOKEN_ENDPOINT.to_string(),
            token_service: DEFAULT_TOKEN_SERVICE.to_string(),
            platform: Platform::default(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_insecure_registry(mut self, insecure: bool) -> Self {
        self.scheme = if insecure { "http" } else { "https" }.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_blob_timeout(mut self, blob_timeout: u64) -> Self {
        self.blob_timeout = blob_timeout;
        self
    }

    pub fn with_token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.token_endpoint = endpoint.into();
        self
    }

    pub fn with_token_service(mut self, service: impl Into<String>) -> Self {
        self.token_service = service.into();
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn control_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn bulk_timeout(&self) -> Duration {
        Duration::from_secs(self.blob_timeout)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.scheme.as_str(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "Unsupported registry scheme: {}",
                self.scheme
            )));
        }
        ValidationErrorHandler::validate_timeout("Timeout", self.timeout)?;
        ValidationErrorHandler::validate_timeout("Blob timeout", self.blob_timeout)?;
        ValidationErrorHandler::validate_endpoint_url(&self.token_endpoint)?;
        ValidationErrorHandler::validate_not_empty("Token service", &self.token_service)?;
        ValidationErrorHandler::validate_not_empty("Platform architecture", &self.platform.architecture)?;
        ValidationErrorHandler::validate_not_empty("Platform OS", &self.platform.os)?;
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen_address: String,
    /// Seconds in-flight requests get to finish after a shutdown signal
    pub shutdown_grace: u64,
}

impl ServerConfig {
    pub fn new(listen_address: impl Into<String>) -> Self {
        Self {
            listen_address: listen_address.into(),
            shutdown_grace: 5,
        }
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ValidationErrorHandler::validate_not_empty("Listen address", &self.listen_address)
    }
}
