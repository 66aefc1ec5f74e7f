//! Error types and handlers for registry operations

pub mod handlers;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

/// Outcome kinds of a registry operation.
///
/// The set is closed: the HTTP layer only distinguishes [`RegistryError::NotFound`]
/// from everything else, but callers and tests can match on the exact kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Manifest or file absent
    #[error("Not found: {0}")]
    NotFound(String),
    /// Upstream throttling (HTTP 429)
    #[error("Rate limited: {0}")]
    RateLimited(String),
    /// Token issuance failure
    #[error("Authentication error: {0}")]
    Auth(String),
    /// Malformed manifest JSON or malformed/incomplete os-release content
    #[error("Parse error: {0}")]
    Parse(String),
    /// Any other transport, status-code or read failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RegistryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound(_))
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        handlers::NetworkErrorHandler::handle_network_error(&err, "registry request")
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Parse(err.to_string())
    }
}

/// Errors raised while assembling configuration or the HTTP clients, before any
/// registry conversation starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}
