//! Standardized mapping of HTTP statuses and transport failures to [`RegistryError`]

use crate::error::{ConfigError, RegistryError};
use reqwest::StatusCode;

/// Standard error handler for HTTP responses
pub struct HttpErrorHandler;

impl HttpErrorHandler {
    /// Classify a non-200 manifest response
    pub fn handle_manifest_error(status: StatusCode, error_text: &str, reference: &str) -> RegistryError {
        match status.as_u16() {
            404 => RegistryError::NotFound(format!("Manifest {} not found", reference)),
            429 => RegistryError::RateLimited(format!(
                "Rate limit exceeded while fetching manifest {}",
                reference
            )),
            401 => RegistryError::Internal(format!(
                "Unauthorized to fetch manifest {} after token retry: {}",
                reference, error_text
            )),
            _ => RegistryError::Internal(format!(
                "Unexpected status {} for manifest {}: {}",
                status, reference, error_text
            )),
        }
    }

    /// Any non-200 blob response aborts the operation
    pub fn handle_blob_error(status: StatusCode, digest: &str) -> RegistryError {
        RegistryError::Internal(format!("Unexpected status {} for blob {}", status, digest))
    }

    /// Handle token endpoint errors
    pub fn handle_auth_error(status: StatusCode, error_text: &str) -> RegistryError {
        let error_msg = match status.as_u16() {
            400 => "Invalid token request parameters".to_string(),
            401 => "Invalid credentials provided".to_string(),
            403 => "Access denied - insufficient permissions".to_string(),
            404 => "Authentication endpoint not found".to_string(),
            _ => format!("Unexpected status {} from auth endpoint: {}", status, error_text),
        };

        RegistryError::Auth(error_msg)
    }
}

/// Network error categorization and handling
pub struct NetworkErrorHandler;

impl NetworkErrorHandler {
    /// Categorize and format network errors with helpful context
    pub fn handle_network_error(error: &reqwest::Error, context: &str) -> RegistryError {
        if error.is_timeout() {
            RegistryError::Internal(format!("{} timeout: {}", context, error))
        } else if error.is_connect() {
            RegistryError::Internal(format!("Connection error during {}: {}", context, error))
        } else if error.is_body() || error.is_decode() {
            RegistryError::Internal(format!("Failed to read {} body: {}", context, error))
        } else {
            RegistryError::Internal(format!("{} network error: {}", context, error))
        }
    }
}

/// Validation error utilities
pub struct ValidationErrorHandler;

impl ValidationErrorHandler {
    /// Standard numeric range validation
    pub fn validate_timeout(name: &str, timeout: u64) -> Result<(), ConfigError> {
        if timeout == 0 {
            return Err(ConfigError::Invalid(format!(
                "{} must be greater than 0",
                name
            )));
        }

        if timeout > 86400 {
            return Err(ConfigError::Invalid(format!(
                "{} cannot exceed 24 hours (86400 seconds)",
                name
            )));
        }

        Ok(())
    }

    /// Token endpoints must be absolute http(s) URLs
    pub fn validate_endpoint_url(url: &str) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "Endpoint must use http:// or https://: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn validate_not_empty(name: &str, value: &str) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("{} cannot be empty", name)));
        }
        Ok(())
    }
}
