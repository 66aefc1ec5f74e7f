//! Bearer token retrieval for registry pulls

use crate::error::handlers::HttpErrorHandler;
use crate::error::{RegistryError, Result};
use crate::logging::Logger;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: String,
    // Note: expires_in is part of the API response but never tracked
    #[allow(dead_code)]
    expires_in: Option<u64>,
}

/// Issues pull-scoped bearer tokens from one fixed token endpoint.
///
/// The endpoint does not depend on the registry host being accessed, so
/// registries that use a different issuer will reject the token.
#[derive(Debug, Clone)]
pub struct TokenProvider {
    client: Client,
    endpoint: String,
    service: String,
    output: Logger,
}

impl TokenProvider {
    pub fn new(client: Client, endpoint: String, service: String, output: Logger) -> Self {
        Self {
            client,
            endpoint,
            service,
            output,
        }
    }

    pub fn token_url(&self, image_name: &str) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint).map_err(|e| {
            RegistryError::Auth(format!("Invalid token endpoint {}: {}", self.endpoint, e))
        })?;
        url.query_pairs_mut()
            .append_pair("service", &self.service)
            .append_pair("scope", &format!("repository:{}:pull", image_name));
        Ok(url)
    }

    /// Fetch a token granting pull access to `image_name`
    pub async fn fetch_token(&self, image_name: &str) -> Result<String> {
        let url = self.token_url(image_name)?;
        self.output.detail(&format!("Requesting token from: {}", url));

        let response = self.client.get(url).send().await.map_err(|e| {
            self.output.error(&format!("Failed to fetch auth token for {}: {}", image_name, e));
            RegistryError::Auth(format!("Failed to fetch auth token: {}", e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            RegistryError::Auth(format!("Failed to read auth token response: {}", e))
        })?;

        if status != StatusCode::OK {
            self.output.error(&format!(
                "Unexpected status {} from auth endpoint for {}, body: {}",
                status, image_name, body
            ));
            return Err(HttpErrorHandler::handle_auth_error(status, &body));
        }

        let token_response: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            self.output.error(&format!("Failed to parse auth token response for {}: {}", image_name, e));
            RegistryError::Auth(format!("Failed to parse token response: {}", e))
        })?;

        if token_response.token.is_empty() {
            self.output.error(&format!("Empty token received for {}", image_name));
            return Err(RegistryError::Auth("Empty token received".to_string()));
        }

        self.output.verbose(&format!(
            "Fetched auth token for {}: {}...",
            image_name,
            token_prefix(&token_response.token)
        ));

        Ok(token_response.token)
    }
}

fn token_prefix(token: &str) -> &str {
    match token.char_indices().nth(20) {
        Some((idx, _)) => &token[..idx],
        None => token,
    }
}
