//! Manifest operations for registry client
//!
//! Implements manifest resolution against the Docker Registry v2 API:
//! - Manifest download (GET /v2/{name}/manifests/{reference})
//! - A single bearer-token retry after a 401 challenge
//! - OCI index de-referencing to the configured target platform

use crate::error::handlers::{HttpErrorHandler, NetworkErrorHandler};
use crate::error::{RegistryError, Result};
use crate::image::manifest::{DOCKER_MANIFEST_V2, ManifestIndex, parse_manifest};
use crate::image::{Manifest, Platform};
use crate::logging::Logger;
use crate::registry::address::ImageReference;
use crate::registry::auth::TokenProvider;
use reqwest::{Client, Response, StatusCode};

#[derive(Clone)]
pub struct ManifestOperations {
    client: Client,
    scheme: String,
    platform: Platform,
    tokens: TokenProvider,
    output: Logger,
}

impl ManifestOperations {
    pub fn new(
        client: Client,
        scheme: String,
        platform: Platform,
        tokens: TokenProvider,
        output: Logger,
    ) -> Self {
        Self {
            client,
            scheme,
            platform,
            tokens,
            output,
        }
    }

    /// Fetch the manifest for `reference`, de-indexing multi-platform images.
    ///
    /// A 401 on the first request triggers one token fetch and exactly one
    /// authenticated retry; whatever the retry returns is final.
    pub async fn resolve_manifest(&self, reference: &ImageReference) -> Result<Manifest> {
        let url = reference.manifest_url(&self.scheme, &reference.tag);
        self.output.verbose(&format!("Pulling manifest for {}", reference));

        let mut token = None;
        let mut response = self.get_manifest(&url, None).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let challenge = response
                .headers()
                .get("www-authenticate")
                .and_then(|h| h.to_str().ok())
                .unwrap_or("")
                .to_string();
            self.output.verbose(&format!(
                "Received 401 for {}, WWW-Authenticate: {}",
                reference, challenge
            ));

            let fresh = self.tokens.fetch_token(&reference.image_name).await?;
            self.output.verbose(&format!("Retrying manifest request with token for {}", reference));
            response = self.get_manifest(&url, Some(&fresh)).await?;
            token = Some(fresh);
        }

        let status = response.status();
        let body = Self::read_body(response, "manifest").await?;
        self.output.detail(&format!(
            "Manifest response for {}: status={}, {} bytes",
            reference,
            status,
            body.len()
        ));

        if status != StatusCode::OK {
            let error = HttpErrorHandler::handle_manifest_error(
                status,
                &String::from_utf8_lossy(&body),
                &reference.to_string(),
            );
            if error.is_not_found() {
                self.output.info(&format!("Manifest not found for {}", reference));
            } else {
                self.output.error(&format!("Manifest request for {} failed: {}", reference, error));
            }
            return Err(error);
        }

        if let Some(index) = ManifestIndex::from_body(&body) {
            self.output.verbose(&format!(
                "Received manifest index for {}, selecting {} manifest",
                reference, self.platform
            ));

            if let Some(entry) = index.select(&self.platform) {
                let token = match token {
                    Some(token) => token,
                    None => self.tokens.fetch_token(&reference.image_name).await?,
                };
                let platform_body = self
                    .fetch_platform_manifest(reference, &entry.digest, &token)
                    .await?;
                return self.parse(reference, &platform_body);
            }

            self.output.warning(&format!(
                "No {} manifest listed in index for {}",
                self.platform, reference
            ));
        }

        self.parse(reference, &body)
    }

    async fn fetch_platform_manifest(
        &self,
        reference: &ImageReference,
        digest: &str,
        token: &str,
    ) -> Result<Vec<u8>> {
        let url = reference.manifest_url(&self.scheme, digest);
        let response = self.get_manifest(&url, Some(token)).await?;
        let status = response.status();
        let body = Self::read_body(response, "manifest").await?;

        if status != StatusCode::OK {
            self.output.error(&format!(
                "Unexpected status {} for manifest digest {} of {}",
                status, digest, reference
            ));
            return Err(RegistryError::Internal(format!(
                "Unexpected status {} for manifest digest {}",
                status, digest
            )));
        }

        Ok(body)
    }

    async fn get_manifest(&self, url: &str, token: Option<&str>) -> Result<Response> {
        let mut request = self.client.get(url).header("Accept", DOCKER_MANIFEST_V2);

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        request.send().await.map_err(|e| {
            self.output.error(&format!("Failed to fetch manifest {}: {}", url, e));
            NetworkErrorHandler::handle_network_error(&e, "manifest pull")
        })
    }

    async fn read_body(response: Response, context: &str) -> Result<Vec<u8>> {
        let data = response
            .bytes()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, context))?;
        Ok(data.to_vec())
    }

    fn parse(&self, reference: &ImageReference, body: &[u8]) -> Result<Manifest> {
        let manifest = parse_manifest(body).inspect_err(|e| {
            self.output.error(&format!("Failed to parse manifest for {}: {}", reference, e));
        })?;
        self.output.verbose(&format!(
            "Parsed manifest for {}: {} layers",
            reference,
            manifest.layers.len()
        ));
        Ok(manifest)
    }
}
