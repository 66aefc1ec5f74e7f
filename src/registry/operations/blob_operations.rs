//! Blob operations for registry client
//!
//! Downloads layer blobs (GET /v2/{name}/blobs/{digest}) on the long-timeout
//! client and scans them for the image's os-release file.

use crate::error::handlers::{HttpErrorHandler, NetworkErrorHandler};
use crate::error::{RegistryError, Result};
use crate::image::{Manifest, OsRelease};
use crate::logging::Logger;
use crate::registry::address::ImageReference;
use crate::registry::auth::TokenProvider;
use crate::registry::tar_utils::TarUtils;
use reqwest::{Client, StatusCode};

#[derive(Clone)]
pub struct BlobOperations {
    client: Client,
    scheme: String,
    tokens: TokenProvider,
    output: Logger,
}

impl BlobOperations {
    pub fn new(client: Client, scheme: String, tokens: TokenProvider, output: Logger) -> Self {
        Self {
            client,
            scheme,
            tokens,
            output,
        }
    }

    /// Download blob from registry using Docker Registry v2 API
    pub async fn pull_blob(
        &self,
        reference: &ImageReference,
        digest: &str,
        token: &str,
    ) -> Result<Vec<u8>> {
        let url = reference.blob_url(&self.scheme, digest);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                self.output.error(&format!("Failed to fetch blob {} for {}: {}", digest, reference, e));
                NetworkErrorHandler::handle_network_error(&e, "blob pull")
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            self.output.error(&format!(
                "Unexpected status {} for blob {} in {}",
                status, digest, reference
            ));
            return Err(HttpErrorHandler::handle_blob_error(status, digest));
        }

        let data = response.bytes().await.map_err(|e| {
            self.output.error(&format!("Failed to read blob body {} for {}: {}", digest, reference, e));
            NetworkErrorHandler::handle_network_error(&e, "blob pull")
        })?;

        self.output.verbose(&format!(
            "Read blob {} for {}, size: {}",
            digest,
            reference,
            self.output.format_size(data.len() as u64)
        ));

        Ok(data.to_vec())
    }

    /// Walk the manifest's layers in listed order and return the first
    /// os-release file found.
    ///
    /// One token is fetched up front and used for every blob. Any failed
    /// download aborts the walk; later layers are not consulted to shadow an
    /// earlier hit.
    pub async fn find_os_release(
        &self,
        reference: &ImageReference,
        manifest: &Manifest,
    ) -> Result<OsRelease> {
        let token = self.tokens.fetch_token(&reference.image_name).await?;
        let total = manifest.layers.len();

        for (i, layer) in manifest.layers.iter().enumerate() {
            self.output.info(&format!(
                "Fetching blob {} for {} (layer {}/{})",
                layer.digest,
                reference,
                i + 1,
                total
            ));

            let data = self.pull_blob(reference, &layer.digest, &token).await?;

            if let Some(release) = TarUtils::find_os_release(&data, &layer.digest, &self.output)
                .inspect_err(|e| {
                    self.output.error(&format!("Failed to parse os-release for {}: {}", reference, e));
                })?
            {
                self.output.success(&format!(
                    "Found os-release for {} in layer {}: {}",
                    reference, layer.digest, release.id
                ));
                return Ok(release);
            }
        }

        self.output.info(&format!("os-release not found in any layer for {}", reference));
        Err(RegistryError::NotFound(format!("os-release not found in {}", reference)))
    }
}
