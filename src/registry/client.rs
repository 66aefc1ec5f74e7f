// This file contains the implementation of the RegistryClient struct,
// which answers image metadata questions by talking to the registry API
// directly: layer sizes from the manifest, OS identity from layer blobs.

use crate::cli::config::ClientConfig;
use crate::error::{ConfigError, Result};
use crate::image::{LayerSummary, Manifest, OsRelease};
use crate::logging::Logger;
use crate::registry::address::ImageReference;
use crate::registry::auth::TokenProvider;
use crate::registry::operations::{BlobOperations, ManifestOperations};
use reqwest::Client;
use std::time::Instant;

pub struct RegistryClientBuilder {
    config: ClientConfig,
    output: Option<Logger>,
}

impl RegistryClientBuilder {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            output: None,
        }
    }

    pub fn with_output(mut self, output: Logger) -> Self {
        self.output = Some(output);
        self
    }

    pub fn build(self) -> std::result::Result<RegistryClient, ConfigError> {
        self.config.validate()?;
        let output = self.output.unwrap_or_default();

        // Manifest and token round trips share the short budget; blobs get their own client.
        let control = Client::builder()
            .timeout(self.config.control_timeout())
            .build()?;
        let bulk = Client::builder()
            .timeout(self.config.bulk_timeout())
            .build()?;

        let tokens = TokenProvider::new(
            control.clone(),
            self.config.token_endpoint.clone(),
            self.config.token_service.clone(),
            output.clone(),
        );
        let manifests = ManifestOperations::new(
            control,
            self.config.scheme.clone(),
            self.config.platform.clone(),
            tokens.clone(),
            output.clone(),
        );
        let blobs = BlobOperations::new(bulk, self.config.scheme.clone(), tokens, output.clone());

        Ok(RegistryClient {
            manifests,
            blobs,
            output,
        })
    }
}

/// Cheap to clone; clones share the underlying connection pools.
#[derive(Clone)]
pub struct RegistryClient {
    manifests: ManifestOperations,
    blobs: BlobOperations,
    output: Logger,
}

impl RegistryClient {
    pub fn new(config: ClientConfig, output: Logger) -> std::result::Result<Self, ConfigError> {
        Self::builder(config).with_output(output).build()
    }

    pub fn builder(config: ClientConfig) -> RegistryClientBuilder {
        RegistryClientBuilder::new(config)
    }

    pub async fn resolve_manifest(&self, reference: &ImageReference) -> Result<Manifest> {
        self.manifests.resolve_manifest(reference).await
    }

    /// Distinct layer count and total download size of an image
    pub async fn image_layer_info(&self, repository: &str, name: &str, tag: &str) -> Result<LayerSummary> {
        let start = Instant::now();
        let reference = ImageReference::new(repository, name, tag);

        let manifest = self.resolve_manifest(&reference).await.inspect_err(|e| {
            self.output.error(&format!("Failed to get manifest for layer info {}: {}", reference, e));
        })?;
        let summary = LayerSummary::from_manifest(&manifest);

        self.output.info(&format!(
            "Layer info for {}: {} layers, {} ({} bytes) in {}",
            reference,
            summary.layers_count,
            self.output.format_size(summary.total_size),
            summary.total_size,
            self.output.format_duration(start.elapsed())
        ));
        Ok(summary)
    }

    /// OS identity read from the first os-release file in the image's layers
    pub async fn os_release_info(&self, repository: &str, name: &str, tag: &str) -> Result<OsRelease> {
        let start = Instant::now();
        let reference = ImageReference::new(repository, name, tag);

        let manifest = self.resolve_manifest(&reference).await.inspect_err(|e| {
            self.output.error(&format!("Failed to get manifest for OS release info {}: {}", reference, e));
        })?;
        let release = self.blobs.find_os_release(&reference, &manifest).await?;

        self.output.info(&format!(
            "OS release for {}: {} ({}) in {}",
            reference,
            release.id,
            release.pretty_name,
            self.output.format_duration(start.elapsed())
        ));
        Ok(release)
    }
}
