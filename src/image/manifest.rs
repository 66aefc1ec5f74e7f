//! Manifest and manifest index documents, plus layer size aggregation

use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DOCKER_MANIFEST_V2: &str = "application/vnd.docker.distribution.manifest.v2+json";
pub const OCI_IMAGE_MANIFEST_V1: &str = "application/vnd.oci.image.manifest.v1+json";
pub const OCI_IMAGE_INDEX_V1: &str = "application/vnd.oci.image.index.v1+json";

/// Single-platform image manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub schema_version: u32,
    #[serde(default)]
    pub media_type: String,
    pub layers: Vec<Layer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    #[serde(default)]
    pub media_type: String,
    pub size: u64,
    pub digest: String,
}

/// Target platform used to pick an entry out of a manifest index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    #[serde(default)]
    pub architecture: String,
    #[serde(default)]
    pub os: String,
}

impl Platform {
    pub fn new(architecture: impl Into<String>, os: impl Into<String>) -> Self {
        Self {
            architecture: architecture.into(),
            os: os.into(),
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::new("amd64", "linux")
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.os, self.architecture)
    }
}

/// Multi-platform manifest index
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestIndex {
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub manifests: Vec<ManifestIndexEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestIndexEntry {
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub digest: String,
    #[serde(default)]
    pub platform: Option<Platform>,
}

impl ManifestIndex {
    /// Interpret a manifest response body as an OCI index.
    ///
    /// Returns `None` when the body is not JSON or declares another media type.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        serde_json::from_slice::<ManifestIndex>(body)
            .ok()
            .filter(|index| index.media_type == OCI_IMAGE_INDEX_V1)
    }

    /// First entry matching the platform that points at an OCI image manifest
    pub fn select(&self, platform: &Platform) -> Option<&ManifestIndexEntry> {
        self.manifests.iter().find(|entry| {
            entry.media_type == OCI_IMAGE_MANIFEST_V1 && entry.platform.as_ref() == Some(platform)
        })
    }
}

/// Parse a manifest response body
pub fn parse_manifest(body: &[u8]) -> Result<Manifest> {
    serde_json::from_slice(body)
        .map_err(|e| RegistryError::Parse(format!("Failed to parse manifest: {}", e)))
}

/// Deduplicated layer count and total download size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSummary {
    pub layers_count: usize,
    pub total_size: u64,
}

impl LayerSummary {
    /// Count every distinct digest once, in manifest order
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let mut seen = HashSet::new();
        let mut total_size = 0u64;

        for layer in &manifest.layers {
            if seen.insert(layer.digest.as_str()) {
                total_size = total_size.saturating_add(layer.size);
            }
        }

        Self {
            layers_count: seen.len(),
            total_size,
        }
    }
}
