//! Request and response bodies of the inspection API

use crate::image::{LayerSummary, OsRelease};
use serde::{Deserialize, Serialize};

/// Body accepted by both endpoints. Absent fields decode as empty strings so
/// that they are reported as missing rather than as malformed JSON.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ImageRequest {
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tag: String,
}

impl ImageRequest {
    pub fn is_complete(&self) -> bool {
        !self.repository.is_empty() && !self.name.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageSizeResponse {
    pub layers_count: usize,
    pub total_size: u64,
}

impl From<LayerSummary> for ImageSizeResponse {
    fn from(summary: LayerSummary) -> Self {
        Self {
            layers_count: summary.layers_count,
            total_size: summary.total_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OsReleaseResponse {
    pub pretty_name: String,
    pub name: String,
    pub version_id: String,
    pub id: String,
    pub home_url: String,
}

impl From<OsRelease> for OsReleaseResponse {
    fn from(release: OsRelease) -> Self {
        Self {
            pretty_name: release.pretty_name,
            name: release.name,
            version_id: release.version_id,
            id: release.id,
            home_url: release.home_url,
        }
    }
}
