//! Registry host and repository normalization


/// Host every known Docker Hub alias is rewritten to
pub const DOCKER_HUB_HOST: &str = "registry-1.docker.io";
pub const DOCKER_HUB_ALIASES: [&str; 2] = ["docker.io", "dockerhub.timeweb.cloud"];
pub const DEFAULT_NAMESPACE: &str = "library";
pub const DEFAULT_TAG: &str = "latest";

/// Map a user-supplied registry host and image name to the canonical pair.
///
/// Pure and idempotent; never fails.
pub fn resolve(host: &str, image_name: &str) -> (String, String) {
    let host = if DOCKER_HUB_ALIASES.contains(&host) {
        DOCKER_HUB_HOST
    } else {
        host
    };

    let image_name = if host == DOCKER_HUB_HOST && !image_name.contains('/') {
        format!("{}/{}", DEFAULT_NAMESPACE, image_name)
    } else {
        image_name.to_string()
    };

    (host.to_string(), image_name)
}

/// A normalized `host/name:tag` triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub registry_host: String,
    pub image_name: String,
    pub tag: String,
}

impl ImageReference {
    pub fn new(repository: &str, name: &str, tag: &str) -> Self {
        let (registry_host, image_name) = resolve(repository, name);
        let tag = if tag.is_empty() { DEFAULT_TAG } else { tag };

        Self {
            registry_host,
            image_name,
            tag: tag.to_string(),
        }
    }

    /// `GET /v2/{name}/manifests/{reference}`, where reference is a tag or digest
    pub fn manifest_url(&self, scheme: &str, reference: &str) -> String {
        format!(
            "{}://{}/v2/{}/manifests/{}",
            scheme, self.registry_host, self.image_name, reference
        )
    }

    /// `GET /v2/{name}/blobs/{digest}`
    pub fn blob_url(&self, scheme: &str, digest: &str) -> String {
        format!(
            "{}://{}/v2/{}/blobs/{}",
            scheme, self.registry_host, self.image_name, digest
        )
    }
}

impl std::fmt::Display for ImageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}:{}", self.registry_host, self.image_name, self.tag)
    }
}
