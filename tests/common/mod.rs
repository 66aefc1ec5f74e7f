//! In-process mock registry and token issuer shared by the integration tests

#![allow(dead_code)]

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use flate2::Compression;
use flate2::write::GzEncoder;
use image_inspector::cli::ClientConfig;
use image_inspector::{Logger, Platform, RegistryClient};
use std::collections::{HashMap, VecDeque};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const IMAGE: &str = "library/demo";

#[derive(Clone, Default)]
pub struct Hits {
    pub manifest: Arc<AtomicUsize>,
    pub digest_manifest: Arc<AtomicUsize>,
    pub blob: Arc<AtomicUsize>,
    pub token: Arc<AtomicUsize>,
}

impl Hits {
    pub fn manifest(&self) -> usize {
        self.manifest.load(Ordering::SeqCst)
    }

    pub fn digest_manifest(&self) -> usize {
        self.digest_manifest.load(Ordering::SeqCst)
    }

    pub fn blob(&self) -> usize {
        self.blob.load(Ordering::SeqCst)
    }

    pub fn token(&self) -> usize {
        self.token.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct MockState {
    // Popped per tag request; the last entry keeps being served.
    tag_responses: Arc<Mutex<VecDeque<(u16, String)>>>,
    digest_manifests: Arc<HashMap<String, String>>,
    blobs: Arc<HashMap<String, (u16, Vec<u8>)>>,
    stalled_blobs: Arc<HashMap<String, Duration>>,
    token_response: (u16, String),
    hits: Hits,
    manifest_references: Arc<Mutex<Vec<String>>>,
    manifest_accepts: Arc<Mutex<Vec<Option<String>>>>,
    authorizations: Arc<Mutex<Vec<Option<String>>>>,
    token_scopes: Arc<Mutex<Vec<String>>>,
}

pub struct MockRegistry {
    tag_responses: VecDeque<(u16, String)>,
    digest_manifests: HashMap<String, String>,
    blobs: HashMap<String, (u16, Vec<u8>)>,
    stalled_blobs: HashMap<String, Duration>,
    token_response: (u16, String),
    blob_timeout: u64,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self {
            tag_responses: VecDeque::new(),
            digest_manifests: HashMap::new(),
            blobs: HashMap::new(),
            stalled_blobs: HashMap::new(),
            token_response: (200, r#"{"token":"test-token-0123456789abcdef","expires_in":300}"#.to_string()),
            blob_timeout: 5,
        }
    }

    pub fn tag_response(mut self, status: u16, body: impl Into<String>) -> Self {
        self.tag_responses.push_back((status, body.into()));
        self
    }

    pub fn digest_manifest(mut self, digest: &str, body: impl Into<String>) -> Self {
        self.digest_manifests.insert(digest.to_string(), body.into());
        self
    }

    pub fn blob(mut self, digest: &str, status: u16, body: Vec<u8>) -> Self {
        self.blobs.insert(digest.to_string(), (status, body));
        self
    }

    /// Serve `digest` only after `delay`; the client's blob timeout is cut to
    /// one second so the request fails in transit.
    pub fn stalled_blob(mut self, digest: &str, delay: Duration) -> Self {
        self.stalled_blobs.insert(digest.to_string(), delay);
        self.blob_timeout = 1;
        self
    }

    pub fn token_response(mut self, status: u16, body: impl Into<String>) -> Self {
        self.token_response = (status, body.into());
        self
    }

    pub async fn start(self) -> RunningRegistry {
        let state = MockState {
            tag_responses: Arc::new(Mutex::new(self.tag_responses)),
            digest_manifests: Arc::new(self.digest_manifests),
            blobs: Arc::new(self.blobs),
            stalled_blobs: Arc::new(self.stalled_blobs),
            token_response: self.token_response,
            hits: Hits::default(),
            manifest_references: Arc::new(Mutex::new(Vec::new())),
            manifest_accepts: Arc::new(Mutex::new(Vec::new())),
            authorizations: Arc::new(Mutex::new(Vec::new())),
            token_scopes: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route("/v2/{*path}", get(registry_handler))
            .route("/token", get(token_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        RunningRegistry {
            host: addr.to_string(),
            blob_timeout: self.blob_timeout,
            state,
            handle,
        }
    }
}

pub struct RunningRegistry {
    pub host: String,
    blob_timeout: u64,
    state: MockState,
    handle: JoinHandle<()>,
}

impl RunningRegistry {
    pub fn hits(&self) -> Hits {
        self.state.hits.clone()
    }

    pub fn token_url(&self) -> String {
        format!("http://{}/token", self.host)
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_insecure_registry(true)
            .with_token_endpoint(self.token_url())
            .with_timeout(5)
            .with_blob_timeout(self.blob_timeout)
    }

    pub fn client(&self) -> RegistryClient {
        RegistryClient::new(self.config(), Logger::new_quiet()).unwrap()
    }

    pub fn client_for_platform(&self, platform: Platform) -> RegistryClient {
        RegistryClient::new(self.config().with_platform(platform), Logger::new_quiet()).unwrap()
    }

    /// Manifest references (tags or digests) in request order
    pub fn manifest_references(&self) -> Vec<String> {
        self.state.manifest_references.lock().unwrap().clone()
    }

    /// `Accept` header of every manifest request, in order
    pub fn manifest_accepts(&self) -> Vec<Option<String>> {
        self.state.manifest_accepts.lock().unwrap().clone()
    }

    /// `Authorization` header of every registry request, in order
    pub fn authorizations(&self) -> Vec<Option<String>> {
        self.state.authorizations.lock().unwrap().clone()
    }

    pub fn token_scopes(&self) -> Vec<String> {
        self.state.token_scopes.lock().unwrap().clone()
    }
}

impl Drop for RunningRegistry {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn registry_handler(
    State(state): State<MockState>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.authorizations.lock().unwrap().push(authorization);

    if let Some((_, reference)) = path.split_once("manifests/") {
        state.manifest_references.lock().unwrap().push(reference.to_string());
        let accept = headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        state.manifest_accepts.lock().unwrap().push(accept);

        if reference.starts_with("sha256:") {
            state.hits.digest_manifest.fetch_add(1, Ordering::SeqCst);
            return match state.digest_manifests.get(reference) {
                Some(body) => (StatusCode::OK, body.clone()).into_response(),
                None => StatusCode::NOT_FOUND.into_response(),
            };
        }

        state.hits.manifest.fetch_add(1, Ordering::SeqCst);
        let (status, body) = {
            let mut queue = state.tag_responses.lock().unwrap();
            if queue.len() > 1 {
                queue.pop_front().unwrap()
            } else {
                queue.front().cloned().unwrap_or((404, String::new()))
            }
        };

        let status = StatusCode::from_u16(status).unwrap();
        if status == StatusCode::UNAUTHORIZED {
            return (
                status,
                [(
                    header::WWW_AUTHENTICATE,
                    "Bearer realm=\"http://mock/token\",service=\"registry.docker.io\"",
                )],
                body,
            )
                .into_response();
        }
        return (status, body).into_response();
    }

    if let Some((_, digest)) = path.split_once("blobs/") {
        state.hits.blob.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = state.stalled_blobs.get(digest) {
            tokio::time::sleep(*delay).await;
        }
        return match state.blobs.get(digest) {
            Some((status, body)) => (StatusCode::from_u16(*status).unwrap(), body.clone()).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        };
    }

    StatusCode::NOT_FOUND.into_response()
}

async fn token_handler(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.hits.token.fetch_add(1, Ordering::SeqCst);
    if let Some(scope) = params.get("scope") {
        state.token_scopes.lock().unwrap().push(scope.clone());
    }
    let (status, body) = state.token_response.clone();
    (StatusCode::from_u16(status).unwrap(), body).into_response()
}

pub fn manifest_json(layers: &[(&str, u64)]) -> String {
    let layers: Vec<serde_json::Value> = layers
        .iter()
        .map(|(digest, size)| {
            serde_json::json!({
                "mediaType": "application/vnd.oci.image.layer.v1.tar+gzip",
                "size": size,
                "digest": digest,
            })
        })
        .collect();

    serde_json::json!({
        "schemaVersion": 2,
        "mediaType": "application/vnd.oci.image.manifest.v1+json",
        "config": {
            "mediaType": "application/vnd.oci.image.config.v1+json",
            "size": 1470,
            "digest": "sha256:config",
        },
        "layers": layers,
    })
    .to_string()
}

/// Entries are `(mediaType, digest, architecture, os)`
pub fn index_json(entries: &[(&str, &str, &str, &str)]) -> String {
    let manifests: Vec<serde_json::Value> = entries
        .iter()
        .map(|(media_type, digest, architecture, os)| {
            serde_json::json!({
                "mediaType": media_type,
                "digest": digest,
                "size": 1024,
                "platform": { "architecture": architecture, "os": os },
            })
        })
        .collect();

    serde_json::json!({
        "schemaVersion": 2,
        "mediaType": "application/vnd.oci.image.index.v1+json",
        "manifests": manifests,
    })
    .to_string()
}

pub fn layer_tar(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, path, *content).unwrap();
    }
    builder.into_inner().unwrap()
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Address of a port nothing listens on
pub async fn closed_port_host() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}
