//! Inspection HTTP API
//!
//! Two JSON endpoints under `/api/v1`, both POST-only:
//! - `/image-download-size`: distinct layer count and total compressed size
//! - `/os-release-info`: OS identity parsed from the image's os-release file

pub mod handlers;
pub mod models;

use crate::logging::Logger;
use crate::registry::RegistryClient;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::post;
use axum::Router;
use std::time::Instant;

#[derive(Clone)]
pub struct AppState {
    pub client: RegistryClient,
    pub output: Logger,
}

impl AppState {
    pub fn new(client: RegistryClient, output: Logger) -> Self {
        Self { client, output }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/image-download-size", post(handlers::image_download_size))
        .route("/api/v1/os-release-info", post(handlers::os_release_info))
        .layer(middleware::from_fn_with_state(state.clone(), access_log))
        .with_state(state)
}

/// Logs `{status} {method} {path} {duration}` once the response is ready
pub async fn access_log(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    state.output.info(&format!(
        "{} {} {} {}",
        response.status().as_u16(),
        method,
        path,
        state.output.format_duration(start.elapsed())
    ));
    response
}
