//! Endpoint handlers
//!
//! Each handler validates the request, then runs the registry operation on its
//! own task so that a client hanging up does not abort the registry calls.

use crate::api::AppState;
use crate::api::models::{ImageRequest, ImageSizeResponse, OsReleaseResponse};
use crate::error::RegistryError;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub const INVALID_JSON: &str = "Invalid JSON";
pub const MISSING_FIELDS: &str = "Missing repository or name";
pub const IMAGE_NOT_FOUND: &str = "Image not found";
pub const OS_RELEASE_NOT_FOUND: &str = "OS release info not found";
pub const INTERNAL_ERROR: &str = "Internal server error";

pub async fn image_download_size(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match decode_request(&body) {
        Ok(request) => request,
        Err(rejection) => return rejection,
    };

    let client = state.client.clone();
    let task = tokio::spawn(async move {
        client
            .image_layer_info(&request.repository, &request.name, &request.tag)
            .await
    });

    match task.await {
        Ok(Ok(summary)) => Json(ImageSizeResponse::from(summary)).into_response(),
        Ok(Err(err)) => error_response(&err, IMAGE_NOT_FOUND),
        Err(join_err) => {
            state.output.error(&format!("Layer info task failed: {}", join_err));
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR).into_response()
        }
    }
}

pub async fn os_release_info(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match decode_request(&body) {
        Ok(request) => request,
        Err(rejection) => return rejection,
    };

    let client = state.client.clone();
    let task = tokio::spawn(async move {
        client
            .os_release_info(&request.repository, &request.name, &request.tag)
            .await
    });

    match task.await {
        Ok(Ok(release)) => Json(OsReleaseResponse::from(release)).into_response(),
        Ok(Err(err)) => error_response(&err, OS_RELEASE_NOT_FOUND),
        Err(join_err) => {
            state.output.error(&format!("OS release task failed: {}", join_err));
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR).into_response()
        }
    }
}

fn decode_request(body: &[u8]) -> Result<ImageRequest, Response> {
    let request: ImageRequest = serde_json::from_slice(body)
        .map_err(|_| (StatusCode::BAD_REQUEST, INVALID_JSON).into_response())?;

    if !request.is_complete() {
        return Err((StatusCode::BAD_REQUEST, MISSING_FIELDS).into_response());
    }

    Ok(request)
}

fn error_response(err: &RegistryError, not_found_message: &'static str) -> Response {
    if err.is_not_found() {
        (StatusCode::NOT_FOUND, not_found_message).into_response()
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR).into_response()
    }
}
