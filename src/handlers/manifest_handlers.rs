//! HTTP handlers for the manifest documents.
//!
//! - `GET  /api/manifest[?refresh=true]`
//! - `GET  /api/meta`
//! - `POST /api/update-manifest`
//!
//! Every path ends in a well-formed JSON response: store failures are
//! logged by the service and turned into a 500 here.

use crate::{
    errors::AppError,
    models::photo::UpdateManifestResponse,
    services::portfolio_service::PortfolioService,
};
use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Query params accepted by the manifest endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ManifestQuery {
    pub refresh: Option<String>,
}

impl ManifestQuery {
    pub fn force_refresh(&self) -> bool {
        self.refresh.as_deref() == Some("true")
    }
}

/// `GET /api/manifest`
pub async fn get_manifest(
    State(service): State<PortfolioService>,
    Query(q): Query<ManifestQuery>,
) -> Result<Response, AppError> {
    let force_refresh = q.force_refresh();
    let manifest = service
        .generate_manifest()
        .await
        .map_err(|_| AppError::internal("Failed to generate manifest"))?;

    Ok(json_response(
        &manifest,
        &service.cache_control(force_refresh),
    ))
}

/// `GET /api/meta`
pub async fn get_meta(State(service): State<PortfolioService>) -> Result<Response, AppError> {
    let meta = service
        .page_meta()
        .await
        .map_err(|_| AppError::internal("Failed to generate meta data"))?;

    Ok(json_response(&meta, &service.cache_control(false)))
}

/// `POST /api/update-manifest`
///
/// Regenerates the manifest on demand and reports what was found. Other
/// methods are answered with 405 by the router.
pub async fn update_manifest(
    State(service): State<PortfolioService>,
) -> Result<Response, AppError> {
    let manifest = service
        .generate_manifest()
        .await
        .map_err(|_| AppError::internal("Failed to update manifest"))?;

    let message = if manifest.is_empty() {
        "No photos found"
    } else {
        "Manifest updated successfully"
    };
    let body = UpdateManifestResponse {
        message: message.into(),
        photos_found: manifest.total_photos,
        categories: manifest.categories.len(),
        manifest,
    };

    Ok(json_response(&body, &service.cache_control(true)))
}

/// Serialize `body` as JSON with the given cache directive and the standard
/// hardening headers.
fn json_response<T: Serialize>(body: &T, cache_control: &str) -> Response {
    let mut response = Json(body).into_response();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(cache_control) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    set_security_headers(headers);
    response
}

pub(crate) fn set_security_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::X_XSS_PROTECTION,
        HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "permissions-policy",
        HeaderValue::from_static("camera=(), microphone=(), geolocation=()"),
    );
}
