//! Defines routes for the portfolio API.
//!
//! ## Structure
//! - **Manifest endpoints**
//!   - `GET  /api/manifest`: photo manifest (`?refresh=true` disables caching)
//!   - `GET  /api/meta`: SEO title/description/keywords
//!   - `POST /api/update-manifest`: regenerate on demand
//!
//! - **Photo proxy**
//!   - `GET  /api/photos/{*path}`: stream one object from the bucket
//!
//! The wildcard `*path` allows nested keys like `streetphotography/2025/img.jpg`.

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        manifest_handlers::{get_manifest, get_meta, update_manifest},
        photo_handlers::{get_photo, missing_photo_path},
    },
    services::portfolio_service::PortfolioService,
};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Build and return the router for all portfolio routes.
///
/// The router carries shared state (`PortfolioService`) to all handlers and
/// logs every request through `TraceLayer`.
pub fn routes() -> Router<PortfolioService> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // manifest documents
        .route("/api/manifest", get(get_manifest))
        .route("/api/meta", get(get_meta))
        .route("/api/update-manifest", post(update_manifest))
        // photo proxy
        .route("/api/photos", get(missing_photo_path))
        .route("/api/photos/", get(missing_photo_path))
        .route("/api/photos/{*path}", get(get_photo))
        .layer(TraceLayer::new_for_http())
}
