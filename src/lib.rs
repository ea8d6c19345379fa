//! Photo portfolio backend and client data layer.
//!
//! The server lists an object-storage bucket and serves a JSON manifest of
//! the photos in it (`/api/manifest`), SEO metadata (`/api/meta`) and a photo
//! proxy (`/api/photos/...`). `commands` holds the one-shot manifest export
//! and usage report. The `client` module is the consuming side: a
//! cached manifest provider plus gallery UI state.

pub mod client;
pub mod commands;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

use axum::Router;

use services::portfolio_service::PortfolioService;

/// Router with all portfolio routes, bound to `service`.
pub fn app(service: PortfolioService) -> Router {
    routes::routes::routes().with_state(service)
}
