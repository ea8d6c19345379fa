//! Liveness and readiness probes.
//!
//! - `GET /healthz` answers without touching the bucket
//! - `GET /readyz` lists one key to confirm the bucket is reachable

use crate::services::portfolio_service::PortfolioService;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
struct Probe {
    status: &'static str,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    checks: BTreeMap<&'static str, Check>,
}

#[derive(Serialize)]
struct Check {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// `GET /healthz`
pub async fn healthz() -> impl IntoResponse {
    Json(Probe {
        status: "ok",
        checks: BTreeMap::new(),
    })
}

/// `GET /readyz`
///
/// 200 while the store answers a one-key listing, 503 otherwise.
pub async fn readyz(State(service): State<PortfolioService>) -> impl IntoResponse {
    let store = match service.probe_store().await {
        Ok(()) => Check {
            ok: true,
            error: None,
        },
        Err(err) => {
            tracing::warn!("readiness probe failed: {}", err);
            Check {
                ok: false,
                error: Some(err.to_string()),
            }
        }
    };

    let (status, label) = if store.ok {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };
    let body = Probe {
        status: label,
        checks: BTreeMap::from([("store", store)]),
    };
    (status, Json(body))
}
