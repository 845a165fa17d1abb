//! Root banner & health handlers.
//!
//! - GET /         -> API banner with name and version
//! - GET /healthz  -> simple liveness ("ok")
//! - GET /readyz   -> readiness that probes the object store per bucket

use crate::handlers::image_handlers::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;

/// `GET /`
///
/// Small banner so the frontend (and curious humans) can see what they hit.
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Welcome to the gallery API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /healthz`
///
/// Very small liveness probe — always returns 200 OK with a plain JSON body.
/// This endpoint should be cheap and never perform I/O.
pub async fn healthz() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".into(),
        }),
    )
}

/// `GET /readyz`
///
/// Readiness probe that checks each gallery bucket is reachable in the object
/// store. Returns JSON describing each check; HTTP 200 when all checks pass,
/// HTTP 503 when any check fails.
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let mut checks = HashMap::new();
    let mut overall_ok = true;

    for (label, catalog) in [("jets", &state.jets), ("sportscars", &state.sportscars)] {
        let check = match catalog.ping().await {
            Ok(true) => CheckStatus {
                ok: true,
                error: None,
            },
            Ok(false) => CheckStatus {
                ok: false,
                error: Some(format!("bucket `{}` is missing", catalog.bucket())),
            },
            Err(err) => CheckStatus {
                ok: false,
                error: Some(err.to_string()),
            },
        };
        overall_ok &= check.ok;
        checks.insert(label, check);
    }

    let body = ReadyResponse {
        status: if overall_ok {
            "ok".into()
        } else {
            "error".into()
        },
        checks,
    };

    let status = if overall_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

#[derive(Serialize)]
struct ReadyResponse {
    status: String,
    checks: HashMap<&'static str, CheckStatus>,
}

#[derive(Serialize)]
struct CheckStatus {
    ok: bool,
    error: Option<String>,
}
