//! Defines routes for the gallery API.
//!
//! ## Structure
//! - **Gallery endpoints** (one pair per domain, same contract)
//!   - `GET /api/v1/aircraft/listImages`        — all images in the jets bucket
//!   - `GET /api/v1/aircraft/getImage?name=`    — one object by exact name
//!   - `GET /api/v1/sportscars/listImages`
//!   - `GET /api/v1/sportscars/getImage?name=`
//!
//! - **Service endpoints** (mounted at root)
//!   - `GET /`        — API banner
//!   - `GET /healthz` — liveness
//!   - `GET /readyz`  — readiness (object store probes)

use crate::handlers::{
    health_handlers::{healthz, readyz, root},
    image_handlers::{
        AppState, get_aircraft_image, get_sportscars_image, list_aircraft_images,
        list_sportscars_images,
    },
};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower_http::cors::CorsLayer;

/// Build and return the router for all gallery routes.
///
/// The router carries shared state (`AppState`, one catalog per domain) to
/// all handlers.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/api/v1/aircraft/listImages", get(list_aircraft_images))
        .route("/api/v1/aircraft/getImage", get(get_aircraft_image))
        .route("/api/v1/sportscars/listImages", get(list_sportscars_images))
        .route("/api/v1/sportscars/getImage", get(get_sportscars_image))
}

/// CORS layer allowing the configured frontend origins.
///
/// The API is read-only, so only GET (plus preflight) is allowed. Credentials
/// stay enabled for parity with the frontend client.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
