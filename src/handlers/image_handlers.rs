//! HTTP handlers for the gallery endpoints.
//!
//! Each gallery domain gets the same pair of read operations against its own
//! catalog. All storage concerns live in `ImageCatalog`; handlers only
//! translate between HTTP and the service.

use crate::{
    errors::AppError,
    models::image::{ImageRecord, ListImagesResponse},
    services::image_catalog::ImageCatalog,
};
use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

/// Shared router state: one catalog per gallery domain, constructed at
/// startup and handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub jets: ImageCatalog,
    pub sportscars: ImageCatalog,
}

/// Query params for the `getImage` endpoints. `name` is required.
#[derive(Debug, Deserialize)]
pub struct GetImageQuery {
    pub name: String,
}

/// GET `/api/v1/aircraft/listImages`
pub async fn list_aircraft_images(
    State(state): State<AppState>,
) -> Result<Json<ListImagesResponse>, AppError> {
    list_from(&state.jets).await
}

/// GET `/api/v1/aircraft/getImage?name=...`
pub async fn get_aircraft_image(
    State(state): State<AppState>,
    Query(query): Query<GetImageQuery>,
) -> Result<Json<ImageRecord>, AppError> {
    get_from(&state.jets, &query.name).await
}

/// GET `/api/v1/sportscars/listImages`
pub async fn list_sportscars_images(
    State(state): State<AppState>,
) -> Result<Json<ListImagesResponse>, AppError> {
    list_from(&state.sportscars).await
}

/// GET `/api/v1/sportscars/getImage?name=...`
pub async fn get_sportscars_image(
    State(state): State<AppState>,
    Query(query): Query<GetImageQuery>,
) -> Result<Json<ImageRecord>, AppError> {
    get_from(&state.sportscars, &query.name).await
}

async fn list_from(catalog: &ImageCatalog) -> Result<Json<ListImagesResponse>, AppError> {
    let images = catalog.list_images().await?;
    Ok(Json(ListImagesResponse {
        count: images.len(),
        images,
    }))
}

async fn get_from(catalog: &ImageCatalog, name: &str) -> Result<Json<ImageRecord>, AppError> {
    let image = catalog.get_image(name).await?;
    tracing::info!(
        "retrieved image details for `{name}` from bucket `{}`",
        catalog.bucket()
    );
    Ok(Json(image))
}
