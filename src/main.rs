use anyhow::Result;
use axum::Router;
use std::{io::ErrorKind, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;

use handlers::image_handlers::AppState;
use services::{image_catalog::ImageCatalog, object_store::S3ObjectStore};

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config ---
    let cfg = config::AppConfig::from_env_and_args()?;

    tracing::info!(
        "Starting gallery-api on {} (store endpoint {}, environment {})",
        cfg.addr(),
        cfg.store_endpoint,
        cfg.environment
    );

    // --- Initialize store client and per-bucket catalogs ---
    // Everything is constructed up front and handed to the handlers through
    // router state; no lazy globals.
    let store: Arc<S3ObjectStore> = Arc::new(S3ObjectStore::connect(&cfg).await);

    let jets = ImageCatalog::new(store.clone(), cfg.jets_bucket.clone()).await?;
    let sportscars = ImageCatalog::new(store, cfg.sportscars_bucket.clone()).await?;

    let state = AppState { jets, sportscars };

    // --- Build router ---
    let app: Router = routes::routes::routes()
        .with_state(state)
        .layer(routes::routes::cors_layer(&cfg.allowed_origins));

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
