//! Axum handlers for the HTTP surface.

pub mod health_handlers;
pub mod image_handlers;
