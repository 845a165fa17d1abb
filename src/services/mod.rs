//! Core services: object-store access and the image catalog built on it.

pub mod image_catalog;
pub mod object_store;
