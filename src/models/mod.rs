//! Core data models for the gallery API.
//!
//! These entities describe objects as the store reports them and the image
//! records the HTTP surface exposes. They serialize naturally as JSON via
//! `serde`.

pub mod image;
