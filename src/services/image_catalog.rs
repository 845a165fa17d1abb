//! ImageCatalog — the listing-and-filtering service behind the gallery
//! endpoints.
//!
//! A catalog is bound to one bucket and built once at startup; constructing
//! it bootstraps the bucket (existence plus public-read policy). Every call
//! takes a fresh listing from the store, so results are always a live
//! snapshot with no caching or diffing in between.

use crate::models::image::{ImageRecord, StoredObject};
use crate::services::object_store::{ObjectStore, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// File suffixes recognized as images. Matching is case-insensitive and a
/// pure suffix test; object content is never inspected.
pub const IMAGE_EXTENSIONS: [&str; 8] = [
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp", ".svg", ".avif",
];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("image `{0}` not found")]
    NotFound(String),
    #[error(transparent)]
    Upstream(#[from] StoreError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Read-only image catalog over one bucket of an S3-compatible store.
#[derive(Clone)]
pub struct ImageCatalog {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl ImageCatalog {
    /// Build a catalog for `bucket`, ensuring the bucket exists and carries a
    /// public-read policy. A bootstrap failure makes the catalog unusable and
    /// propagates.
    pub async fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> CatalogResult<Self> {
        let bucket = bucket.into();
        store.ensure_public_bucket(&bucket).await?;
        info!("image catalog ready for bucket `{bucket}`");
        Ok(Self { store, bucket })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Store connectivity probe for readiness checks.
    pub async fn ping(&self) -> CatalogResult<bool> {
        Ok(self.store.bucket_exists(&self.bucket).await?)
    }

    /// List every image object in the bucket, in the order the store returns
    /// them, with derived public URLs.
    pub async fn list_images(&self) -> CatalogResult<Vec<ImageRecord>> {
        let objects = self.store.list_objects(&self.bucket, "", true).await?;
        debug!("found {} objects in bucket `{}`", objects.len(), self.bucket);

        let images: Vec<ImageRecord> = objects
            .into_iter()
            .filter(|obj| has_image_extension(&obj.name))
            .map(|obj| self.to_record(obj))
            .collect();

        info!("returning {} images from bucket `{}`", images.len(), self.bucket);
        Ok(images)
    }

    /// Exact-name lookup over the full listing.
    ///
    /// Intentionally skips the extension filter: any object is addressable by
    /// its exact name even if `list_images` would never show it. This matches
    /// the long-standing behavior the frontend relies on.
    pub async fn get_image(&self, name: &str) -> CatalogResult<ImageRecord> {
        let objects = self.store.list_objects(&self.bucket, "", true).await?;

        let found = objects
            .into_iter()
            .find(|obj| obj.name == name)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))?;

        debug!("retrieved details for `{name}` from bucket `{}`", self.bucket);
        Ok(self.to_record(found))
    }

    fn to_record(&self, object: StoredObject) -> ImageRecord {
        let public_url = self.store.public_object_url(&self.bucket, &object.name);
        ImageRecord::from_object(object, public_url)
    }
}

/// Case-insensitive suffix test against [`IMAGE_EXTENSIONS`].
pub fn has_image_extension(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::object_store::memory::MemoryStore;

    async fn catalog_with(objects: Vec<StoredObject>) -> ImageCatalog {
        let store = Arc::new(MemoryStore::with_objects(objects));
        ImageCatalog::new(store, "jets").await.unwrap()
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert!(has_image_extension("a.png"));
        assert!(has_image_extension("B.JPG"));
        assert!(has_image_extension("deep/path/photo.JPeG"));
        assert!(has_image_extension("vector.svg"));
        assert!(has_image_extension("new.AVIF"));
        assert!(!has_image_extension("readme.txt"));
        assert!(!has_image_extension("archive.png.zip"));
        assert!(!has_image_extension("png"));
    }

    #[tokio::test]
    async fn list_keeps_only_images_and_preserves_order() {
        let catalog = catalog_with(vec![
            MemoryStore::object("images/jets/f16.png", 500),
            MemoryStore::object("images/jets/readme.txt", 10),
            MemoryStore::object("images/jets/SR71.JPG", 900),
            MemoryStore::object("notes/manifest.json", 42),
            MemoryStore::object("images/jets/hornet.webp", 300),
        ])
        .await;

        let images = catalog.list_images().await.unwrap();
        let names: Vec<&str> = images.iter().map(|img| img.object_name.as_str()).collect();
        assert_eq!(
            names,
            ["images/jets/f16.png", "images/jets/SR71.JPG", "images/jets/hornet.webp"]
        );
    }

    #[tokio::test]
    async fn list_derives_public_urls() {
        let catalog = catalog_with(vec![MemoryStore::object("images/jets/f16.png", 500)]).await;

        let images = catalog.list_images().await.unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(
            images[0].public_url,
            "http://storage:9000/jets/images/jets/f16.png"
        );
        assert_eq!(images[0].size, 500);
        assert_eq!(images[0].width, None);
        assert_eq!(images[0].height, None);
    }

    #[tokio::test]
    async fn list_of_empty_bucket_is_empty() {
        let catalog = catalog_with(Vec::new()).await;
        assert!(catalog.list_images().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_bypasses_the_extension_filter() {
        let catalog = catalog_with(vec![
            MemoryStore::object("images/jets/f16.png", 500),
            MemoryStore::object("images/jets/readme.txt", 10),
        ])
        .await;

        // Not an image, never listed, but still retrievable by exact name.
        let record = catalog.get_image("images/jets/readme.txt").await.unwrap();
        assert_eq!(record.object_name, "images/jets/readme.txt");
        assert_eq!(record.size, 10);
        assert_eq!(
            record.public_url,
            "http://storage:9000/jets/images/jets/readme.txt"
        );
    }

    #[tokio::test]
    async fn get_requires_exact_case_sensitive_name() {
        let catalog = catalog_with(vec![MemoryStore::object("images/jets/f16.png", 500)]).await;

        assert!(matches!(
            catalog.get_image("images/jets/F16.PNG").await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            catalog.get_image("f16.png").await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(catalog.get_image("images/jets/f16.png").await.is_ok());
    }

    #[tokio::test]
    async fn get_missing_object_is_not_found() {
        let catalog = catalog_with(Vec::new()).await;
        let err = catalog.get_image("missing.png").await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(name) if name == "missing.png"));
    }

    #[tokio::test]
    async fn construction_bootstraps_a_missing_bucket() {
        let store = Arc::new(MemoryStore::without_bucket());
        let catalog = ImageCatalog::new(store.clone(), "jets").await.unwrap();

        use std::sync::atomic::Ordering;
        assert_eq!(store.creates.load(Ordering::SeqCst), 1);
        assert_eq!(store.policy_sets.load(Ordering::SeqCst), 1);
        assert!(catalog.ping().await.unwrap());
    }
}
