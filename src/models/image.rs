//! Represents objects and image records surfaced from the gallery buckets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata snapshot of a single object, as returned by the store listing.
///
/// Produced fresh on every listing call; nothing is cached between requests.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StoredObject {
    /// Full path-like object name within its bucket (e.g. `images/jets/f16.png`).
    pub name: String,

    /// Size in bytes.
    pub size: u64,

    /// When the object was last modified, if the store reports it.
    pub last_modified: Option<DateTime<Utc>>,

    /// Store-assigned content hash, without surrounding quotes.
    pub etag: String,

    /// MIME type, when known. Listing calls generally do not report it.
    pub content_type: Option<String>,
}

/// An image record as exposed over the API: object metadata plus the derived
/// public URL.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ImageRecord {
    pub object_name: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub etag: String,
    pub content_type: Option<String>,

    /// Anonymous-read URL derived from the store endpoint. Never stored.
    pub public_url: String,

    /// Reserved for image introspection; currently always `null` since no
    /// content decoding is performed.
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageRecord {
    /// Assemble a record from a listed object and its derived public URL.
    pub fn from_object(object: StoredObject, public_url: String) -> Self {
        Self {
            object_name: object.name,
            size: object.size,
            last_modified: object.last_modified,
            etag: object.etag,
            content_type: object.content_type,
            public_url,
            width: None,
            height: None,
        }
    }
}

/// Response body for the `listImages` endpoints.
#[derive(Serialize, Deserialize, Debug)]
pub struct ListImagesResponse {
    /// Always equals `images.len()`.
    pub count: usize,
    pub images: Vec<ImageRecord>,
}
