//! Object-store access layer.
//!
//! `ObjectStore` is the seam the image catalog consumes: bucket lifecycle,
//! full object listing, and deterministic public-URL construction. The
//! production implementation (`S3ObjectStore`) talks to any S3-compatible
//! store (MinIO in practice) through the AWS SDK with path-style addressing
//! and a custom endpoint.

use crate::config::AppConfig;
use crate::models::image::StoredObject;
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_credential_types::Credentials;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Region, SharedCredentialsProvider};
use chrono::DateTime;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("checking bucket `{bucket}`: {message}")]
    BucketCheck { bucket: String, message: String },
    #[error("creating bucket `{bucket}`: {message}")]
    BucketCreate { bucket: String, message: String },
    #[error("setting public-read policy on bucket `{bucket}`: {message}")]
    PolicySet { bucket: String, message: String },
    #[error("listing objects in bucket `{bucket}`: {message}")]
    List { bucket: String, message: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Primitives the catalog requires from an S3-compatible store.
///
/// Kept deliberately narrow (read path plus bucket bootstrap) so the catalog
/// can be exercised against an in-memory implementation in tests.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn bucket_exists(&self, bucket: &str) -> StoreResult<bool>;

    async fn create_bucket(&self, bucket: &str) -> StoreResult<()>;

    /// Grant anonymous read access to every object under the bucket.
    async fn set_public_read_policy(&self, bucket: &str) -> StoreResult<()>;

    /// Enumerate all objects under `prefix`, in store-defined order.
    ///
    /// With `recursive` set, nested objects come back flattened; otherwise
    /// only immediate children of the prefix are listed.
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        recursive: bool,
    ) -> StoreResult<Vec<StoredObject>>;

    /// Deterministic `scheme://endpoint/bucket/object_name` construction.
    /// Pure string assembly, no network call.
    fn public_object_url(&self, bucket: &str, object_name: &str) -> String;

    /// Ensure `bucket` exists and carries a public-read policy.
    ///
    /// Idempotent: creation is skipped when the bucket exists, and the policy
    /// set overwrites an identical document. Failures propagate since the
    /// bucket is unusable without them.
    async fn ensure_public_bucket(&self, bucket: &str) -> StoreResult<()> {
        if self.bucket_exists(bucket).await? {
            debug!("bucket `{bucket}` already exists");
        } else {
            self.create_bucket(bucket).await?;
            info!("created bucket `{bucket}`");
        }
        self.set_public_read_policy(bucket).await?;
        info!("public-read policy applied to bucket `{bucket}`");
        Ok(())
    }
}

/// Build the anonymous-read URL for an object.
///
/// `endpoint` is `host:port` without a scheme; `use_tls` picks the scheme.
pub fn build_public_url(endpoint: &str, use_tls: bool, bucket: &str, object_name: &str) -> String {
    let scheme = if use_tls { "https" } else { "http" };
    format!("{scheme}://{endpoint}/{bucket}/{object_name}")
}

/// AWS-SDK-backed store client. Created once at startup; the inner `Client`
/// is cheaply cloneable and safe to share across requests.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    endpoint: String,
    use_tls: bool,
}

impl S3ObjectStore {
    /// Build a client against the configured endpoint with static credentials.
    ///
    /// Path-style addressing is forced for MinIO compatibility.
    pub async fn connect(cfg: &AppConfig) -> Self {
        let credentials = Credentials::new(
            &cfg.store_access_key,
            &cfg.store_secret_key,
            None,
            None,
            "gallery-api",
        );
        let region_provider =
            RegionProviderChain::first_try(Region::new(cfg.store_region.clone()));

        let shared_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(region_provider)
            .credentials_provider(SharedCredentialsProvider::new(credentials))
            .endpoint_url(cfg.store_base_url())
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
            .force_path_style(true)
            .build();

        debug!("S3 client created for endpoint {}", cfg.store_endpoint);

        Self {
            client: Client::from_conf(s3_config),
            endpoint: cfg.store_endpoint.clone(),
            use_tls: cfg.store_use_tls,
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn bucket_exists(&self, bucket: &str) -> StoreResult<bool> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(StoreError::BucketCheck {
                        bucket: bucket.to_string(),
                        message: service_err.to_string(),
                    })
                }
            }
        }
    }

    async fn create_bucket(&self, bucket: &str) -> StoreResult<()> {
        self.client
            .create_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|err| StoreError::BucketCreate {
                bucket: bucket.to_string(),
                message: err.to_string(),
            })?;
        Ok(())
    }

    async fn set_public_read_policy(&self, bucket: &str) -> StoreResult<()> {
        let policy = serde_json::json!({
            "Version": "2012-10-17",
            "Statement": [{
                "Effect": "Allow",
                "Principal": { "AWS": "*" },
                "Action": ["s3:GetObject"],
                "Resource": [format!("arn:aws:s3:::{bucket}/*")],
            }],
        });

        self.client
            .put_bucket_policy()
            .bucket(bucket)
            .policy(policy.to_string())
            .send()
            .await
            .map_err(|err| StoreError::PolicySet {
                bucket: bucket.to_string(),
                message: err.to_string(),
            })?;
        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        recursive: bool,
    ) -> StoreResult<Vec<StoredObject>> {
        let mut records = Vec::new();
        let mut continuation: Option<String> = None;

        // Follow continuation tokens so callers always see the full listing.
        loop {
            let mut request = self.client.list_objects_v2().bucket(bucket);
            if !prefix.is_empty() {
                request = request.prefix(prefix);
            }
            if !recursive {
                request = request.delimiter("/");
            }
            if let Some(token) = continuation.take() {
                request = request.continuation_token(token);
            }

            let response = request.send().await.map_err(|err| StoreError::List {
                bucket: bucket.to_string(),
                message: err.to_string(),
            })?;

            records.extend(response.contents().iter().filter_map(from_sdk_object));

            match response.next_continuation_token() {
                Some(token) if response.is_truncated() == Some(true) => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        debug!("listed {} objects from bucket `{bucket}`", records.len());
        Ok(records)
    }

    fn public_object_url(&self, bucket: &str, object_name: &str) -> String {
        build_public_url(&self.endpoint, self.use_tls, bucket, object_name)
    }
}

/// Convert an SDK listing entry into our snapshot record.
///
/// Entries without a key are skipped; ETags come back quoted from the SDK and
/// are stored bare.
fn from_sdk_object(object: &aws_sdk_s3::types::Object) -> Option<StoredObject> {
    let name = object.key()?.to_string();
    Some(StoredObject {
        name,
        size: object.size().unwrap_or(0).max(0) as u64,
        last_modified: object
            .last_modified()
            .and_then(|ts| DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())),
        etag: object
            .e_tag()
            .map(|tag| tag.trim_matches('"').to_string())
            .unwrap_or_default(),
        content_type: None,
    })
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory `ObjectStore` used by unit tests.

    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    pub(crate) struct MemoryStore {
        pub(crate) objects: Vec<StoredObject>,
        pub(crate) exists: AtomicBool,
        pub(crate) creates: AtomicUsize,
        pub(crate) policy_sets: AtomicUsize,
    }

    impl MemoryStore {
        pub(crate) fn with_objects(objects: Vec<StoredObject>) -> Self {
            Self {
                objects,
                exists: AtomicBool::new(true),
                creates: AtomicUsize::new(0),
                policy_sets: AtomicUsize::new(0),
            }
        }

        pub(crate) fn without_bucket() -> Self {
            let store = Self::with_objects(Vec::new());
            store.exists.store(false, Ordering::SeqCst);
            store
        }

        pub(crate) fn object(name: &str, size: u64) -> StoredObject {
            StoredObject {
                name: name.to_string(),
                size,
                last_modified: None,
                etag: format!("etag-{size}"),
                content_type: None,
            }
        }
    }

    #[async_trait]
    impl ObjectStore for MemoryStore {
        async fn bucket_exists(&self, _bucket: &str) -> StoreResult<bool> {
            Ok(self.exists.load(Ordering::SeqCst))
        }

        async fn create_bucket(&self, _bucket: &str) -> StoreResult<()> {
            self.exists.store(true, Ordering::SeqCst);
            self.creates.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn set_public_read_policy(&self, _bucket: &str) -> StoreResult<()> {
            self.policy_sets.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn list_objects(
            &self,
            _bucket: &str,
            prefix: &str,
            _recursive: bool,
        ) -> StoreResult<Vec<StoredObject>> {
            Ok(self
                .objects
                .iter()
                .filter(|obj| obj.name.starts_with(prefix))
                .cloned()
                .collect())
        }

        fn public_object_url(&self, bucket: &str, object_name: &str) -> String {
            build_public_url("storage:9000", false, bucket, object_name)
        }
    }
}
