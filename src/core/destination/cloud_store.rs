use crate::interface::object_store::ObjectStore;
use crate::model::backup_target::{AuthMode, RemoteStoreSpec};
use crate::model::error::remote::RemoteStoreError;
use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore as _;
use object_store::PutPayload;
use std::sync::Arc;

/// Adapts an `object_store` client to the put-only surface the drivers use.
pub struct CloudObjectStore {
    inner: Arc<dyn object_store::ObjectStore>,
}

impl CloudObjectStore {
    pub fn new(inner: Arc<dyn object_store::ObjectStore>) -> Self {
        Self { inner }
    }

    /// Builds an S3 client. Nothing is contacted until the first upload.
    pub fn s3(spec: &RemoteStoreSpec) -> Result<Self, object_store::Error> {
        let mut builder = match &spec.auth {
            AuthMode::Environment => AmazonS3Builder::from_env(),
            AuthMode::Static {
                access_key_id,
                secret_access_key,
                session_token,
            } => {
                let builder = AmazonS3Builder::new()
                    .with_access_key_id(access_key_id)
                    .with_secret_access_key(secret_access_key);
                match session_token {
                    Some(token) => builder.with_token(token),
                    None => builder,
                }
            }
        };

        builder = builder.with_bucket_name(&spec.bucket_name);
        if let Some(region) = &spec.region {
            builder = builder.with_region(region);
        }
        if let Some(endpoint) = &spec.endpoint {
            // Path-style requests for S3-compatible services such as MinIO.
            builder = builder
                .with_endpoint(endpoint)
                .with_virtual_hosted_style_request(false);
        }
        if spec.allow_http {
            builder = builder.with_allow_http(true);
        }

        let store = builder.build()?;
        Ok(Self::new(Arc::new(store)))
    }
}

#[async_trait]
impl ObjectStore for CloudObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), RemoteStoreError> {
        self.inner
            .put(&ObjectPath::from(key), PutPayload::from(bytes))
            .await
            .map(|_| ())
            .map_err(|err| RemoteStoreError::put_rejected(key, err))
    }
}
