use crate::model::error::remote::RemoteStoreError;
use async_trait::async_trait;

/// The remote collaborator: an append-only keyed blob store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), RemoteStoreError>;
}
