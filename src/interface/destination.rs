use crate::model::backup_entry::{BackupEntry, BackupTimestamp, LogicalKey};
use crate::model::backup_report::StoreOutcome;
use crate::model::backup_target::DestinationKind;
use crate::model::error::Error;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait DestinationDriver: Send + Sync {
    fn kind(&self) -> DestinationKind;

    /// Copies every file under `source` as an entry tagged with `timestamp`.
    /// Per-file failures are collected in the outcome, never returned early.
    async fn store(&self, source: &Path, timestamp: BackupTimestamp) -> StoreOutcome;

    async fn list_existing(&self, key: &LogicalKey) -> Result<Vec<BackupEntry>, Error>;

    /// Deletes at most one entry of `key` when more than `keep` exist.
    async fn evict_oldest(&self, key: &LogicalKey, keep: usize) -> Result<Option<BackupEntry>, Error>;
}
