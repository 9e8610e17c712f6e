use crate::core::backup::retention::{RetentionPolicy, prune_empty_directories};
use crate::core::backup::source_walker::{SourceFile, SourceWalker};
use crate::core::io_manager::IOManager;
use crate::interface::destination::DestinationDriver;
use crate::interface::file_system::FileSystemTrait;
use crate::model::backup_entry::{BackupEntry, BackupTimestamp, LogicalKey};
use crate::model::backup_report::StoreOutcome;
use crate::model::backup_target::DestinationKind;
use crate::model::error::Error;
use crate::model::error::copy::CopyError;
use crate::model::error::eviction::EvictionError;
use crate::model::log::backup::BackupLog;
use crate::platform::constants::PARTIAL_SUFFIX;
use async_trait::async_trait;
use macros::log;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Keeps timestamped copies under a directory on a locally mounted filesystem.
pub struct LocalDriver {
    io_manager: Arc<IOManager>,
    root: PathBuf,
    retention_limit: usize,
    policy: RetentionPolicy,
}

impl LocalDriver {
    pub fn new(io_manager: Arc<IOManager>, root: PathBuf, retention_limit: usize, policy: RetentionPolicy) -> Self {
        Self {
            io_manager,
            root,
            retention_limit,
            policy,
        }
    }

    async fn copy_entry(&self, file: &SourceFile, timestamp: BackupTimestamp) -> Result<PathBuf, Error> {
        let io_manager = &self.io_manager;

        let directory = self.root.join(file.key.directory());
        io_manager
            .create_directory(&directory)
            .await
            .map_err(|err| CopyError::create_directory_failed(&directory, err))?;

        let entry_name = file.key.entry_name(&timestamp);
        let location = directory.join(&entry_name);
        let exists = io_manager
            .exists(&location)
            .await
            .map_err(|err| CopyError::get_metadata_failed(&location, err))?;
        if exists {
            return Err(CopyError::entry_already_exists(&location).into());
        }

        let partial = directory.join(format!("{entry_name}.{PARTIAL_SUFFIX}"));
        if let Err(err) = io_manager.copy_file(&file.path, &partial).await {
            self.discard_partial(&partial).await;
            return Err(CopyError::copy_file_failed(&file.path, &location, err).into());
        }
        if let Err(err) = io_manager.rename(&partial, &location).await {
            self.discard_partial(&partial).await;
            return Err(CopyError::finalize_entry_failed(&partial, &location, err).into());
        }

        log!(BackupLog::EntryStored {
            location: location.display().to_string(),
        });
        Ok(location)
    }

    // A leftover partial is never listed as an entry but keeps its directory
    // from being pruned.
    async fn discard_partial(&self, partial: &Path) {
        match self.io_manager.delete_file(partial).await {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => log!(BackupLog::PartialCleanupFailed {
                path: partial.to_path_buf(),
                reason: err.to_string(),
            }),
        }
    }

    fn subtree_root(&self, source: &Path) -> Option<PathBuf> {
        source.file_name().map(|name| self.root.join(name))
    }
}

#[async_trait]
impl DestinationDriver for LocalDriver {
    fn kind(&self) -> DestinationKind {
        DestinationKind::Local
    }

    async fn store(&self, source: &Path, timestamp: BackupTimestamp) -> StoreOutcome {
        let mut outcome = StoreOutcome::default();

        let (files, walk_errors) = SourceWalker::new(&self.io_manager).walk(source).await;
        for err in walk_errors {
            outcome.record::<()>(Err(err));
        }

        for file in &files {
            if outcome.record(self.copy_entry(file, timestamp).await).is_none() {
                continue;
            }
            outcome.stored += 1;

            let evicted = self.evict_oldest(&file.key, self.retention_limit).await;
            if let Some(Some(_)) = outcome.record(evicted) {
                outcome.evicted += 1;
            }
        }

        if outcome.evicted > 0 {
            if let Some(subtree) = self.subtree_root(source) {
                let (_, cleanup_errors) = prune_empty_directories(&self.io_manager, &subtree).await;
                outcome.errors.extend(cleanup_errors);
            }
        }

        outcome
    }

    async fn list_existing(&self, key: &LogicalKey) -> Result<Vec<BackupEntry>, Error> {
        let io_manager = &self.io_manager;
        let directory = self.root.join(key.directory());

        let paths = match io_manager.list_directory(&directory).await {
            Ok(paths) => paths,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(EvictionError::list_entries_failed(&directory, err).into()),
        };

        let mut entries = Vec::new();
        for path in paths {
            let Some(timestamp) = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| key.parse_entry_name(name))
            else {
                continue;
            };
            let metadata = io_manager
                .symlink_metadata(&path)
                .await
                .map_err(|err| EvictionError::read_recency_failed(&path, err))?;
            if !metadata.is_file() {
                continue;
            }
            let recency = self.policy.recency_of(&path, &metadata)?;
            entries.push(BackupEntry {
                logical_key: key.clone(),
                timestamp,
                location: path,
                recency,
            });
        }
        Ok(entries)
    }

    async fn evict_oldest(&self, key: &LogicalKey, keep: usize) -> Result<Option<BackupEntry>, Error> {
        let entries = self.list_existing(key).await?;
        let Some(oldest) = self.policy.apply(&entries, keep) else {
            return Ok(None);
        };

        self.io_manager
            .delete_file(&oldest.location)
            .await
            .map_err(|err| EvictionError::delete_entry_failed(&oldest.location, err))?;

        log!(BackupLog::EntryEvicted {
            location: oldest.location.display().to_string(),
        });
        Ok(Some(oldest.clone()))
    }
}
