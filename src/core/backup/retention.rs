use crate::core::io_manager::IOManager;
use crate::interface::file_system::FileSystemTrait;
use crate::model::backup_entry::BackupEntry;
use crate::model::backup_target::RecencyMetric;
use crate::model::error::Error;
use crate::model::error::cleanup::DirectoryCleanupError;
use crate::model::error::eviction::EvictionError;
use crate::model::log::backup::BackupLog;
use macros::log;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Clone, Copy)]
pub struct RetentionPolicy {
    metric: RecencyMetric,
}

impl RetentionPolicy {
    pub fn new(metric: RecencyMetric) -> Self {
        Self { metric }
    }

    pub fn recency_of(&self, path: &Path, metadata: &Metadata) -> Result<SystemTime, EvictionError> {
        let recency = match self.metric {
            RecencyMetric::Modified => metadata.modified(),
            RecencyMetric::Created => metadata.created(),
        };
        recency.map_err(|err| EvictionError::read_recency_failed(path, err))
    }

    /// Picks the single entry to delete, if `entries` holds more than `limit`.
    ///
    /// Only one entry is chosen per call: the least recent, ties broken by the
    /// timestamp in its name.
    pub fn apply<'a>(&self, entries: &'a [BackupEntry], limit: usize) -> Option<&'a BackupEntry> {
        if entries.len() <= limit {
            return None;
        }
        entries
            .iter()
            .min_by_key(|entry| (entry.recency, entry.timestamp))
    }
}

/// Removes every empty directory below `root`, deepest first, so that a
/// directory emptied by its children's removal goes as well. `root` itself
/// is kept.
pub async fn prune_empty_directories(io_manager: &IOManager, root: &Path) -> (usize, Vec<Error>) {
    let mut errors: Vec<Error> = Vec::new();

    match io_manager.exists(root).await {
        Ok(true) => {}
        Ok(false) => return (0, errors),
        Err(err) => {
            let err: Error = DirectoryCleanupError::scan_directory_failed(root, err).into();
            log!(err);
            errors.push(err);
            return (0, errors);
        }
    }

    let mut directories: Vec<PathBuf> = Vec::new();
    let mut current_level = vec![root.to_path_buf()];
    while !current_level.is_empty() {
        let mut next_level = Vec::new();
        for directory in current_level {
            let entries = match io_manager.list_directory(&directory).await {
                Ok(entries) => entries,
                Err(err) => {
                    errors.push(DirectoryCleanupError::scan_directory_failed(&directory, err).into());
                    continue;
                }
            };
            for entry in entries {
                match io_manager.symlink_metadata(&entry).await {
                    Ok(metadata) if metadata.is_dir() => next_level.push(entry),
                    Ok(_) => {}
                    Err(err) => {
                        errors.push(DirectoryCleanupError::scan_directory_failed(&entry, err).into())
                    }
                }
            }
        }
        directories.extend(next_level.iter().cloned());
        current_level = next_level;
    }

    let mut removed = 0;
    for directory in directories.iter().rev() {
        let is_empty = match io_manager.list_directory(directory).await {
            Ok(entries) => entries.is_empty(),
            Err(err) => {
                errors.push(DirectoryCleanupError::scan_directory_failed(directory, err).into());
                continue;
            }
        };
        if !is_empty {
            continue;
        }
        match io_manager.delete_empty_directory(directory).await {
            Ok(()) => {
                removed += 1;
                log!(BackupLog::DirectoryRemoved {
                    path: directory.clone(),
                });
            }
            Err(err) => {
                errors.push(DirectoryCleanupError::remove_directory_failed(directory, err).into())
            }
        }
    }

    for err in &errors {
        log!(err);
    }
    (removed, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::backup_entry::{BackupTimestamp, LogicalKey};
    use chrono::NaiveDate;
    use std::fs;
    use std::time::Duration;

    fn entry(minute: u32, recency_secs: u64) -> BackupEntry {
        let timestamp = BackupTimestamp::new(
            NaiveDate::from_ymd_opt(2024, 2, 2)
                .and_then(|date| date.and_hms_opt(8, minute, 0))
                .unwrap(),
        );
        let key = LogicalKey::single("notes.txt");
        BackupEntry {
            location: PathBuf::from(key.entry_name(&timestamp)),
            logical_key: key,
            timestamp,
            recency: SystemTime::UNIX_EPOCH + Duration::from_secs(recency_secs),
        }
    }

    #[test]
    fn keeps_everything_within_the_limit() {
        let policy = RetentionPolicy::new(RecencyMetric::Modified);
        let entries = vec![entry(1, 10), entry(2, 20)];
        assert!(policy.apply(&entries, 2).is_none());
        assert!(policy.apply(&entries, 5).is_none());
        assert!(policy.apply(&[], 0).is_none());
    }

    #[test]
    fn selects_the_least_recent_entry() {
        let policy = RetentionPolicy::new(RecencyMetric::Modified);
        let entries = vec![entry(1, 30), entry(2, 10), entry(3, 20)];
        let evicted = policy.apply(&entries, 2).unwrap();
        assert_eq!(evicted, &entries[1]);
    }

    #[test]
    fn removes_only_one_entry_even_when_far_over_the_limit() {
        let policy = RetentionPolicy::new(RecencyMetric::Modified);
        let entries: Vec<_> = (0..6).map(|minute| entry(minute, 100 + u64::from(minute))).collect();
        let evicted = policy.apply(&entries, 1).unwrap();
        assert_eq!(evicted, &entries[0]);
    }

    #[test]
    fn ties_fall_back_to_the_entry_timestamp() {
        let policy = RetentionPolicy::new(RecencyMetric::Modified);
        let entries = vec![entry(5, 10), entry(4, 10), entry(6, 10)];
        let evicted = policy.apply(&entries, 2).unwrap();
        assert_eq!(evicted, &entries[1]);
    }

    #[tokio::test]
    async fn prunes_nested_empty_directories_bottom_up() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("a/b/c")).unwrap();
        fs::create_dir_all(root.path().join("a/keep")).unwrap();
        fs::write(root.path().join("a/keep/file.txt"), "x").unwrap();
        fs::create_dir_all(root.path().join("empty")).unwrap();

        let io_manager = IOManager::new(4);
        let (removed, errors) = prune_empty_directories(&io_manager, root.path()).await;

        assert!(errors.is_empty());
        assert_eq!(removed, 3);
        assert!(!root.path().join("a/b").exists());
        assert!(!root.path().join("empty").exists());
        assert!(root.path().join("a/keep/file.txt").exists());
        assert!(root.path().exists());
    }

    #[tokio::test]
    async fn an_unreadable_root_is_a_cleanup_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, "x").unwrap();

        let io_manager = IOManager::new(4);
        let (removed, errors) = prune_empty_directories(&io_manager, &file).await;

        assert_eq!(removed, 0);
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            Error::Cleanup(DirectoryCleanupError::ScanDirectoryFailed { .. })
        ));
    }

    #[tokio::test]
    async fn a_missing_root_has_nothing_to_prune() {
        let root = tempfile::tempdir().unwrap();
        let io_manager = IOManager::new(4);
        let (removed, errors) = prune_empty_directories(&io_manager, &root.path().join("never-created")).await;

        assert_eq!(removed, 0);
        assert!(errors.is_empty());
    }
}
