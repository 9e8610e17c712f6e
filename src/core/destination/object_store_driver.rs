use crate::core::backup::source_walker::{SourceFile, SourceWalker};
use crate::core::io_manager::IOManager;
use crate::interface::destination::DestinationDriver;
use crate::interface::file_system::FileSystemTrait;
use crate::interface::object_store::ObjectStore;
use crate::model::backup_entry::{BackupEntry, BackupTimestamp, LogicalKey};
use crate::model::backup_report::StoreOutcome;
use crate::model::backup_target::DestinationKind;
use crate::model::error::Error;
use crate::model::error::copy::CopyError;
use crate::model::log::backup::BackupLog;
use async_trait::async_trait;
use macros::log;
use std::path::Path;
use std::sync::Arc;

/// Uploads timestamped copies into a bucket. The bucket is append-only from
/// here: nothing is listed and nothing is evicted.
pub struct ObjectStoreDriver {
    io_manager: Arc<IOManager>,
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl ObjectStoreDriver {
    pub fn new(io_manager: Arc<IOManager>, store: Arc<dyn ObjectStore>, prefix: String) -> Self {
        Self {
            io_manager,
            store,
            prefix,
        }
    }

    pub fn object_key(&self, key: &LogicalKey, timestamp: &BackupTimestamp) -> String {
        let mut segments = vec![self.prefix.clone()];
        segments.extend(key.directory_segments());
        segments.push(key.entry_name(timestamp));
        join_key(&segments)
    }

    async fn upload(&self, file: &SourceFile, timestamp: BackupTimestamp) -> Result<String, Error> {
        let bytes = self
            .io_manager
            .read_file(&file.path)
            .await
            .map_err(|err| CopyError::read_file_failed(&file.path, err))?;

        let object_key = self.object_key(&file.key, &timestamp);
        self.store
            .put(&object_key, bytes)
            .await
            .map_err(|err| CopyError::put_object_failed(&file.path, object_key.clone(), err))?;

        log!(BackupLog::EntryStored {
            location: object_key.clone(),
        });
        Ok(object_key)
    }
}

/// Joins key segments with `/`, collapsing repeated and surrounding
/// separators so that the result never has an empty segment.
pub fn join_key<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .flat_map(|segment| segment.as_ref().split(['/', '\\']))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl DestinationDriver for ObjectStoreDriver {
    fn kind(&self) -> DestinationKind {
        DestinationKind::ObjectStore
    }

    async fn store(&self, source: &Path, timestamp: BackupTimestamp) -> StoreOutcome {
        let mut outcome = StoreOutcome::default();

        let (files, walk_errors) = SourceWalker::new(&self.io_manager).walk(source).await;
        for err in walk_errors {
            outcome.record::<()>(Err(err));
        }

        for file in &files {
            if outcome.record(self.upload(file, timestamp).await).is_some() {
                outcome.stored += 1;
            }
        }

        outcome
    }

    async fn list_existing(&self, _key: &LogicalKey) -> Result<Vec<BackupEntry>, Error> {
        Ok(Vec::new())
    }

    async fn evict_oldest(&self, _key: &LogicalKey, _keep: usize) -> Result<Option<BackupEntry>, Error> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::error::remote::RemoteStoreError;
    use chrono::NaiveDate;
    use std::fs;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeStore {
        objects: Mutex<Vec<(String, Vec<u8>)>>,
        reject: Option<String>,
    }

    #[async_trait]
    impl ObjectStore for FakeStore {
        async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), RemoteStoreError> {
            if self.reject.as_deref().is_some_and(|reject| key.contains(reject)) {
                return Err(RemoteStoreError::put_rejected(key, "access denied"));
            }
            self.objects.lock().unwrap().push((key.to_string(), bytes));
            Ok(())
        }
    }

    fn timestamp() -> BackupTimestamp {
        BackupTimestamp::new(
            NaiveDate::from_ymd_opt(2024, 7, 4)
                .and_then(|date| date.and_hms_opt(3, 2, 1))
                .unwrap(),
        )
    }

    fn keys(store: &FakeStore) -> Vec<String> {
        let mut keys: Vec<String> = store
            .objects
            .lock()
            .unwrap()
            .iter()
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    #[test]
    fn keys_have_no_empty_segments() {
        assert_eq!(join_key(&["/backups/", "/docs//a", "b/"]), "backups/docs/a/b");
        assert_eq!(join_key(&["", "notes.txt"]), "notes.txt");
        assert_eq!(join_key::<&str>(&[]), "");
    }

    #[tokio::test]
    async fn uploads_every_file_under_the_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("site");
        fs::create_dir_all(source.join("css")).unwrap();
        fs::write(source.join("index.html"), "<html>").unwrap();
        fs::write(source.join("css/main.css"), "body {}").unwrap();

        let store = Arc::new(FakeStore::default());
        let driver = ObjectStoreDriver::new(Arc::new(IOManager::new(4)), store.clone(), "/nightly/".to_string());
        let outcome = driver.store(&source, timestamp()).await;

        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.stored, 2);
        assert_eq!(outcome.evicted, 0);
        assert_eq!(
            keys(&store),
            vec![
                "nightly/site/css/main.css.2024_07_04_03:02:01",
                "nightly/site/index.html.2024_07_04_03:02:01",
            ]
        );
        assert!(keys(&store).iter().all(|key| !key.contains("//") && !key.starts_with('/')));
    }

    #[tokio::test]
    async fn a_rejected_upload_is_counted_and_the_rest_continue() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("batch");
        fs::create_dir_all(&source).unwrap();
        for index in 0..10 {
            fs::write(source.join(format!("file-{index}")), index.to_string()).unwrap();
        }

        let store = Arc::new(FakeStore {
            reject: Some("file-7".to_string()),
            ..FakeStore::default()
        });
        let driver = ObjectStoreDriver::new(Arc::new(IOManager::new(4)), store.clone(), String::new());
        let outcome = driver.store(&source, timestamp()).await;

        assert_eq!(outcome.stored, 9);
        assert_eq!(outcome.failed(), 1);
        assert!(matches!(
            &outcome.errors[0],
            Error::Copy(CopyError::PutObjectFailed { key, .. }) if key.starts_with("batch/file-7.")
        ));
        assert_eq!(keys(&store).len(), 9);
    }

    #[tokio::test]
    async fn never_lists_or_evicts() {
        let driver = ObjectStoreDriver::new(
            Arc::new(IOManager::new(1)),
            Arc::new(FakeStore::default()),
            "p".to_string(),
        );
        let key = LogicalKey::single("notes.txt");
        assert!(driver.list_existing(&key).await.unwrap().is_empty());
        assert!(driver.evict_oldest(&key, 0).await.unwrap().is_none());
    }
}
