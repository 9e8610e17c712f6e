pub mod cloud_store;
pub mod local;
pub mod object_store_driver;

use crate::core::backup::retention::RetentionPolicy;
use crate::core::destination::cloud_store::CloudObjectStore;
use crate::core::destination::local::LocalDriver;
use crate::core::destination::object_store_driver::ObjectStoreDriver;
use crate::core::io_manager::IOManager;
use crate::interface::destination::DestinationDriver;
use crate::interface::object_store::ObjectStore;
use crate::model::backup_target::{BackupTarget, Destination, RemoteStoreSpec};
use crate::model::error::Error;
use crate::model::error::config::ConfigError;
use std::collections::HashMap;
use std::sync::Arc;

/// Picks the driver for each target's destination. Remote clients are built
/// once per distinct connection and shared between targets.
pub struct DriverFactory {
    io_manager: Arc<IOManager>,
    stores: HashMap<RemoteStoreSpec, Arc<dyn ObjectStore>>,
}

impl DriverFactory {
    pub fn new(io_manager: Arc<IOManager>) -> Self {
        Self {
            io_manager,
            stores: HashMap::new(),
        }
    }

    pub fn build(&mut self, target: &BackupTarget) -> Result<Arc<dyn DestinationDriver>, Error> {
        let driver: Arc<dyn DestinationDriver> = match &target.destination {
            Destination::Local { root } => Arc::new(LocalDriver::new(
                self.io_manager.clone(),
                root.clone(),
                target.retention_limit,
                RetentionPolicy::new(target.recency),
            )),
            Destination::ObjectStore { prefix, remote } => {
                let store = self.remote_store(&target.name, remote)?;
                Arc::new(ObjectStoreDriver::new(self.io_manager.clone(), store, prefix.clone()))
            }
        };
        Ok(driver)
    }

    fn remote_store(&mut self, target: &str, spec: &RemoteStoreSpec) -> Result<Arc<dyn ObjectStore>, ConfigError> {
        if let Some(store) = self.stores.get(spec) {
            return Ok(store.clone());
        }
        let store: Arc<dyn ObjectStore> = Arc::new(
            CloudObjectStore::s3(spec).map_err(|err| ConfigError::object_store_setup_failed(target, err))?,
        );
        self.stores.insert(spec.clone(), store.clone());
        Ok(store)
    }

    pub fn remote_clients(&self) -> usize {
        self.stores.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::backup_target::{AuthMode, DestinationKind, RecencyMetric};
    use crate::model::schedule::ScheduleSpec;
    use std::path::PathBuf;

    fn remote(bucket: &str) -> RemoteStoreSpec {
        RemoteStoreSpec {
            bucket_name: bucket.to_string(),
            region: Some("us-east-1".to_string()),
            endpoint: None,
            allow_http: false,
            auth: AuthMode::Static {
                access_key_id: "id".to_string(),
                secret_access_key: "secret".to_string(),
                session_token: Some("token".to_string()),
            },
        }
    }

    fn target(name: &str, destination: Destination) -> BackupTarget {
        BackupTarget {
            name: name.to_string(),
            source_path: PathBuf::from("/srv/data"),
            destination,
            retention_limit: 4,
            recency: RecencyMetric::Modified,
            schedule: ScheduleSpec::Daily { hour: 1 },
        }
    }

    #[test]
    fn picks_the_driver_for_the_destination_kind() {
        let mut factory = DriverFactory::new(Arc::new(IOManager::new(2)));

        let local = factory
            .build(&target("local", Destination::Local { root: PathBuf::from("/backups") }))
            .unwrap();
        assert_eq!(local.kind(), DestinationKind::Local);

        let remote = factory
            .build(&target(
                "remote",
                Destination::ObjectStore {
                    prefix: "nightly".to_string(),
                    remote: remote("bucket"),
                },
            ))
            .unwrap();
        assert_eq!(remote.kind(), DestinationKind::ObjectStore);
    }

    #[test]
    fn targets_with_the_same_bucket_share_a_client() {
        let mut factory = DriverFactory::new(Arc::new(IOManager::new(2)));
        for (name, bucket) in [("a", "shared"), ("b", "shared"), ("c", "other")] {
            let destination = Destination::ObjectStore {
                prefix: name.to_string(),
                remote: remote(bucket),
            };
            factory.build(&target(name, destination)).unwrap();
        }
        assert_eq!(factory.remote_clients(), 2);
    }
}
