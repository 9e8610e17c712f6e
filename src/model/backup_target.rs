use crate::model::schedule::ScheduleSpec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DestinationKind {
    Local,
    ObjectStore,
}

/// Which file timestamp ranks backup entries for eviction.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecencyMetric {
    #[default]
    Modified,
    Created,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AuthMode {
    /// Credentials come from the standard `AWS_*` environment variables.
    #[default]
    Environment,
    Static {
        access_key_id: String,
        secret_access_key: String,
        session_token: Option<String>,
    },
}

/// Connection settings of a remote bucket. Targets with equal settings share
/// one client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteStoreSpec {
    pub bucket_name: String,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub allow_http: bool,
    pub auth: AuthMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Local { root: PathBuf },
    ObjectStore { prefix: String, remote: RemoteStoreSpec },
}

#[derive(Debug, Clone)]
pub struct BackupTarget {
    pub name: String,
    pub source_path: PathBuf,
    pub destination: Destination,
    pub retention_limit: usize,
    pub recency: RecencyMetric,
    pub schedule: ScheduleSpec,
}
