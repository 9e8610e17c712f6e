use crate::model::backup_target::{AuthMode, DestinationKind, RecencyMetric};
use crate::model::schedule::{CadenceKind, CadenceValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct ConfigTable {
    #[serde(rename = "Config", default)]
    pub config: Config,
    #[serde(rename = "Target", default)]
    pub targets: BTreeMap<String, TargetConfig>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    #[serde(default = "default_wakeup_time")]
    pub default_wakeup_time: i64, // second
    #[serde(default = "default_max_file_operations")]
    pub max_file_operations: usize, // number
    #[serde(default)]
    pub concurrent_jobs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_directory: default_log_directory(),
            log_level: default_log_level(),
            log_to_console: true,
            default_wakeup_time: default_wakeup_time(),
            max_file_operations: default_max_file_operations(),
            concurrent_jobs: false,
        }
    }
}

/// One `[Target.<name>]` section as written. Everything is optional here so
/// that a missing field is reported with the target's name.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    pub source_path: Option<PathBuf>,
    pub destination_kind: Option<DestinationKind>,
    pub destination_root: Option<String>,
    pub retention_limit: Option<usize>,
    pub recency: Option<RecencyMetric>,
    pub schedule: Option<ScheduleConfig>,
    pub bucket_name: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub allow_http: Option<bool>,
    pub auth: Option<AuthMode>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScheduleConfig {
    pub kind: CadenceKind,
    pub value: CadenceValue,
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("./logs")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_wakeup_time() -> i64 {
    60
}

fn default_max_file_operations() -> usize {
    16
}
