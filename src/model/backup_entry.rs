use chrono::{NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub const TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H:%M:%S";

/// Creation time of a backup run, at whole-second resolution. Every entry
/// written by one run carries the same timestamp.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BackupTimestamp(NaiveDateTime);

impl BackupTimestamp {
    pub fn new(time: NaiveDateTime) -> Self {
        Self(time.trunc_subsecs(0))
    }

    pub fn parse(text: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
            .ok()
            .map(Self)
    }

    /// The earliest timestamp that sorts after this one.
    pub fn next_second(&self) -> Self {
        Self(self.0 + chrono::Duration::seconds(1))
    }
}

impl fmt::Display for BackupTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

/// Groups every timestamped copy of one source file.
///
/// `directory` is where the copies live relative to the destination root and
/// `file_name` is the original name that each copy extends with
/// `.<timestamp>`. A single-file source keeps its copies in a directory named
/// after itself; files from a directory source share the mirrored directory
/// of their parent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogicalKey {
    directory: PathBuf,
    file_name: String,
}

impl LogicalKey {
    pub fn single(file_name: &str) -> Self {
        Self {
            directory: PathBuf::from(file_name),
            file_name: file_name.to_string(),
        }
    }

    pub fn nested(source_name: &str, relative_directory: &Path, file_name: &str) -> Self {
        let mut directory = PathBuf::from(source_name);
        if !relative_directory.as_os_str().is_empty() {
            directory.push(relative_directory);
        }
        Self {
            directory,
            file_name: file_name.to_string(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn entry_name(&self, timestamp: &BackupTimestamp) -> String {
        format!("{}.{}", self.file_name, timestamp)
    }

    /// Recovers the timestamp from a stored name belonging to this key.
    pub fn parse_entry_name(&self, name: &str) -> Option<BackupTimestamp> {
        let (stem, timestamp) = name.rsplit_once('.')?;
        if stem != self.file_name {
            return None;
        }
        BackupTimestamp::parse(timestamp)
    }

    /// Relative path of the copies with the timestamp suffix removed.
    pub fn relative_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    /// Path segments of the copies' directory, for building object keys.
    pub fn directory_segments(&self) -> Vec<String> {
        self.directory
            .components()
            .map(|component| component.as_os_str().to_string_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.relative_path().display())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    pub logical_key: LogicalKey,
    pub timestamp: BackupTimestamp,
    pub location: PathBuf,
    pub recency: SystemTime,
}
