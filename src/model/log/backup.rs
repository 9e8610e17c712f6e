use macros::loggable;
use std::path::PathBuf;

loggable! {
    BackupLog {
        #[error("Backing up {source_path} as {timestamp}")]
        BackupStarted { source_path: PathBuf, timestamp: String } => tracing::Level::INFO,

        #[error("Backup finished: {stored} stored, {evicted} evicted")]
        BackupFinished { stored: usize, evicted: usize } => tracing::Level::INFO,

        #[error("Backup finished with {failed} failures: {stored} stored, {evicted} evicted")]
        BackupFinishedWithErrors { stored: usize, evicted: usize, failed: usize } => tracing::Level::WARN,

        #[error("Stored {location}")]
        EntryStored { location: String } => tracing::Level::DEBUG,

        #[error("Evicted {location}")]
        EntryEvicted { location: String } => tracing::Level::INFO,

        #[error("Could not remove partial copy {path}: {reason}")]
        PartialCleanupFailed { path: PathBuf, reason: String } => tracing::Level::DEBUG,

        #[error("Removed empty directory {path}")]
        DirectoryRemoved { path: PathBuf } => tracing::Level::DEBUG,

        #[error("Skipping symlinked directory {path}")]
        SymlinkedDirectorySkipped { path: PathBuf } => tracing::Level::DEBUG,
    }
}
