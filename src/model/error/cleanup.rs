use macros::traceable;
use std::path::PathBuf;

traceable! {
    DirectoryCleanupError {
        #[error("Failed to scan directory {path} for cleanup: {err}")]
        ScanDirectoryFailed { path: PathBuf } => tracing::Level::WARN,

        #[error("Failed to remove empty directory {path}: {err}")]
        RemoveDirectoryFailed { path: PathBuf } => tracing::Level::WARN,
    }
}
