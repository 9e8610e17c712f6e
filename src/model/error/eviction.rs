use macros::traceable;
use std::path::PathBuf;

traceable! {
    EvictionError {
        #[error("Failed to list backup entries in {path}: {err}")]
        ListEntriesFailed { path: PathBuf } => tracing::Level::ERROR,

        #[error("Failed to read the age of backup entry {path}: {err}")]
        ReadRecencyFailed { path: PathBuf } => tracing::Level::ERROR,

        #[error("Failed to delete backup entry {path}: {err}")]
        DeleteEntryFailed { path: PathBuf } => tracing::Level::ERROR,
    }
}
