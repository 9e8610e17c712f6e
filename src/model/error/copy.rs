use macros::traceable;
use std::path::PathBuf;

traceable! {
    CopyError {
        #[error("Source does not exist: {path}: {err}")]
        SourceNotFound { path: PathBuf } => tracing::Level::ERROR,

        #[error("Failed to read directory {path}: {err}")]
        ReadDirectoryFailed { path: PathBuf } => tracing::Level::ERROR,

        #[error("Failed to inspect {path}: {err}")]
        GetMetadataFailed { path: PathBuf } => tracing::Level::ERROR,

        #[no_source]
        #[error("File name is not valid UTF-8: {path}")]
        InvalidFileName { path: PathBuf } => tracing::Level::WARN,

        #[error("Failed to create directory {path}: {err}")]
        CreateDirectoryFailed { path: PathBuf } => tracing::Level::ERROR,

        #[no_source]
        #[error("Backup entry already exists, refusing to overwrite: {path}")]
        EntryAlreadyExists { path: PathBuf } => tracing::Level::WARN,

        #[error("Failed to copy {src} to {dst}: {err}")]
        CopyFileFailed { src: PathBuf, dst: PathBuf } => tracing::Level::ERROR,

        #[error("Failed to move {src} into place at {dst}: {err}")]
        FinalizeEntryFailed { src: PathBuf, dst: PathBuf } => tracing::Level::ERROR,

        #[error("Failed to read {path}: {err}")]
        ReadFileFailed { path: PathBuf } => tracing::Level::ERROR,

        #[error("Failed to put object {key} from {src}: {err}")]
        PutObjectFailed { src: PathBuf, key: String } => tracing::Level::ERROR,
    }
}
