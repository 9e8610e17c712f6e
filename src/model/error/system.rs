use macros::traceable;
use std::path::PathBuf;

traceable! {
    SystemError {
        #[error("Failed to initialize logging in {path}: {err}")]
        InitializeLoggingFailed { path: PathBuf } => tracing::Level::ERROR,

        #[error("Failed to listen for termination signals: {err}")]
        SignalListenFailed => tracing::Level::ERROR,

        #[no_source]
        #[error("Failed to send shutdown signal")]
        ShutdownSignalFailed => tracing::Level::ERROR,

        #[error("Backup job {job} panicked: {err}")]
        ThreadPanic { job: String } => tracing::Level::ERROR,
    }
}
