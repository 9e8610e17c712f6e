use macros::loggable;
use std::path::PathBuf;

loggable! {
    SystemLog {
        #[error("Initializing")]
        Initializing => tracing::Level::INFO,

        #[error("Loaded configuration from {path} with {targets} backup targets")]
        ConfigLoaded { path: PathBuf, targets: usize } => tracing::Level::INFO,

        #[error("Initialization completed")]
        InitializeComplete => tracing::Level::INFO,

        #[error("Online now")]
        Online => tracing::Level::INFO,

        #[error("Termination signal received")]
        ShutdownRequested => tracing::Level::INFO,

        #[error("Termination in process")]
        Terminating => tracing::Level::INFO,

        #[error("Termination completed")]
        TerminateComplete => tracing::Level::INFO,
    }
}
