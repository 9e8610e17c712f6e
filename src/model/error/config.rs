use macros::traceable;
use std::path::PathBuf;

traceable! {
    ConfigError {
        #[error("Configuration not found: {path}: {err}")]
        ConfigNotFound { path: PathBuf } => tracing::Level::ERROR,

        #[error("Invalid configuration: {path}: {err}")]
        InvalidConfig { path: PathBuf } => tracing::Level::ERROR,

        #[no_source]
        #[error("Option {option} is out of range: {value}")]
        OptionOutOfRange { option: String, value: String } => tracing::Level::ERROR,

        #[no_source]
        #[error("Target {target} is missing field {field}")]
        MissingField { target: String, field: String } => tracing::Level::ERROR,

        #[no_source]
        #[error("Target {target} has an invalid {kind} schedule value: {value}")]
        InvalidScheduleValue { target: String, kind: String, value: String } => tracing::Level::ERROR,

        #[no_source]
        #[error("Target {target} must retain at least one backup")]
        InvalidRetentionLimit { target: String } => tracing::Level::ERROR,

        #[no_source]
        #[error("Target {target} has a source path without a file name: {path}")]
        InvalidSourcePath { target: String, path: PathBuf } => tracing::Level::ERROR,

        #[no_source]
        #[error("Target {target} sets {field}, which only applies to object store destinations")]
        UnexpectedRemoteField { target: String, field: String } => tracing::Level::ERROR,

        #[error("Target {target} could not build its object store client: {err}")]
        ObjectStoreSetupFailed { target: String } => tracing::Level::ERROR,
    }
}
