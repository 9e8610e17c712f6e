pub mod cleanup;
pub mod config;
pub mod copy;
pub mod eviction;
pub mod remote;
pub mod system;

use crate::model::error::cleanup::DirectoryCleanupError;
use crate::model::error::config::ConfigError;
use crate::model::error::copy::CopyError;
use crate::model::error::eviction::EvictionError;
use crate::model::error::system::SystemError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
pub enum Error {
    #[error(transparent)]
    Cleanup(DirectoryCleanupError),
    #[error(transparent)]
    Config(ConfigError),
    #[error(transparent)]
    Copy(CopyError),
    #[error(transparent)]
    Eviction(EvictionError),
    #[error(transparent)]
    System(SystemError),
}

impl Error {
    pub fn level(&self) -> tracing::Level {
        match self {
            Self::Cleanup(err) => err.level(),
            Self::Config(err) => err.level(),
            Self::Copy(err) => err.level(),
            Self::Eviction(err) => err.level(),
            Self::System(err) => err.level(),
        }
    }
}

impl From<DirectoryCleanupError> for Error {
    fn from(error: DirectoryCleanupError) -> Self {
        Self::Cleanup(error)
    }
}

impl From<ConfigError> for Error {
    fn from(error: ConfigError) -> Self {
        Self::Config(error)
    }
}

impl From<CopyError> for Error {
    fn from(error: CopyError) -> Self {
        Self::Copy(error)
    }
}

impl From<EvictionError> for Error {
    fn from(error: EvictionError) -> Self {
        Self::Eviction(error)
    }
}

impl From<SystemError> for Error {
    fn from(error: SystemError) -> Self {
        Self::System(error)
    }
}
