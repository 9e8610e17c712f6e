use crate::model::config::Config;
use crate::model::error::Error;
use crate::model::error::system::SystemError;
use crate::platform::constants::LOG_FILE_PREFIX;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub struct Logging;

impl Logging {
    /// Installs the global subscriber. The returned guard flushes the file
    /// writer when dropped and must outlive every log call.
    pub fn initialize(config: &Config) -> Result<WorkerGuard, Error> {
        let log_directory = &config.log_directory;
        fs::create_dir_all(log_directory)
            .map_err(|err| SystemError::initialize_logging_failed(log_directory.clone(), err))?;

        let appender = tracing_appender::rolling::daily(log_directory, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_writer(writer)
            .with_filter(Self::build_filter(&config.log_level));

        let console_layer = config.log_to_console.then(|| {
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_filter(Self::build_filter(&config.log_level))
        });

        tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer)
            .try_init()
            .map_err(|err| SystemError::initialize_logging_failed(log_directory.clone(), err))?;

        log_panics::init();

        Ok(guard)
    }

    // RUST_LOG wins over the configured level.
    fn build_filter(level: &str) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}
