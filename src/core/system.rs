use crate::core::app_config::AppConfig;
use crate::core::backup::backup_job::BackupJob;
use crate::core::destination::DriverFactory;
use crate::core::io_manager::IOManager;
use crate::core::schedule::scheduler::Scheduler;
use crate::interface::clock::ClockSource;
use crate::interface::core::runnable::Runnable;
use crate::model::error::Error;
use crate::model::error::system::SystemError;
use crate::model::log::system::SystemLog;
use crate::platform::constants::{CONFIG_PATH, CONFIG_PATH_ENV};
use crate::utils::clock::SystemClock;
use crate::utils::logging::Logging;
use chrono::Duration;
use macros::log;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing_appender::non_blocking::WorkerGuard;

pub struct System {
    io_manager: Arc<IOManager>,
    scheduler: Option<Scheduler>,
    running: Option<(oneshot::Sender<()>, JoinHandle<()>)>,
    _log_guard: WorkerGuard,
}

impl System {
    pub fn config_path() -> PathBuf {
        env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_PATH))
    }

    /// Loads the configuration, starts logging and schedules every target.
    /// Nothing is logged before the configuration is read, so errors from
    /// that step are left for the caller to report.
    pub fn initialize() -> Result<Self, Error> {
        let path = Self::config_path();
        let config = AppConfig::load(&path)?;
        let log_guard = Logging::initialize(&config)?;

        log!(SystemLog::Initializing);
        log!(SystemLog::ConfigLoaded {
            path: config.path().to_path_buf(),
            targets: config.targets().len(),
        });

        let io_manager = Arc::new(IOManager::new(config.max_file_operations));
        let clock: Arc<dyn ClockSource> = Arc::new(SystemClock);
        let mut scheduler = Scheduler::new(
            clock,
            Duration::seconds(config.default_wakeup_time),
            config.concurrent_jobs,
        );

        let mut factory = DriverFactory::new(io_manager.clone());
        for target in config.targets() {
            let driver = factory.build(target).inspect_err(|err| {
                log!(err);
            })?;
            scheduler.schedule(Arc::new(BackupJob::new(target.clone(), driver)));
        }

        log!(SystemLog::InitializeComplete);

        Ok(Self {
            io_manager,
            scheduler: Some(scheduler),
            running: None,
            _log_guard: log_guard,
        })
    }

    /// Starts the scheduler and waits for Ctrl-C or SIGTERM.
    pub async fn run(&mut self) -> Result<(), Error> {
        if let Some(scheduler) = self.scheduler.take() {
            self.running = Some(scheduler.run());
        }
        log!(SystemLog::Online);

        Self::wait_for_shutdown().await.inspect_err(|err| {
            log!(err);
        })?;

        log!(SystemLog::ShutdownRequested);
        Ok(())
    }

    pub async fn terminate(self) {
        log!(SystemLog::Terminating);

        if let Some((shutdown_tx, handle)) = self.running {
            if shutdown_tx.send(()).is_err() {
                log!(SystemError::ShutdownSignalFailed);
            }
            if let Err(err) = handle.await {
                log!(SystemError::thread_panic("scheduler", err));
            }
        }
        self.io_manager.terminate();

        log!(SystemLog::TerminateComplete);
    }

    #[cfg(unix)]
    async fn wait_for_shutdown() -> Result<(), SystemError> {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate = signal(SignalKind::terminate()).map_err(SystemError::signal_listen_failed)?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result.map_err(SystemError::signal_listen_failed),
            _ = terminate.recv() => Ok(()),
        }
    }

    #[cfg(not(unix))]
    async fn wait_for_shutdown() -> Result<(), SystemError> {
        tokio::signal::ctrl_c()
            .await
            .map_err(SystemError::signal_listen_failed)
    }
}
