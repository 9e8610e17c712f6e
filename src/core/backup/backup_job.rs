use crate::interface::destination::DestinationDriver;
use crate::model::backup_entry::BackupTimestamp;
use crate::model::backup_report::BackupReport;
use crate::model::backup_target::BackupTarget;
use crate::model::log::backup::BackupLog;
use crate::model::schedule::ScheduleSpec;
use macros::log;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// A configured target bound to the driver chosen for its destination.
pub struct BackupJob {
    target: BackupTarget,
    driver: Arc<dyn DestinationDriver>,
}

impl BackupJob {
    pub fn new(target: BackupTarget, driver: Arc<dyn DestinationDriver>) -> Self {
        Self { target, driver }
    }

    pub fn name(&self) -> &str {
        &self.target.name
    }

    pub fn schedule(&self) -> &ScheduleSpec {
        &self.target.schedule
    }

    /// Runs one backup. Failures are logged where they happen and counted in
    /// the report; nothing escapes to the caller.
    pub async fn run(&self, timestamp: BackupTimestamp) -> BackupReport {
        let execution = Uuid::new_v4();
        let span = tracing::info_span!(
            "backup",
            job = %self.target.name,
            execution = %execution,
            destination = ?self.driver.kind(),
        );

        async move {
            log!(BackupLog::BackupStarted {
                source_path: self.target.source_path.clone(),
                timestamp: timestamp.to_string(),
            });

            let outcome = self.driver.store(&self.target.source_path, timestamp).await;

            if outcome.errors.is_empty() {
                log!(BackupLog::BackupFinished {
                    stored: outcome.stored,
                    evicted: outcome.evicted,
                });
            } else {
                log!(BackupLog::BackupFinishedWithErrors {
                    stored: outcome.stored,
                    evicted: outcome.evicted,
                    failed: outcome.failed(),
                });
            }

            BackupReport {
                execution,
                target: self.target.name.clone(),
                timestamp,
                outcome,
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::destination::local::LocalDriver;
    use crate::core::backup::retention::RetentionPolicy;
    use crate::core::io_manager::IOManager;
    use crate::model::backup_target::{Destination, RecencyMetric};
    use chrono::NaiveDate;
    use std::path::Path;

    pub(crate) fn target(name: &str, source: &Path, root: &Path, schedule: ScheduleSpec) -> BackupTarget {
        BackupTarget {
            name: name.to_string(),
            source_path: source.to_path_buf(),
            destination: Destination::Local {
                root: root.to_path_buf(),
            },
            retention_limit: 2,
            recency: RecencyMetric::Modified,
            schedule,
        }
    }

    fn timestamp(minute: u32) -> BackupTimestamp {
        BackupTimestamp::new(
            NaiveDate::from_ymd_opt(2024, 5, 1)
                .and_then(|date| date.and_hms_opt(12, minute, 0))
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn report_counts_stored_entries() {
        let source = tempfile::tempdir().unwrap();
        let destination = tempfile::tempdir().unwrap();
        std::fs::write(source.path().join("a.txt"), "a").unwrap();
        std::fs::write(source.path().join("b.txt"), "b").unwrap();

        let target = target("docs", source.path(), destination.path(), ScheduleSpec::Daily { hour: 0 });
        let driver = LocalDriver::new(
            Arc::new(IOManager::new(4)),
            destination.path().to_path_buf(),
            target.retention_limit,
            RetentionPolicy::new(target.recency),
        );
        let job = BackupJob::new(target, Arc::new(driver));

        let report = job.run(timestamp(0)).await;
        assert!(report.is_clean());
        assert_eq!(report.target, "docs");
        assert_eq!(report.outcome.stored, 2);
        assert_eq!(report.outcome.evicted, 0);
    }

    #[tokio::test]
    async fn missing_source_is_reported_not_raised() {
        let destination = tempfile::tempdir().unwrap();
        let source = destination.path().join("does-not-exist");

        let target = target("ghost", &source, destination.path(), ScheduleSpec::Daily { hour: 0 });
        let driver = LocalDriver::new(
            Arc::new(IOManager::new(4)),
            destination.path().to_path_buf(),
            target.retention_limit,
            RetentionPolicy::new(target.recency),
        );
        let job = BackupJob::new(target, Arc::new(driver));

        let report = job.run(timestamp(1)).await;
        assert!(!report.is_clean());
        assert_eq!(report.outcome.stored, 0);
        assert_eq!(report.outcome.failed(), 1);
    }
}
