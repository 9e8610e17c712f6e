use crate::model::backup_entry::BackupTimestamp;
use crate::model::error::Error;
use macros::log;
use uuid::Uuid;

/// Counts of what one driver `store` call did.
#[derive(Debug, Default)]
pub struct StoreOutcome {
    pub stored: usize,
    pub evicted: usize,
    pub errors: Vec<Error>,
}

impl StoreOutcome {
    pub fn failed(&self) -> usize {
        self.errors.len()
    }

    /// Logs and keeps a failure so the caller can move on to the next item.
    pub fn record<T>(&mut self, result: Result<T, Error>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                log!(err);
                self.errors.push(err);
                None
            }
        }
    }
}

#[derive(Debug)]
pub struct BackupReport {
    pub execution: Uuid,
    pub target: String,
    pub timestamp: BackupTimestamp,
    pub outcome: StoreOutcome,
}

impl BackupReport {
    pub fn is_clean(&self) -> bool {
        self.outcome.errors.is_empty()
    }
}
