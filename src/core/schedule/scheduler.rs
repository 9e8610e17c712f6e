use crate::core::backup::backup_job::BackupJob;
use crate::core::schedule::schedule_rule::ScheduleRule;
use crate::interface::clock::ClockSource;
use crate::interface::core::runnable::Runnable;
use crate::model::backup_entry::BackupTimestamp;
use crate::model::backup_report::BackupReport;
use crate::model::error::system::SystemError;
use crate::model::log::schedule::ScheduleLog;
use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use futures::future::join_all;
use macros::log;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::Arc;
use tokio::select;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::task::JoinHandle;
use tokio::time::sleep;

struct PendingExecution {
    instant: NaiveDateTime,
    sequence: u64,
    job: Arc<BackupJob>,
    last: Option<BackupTimestamp>,
}

impl PendingExecution {
    // Entries are named after the due instant; a job never reuses the
    // second of its previous run, even when that run started late.
    fn timestamp(&self) -> BackupTimestamp {
        let due = BackupTimestamp::new(self.instant);
        match self.last {
            Some(last) => due.max(last.next_second()),
            None => due,
        }
    }
}

impl PartialEq for PendingExecution {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PendingExecution {}

impl PartialOrd for PendingExecution {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Equal instants keep insertion order.
impl Ord for PendingExecution {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.instant, self.sequence).cmp(&(other.instant, other.sequence))
    }
}

pub struct Scheduler {
    clock: Arc<dyn ClockSource>,
    max_sleep: Duration,
    concurrent: bool,
    queue: BinaryHeap<Reverse<PendingExecution>>,
    sequence: u64,
}

impl Scheduler {
    /// `max_sleep` bounds a single wait so a wall-clock jump is noticed
    /// within that interval.
    pub fn new(clock: Arc<dyn ClockSource>, max_sleep: Duration, concurrent: bool) -> Self {
        Scheduler {
            clock,
            max_sleep: max_sleep.max(Duration::seconds(1)),
            concurrent,
            queue: BinaryHeap::new(),
            sequence: 0,
        }
    }

    pub fn schedule(&mut self, job: Arc<BackupJob>) {
        let instant = ScheduleRule::next(self.clock.now(), job.schedule());
        self.enqueue(instant, job, None);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn next_instant(&self) -> Option<NaiveDateTime> {
        self.queue.peek().map(|Reverse(pending)| pending.instant)
    }

    /// Runs every job due by now, then queues each one's next firing.
    pub async fn run_due(&mut self) -> Vec<BackupReport> {
        let now = self.clock.now();
        let mut due = Vec::new();
        while self.next_instant().is_some_and(|instant| instant <= now) {
            if let Some(Reverse(pending)) = self.queue.pop() {
                log!(ScheduleLog::JobDue {
                    job: pending.job.name().to_string(),
                    due: pending.instant,
                });
                due.push(pending);
            }
        }

        let reports = self.execute(&due).await;

        let now = self.clock.now();
        for pending in due {
            let instant = ScheduleRule::following(pending.instant, now, pending.job.schedule());
            let last = Some(pending.timestamp());
            self.enqueue(instant, pending.job, last);
        }

        reports
    }

    fn enqueue(&mut self, instant: NaiveDateTime, job: Arc<BackupJob>, last: Option<BackupTimestamp>) {
        log!(ScheduleLog::JobScheduled {
            job: job.name().to_string(),
            at: instant,
        });
        let sequence = self.sequence;
        self.sequence += 1;
        self.queue.push(Reverse(PendingExecution {
            instant,
            sequence,
            job,
            last,
        }));
    }

    // Every job runs in its own task so a panic stays with that job.
    async fn execute(&self, due: &[PendingExecution]) -> Vec<BackupReport> {
        let mut reports = Vec::with_capacity(due.len());
        if self.concurrent {
            let handles: Vec<_> = due.iter().map(Self::spawn).collect();
            let results = join_all(handles).await;
            for (pending, result) in due.iter().zip(results) {
                Self::collect(pending, result, &mut reports);
            }
        } else {
            for pending in due {
                let result = Self::spawn(pending).await;
                Self::collect(pending, result, &mut reports);
            }
        }
        reports
    }

    fn spawn(pending: &PendingExecution) -> JoinHandle<BackupReport> {
        let job = pending.job.clone();
        let timestamp = pending.timestamp();
        tokio::spawn(async move { job.run(timestamp).await })
    }

    fn collect(
        pending: &PendingExecution,
        result: Result<BackupReport, tokio::task::JoinError>,
        reports: &mut Vec<BackupReport>,
    ) {
        match result {
            Ok(report) => reports.push(report),
            Err(err) => log!(SystemError::thread_panic(pending.job.name(), err)),
        }
    }

    fn sleep_duration(&self, now: NaiveDateTime) -> std::time::Duration {
        let wait = match self.next_instant() {
            Some(instant) => (instant - now).min(self.max_sleep),
            None => self.max_sleep,
        };
        wait.to_std().unwrap_or(std::time::Duration::ZERO)
    }
}

#[async_trait]
impl Runnable for Scheduler {
    async fn run_impl(mut self, mut shutdown_rx: oneshot::Receiver<()>) {
        if self.queue.is_empty() {
            log!(ScheduleLog::NothingScheduled);
        }

        loop {
            let now = self.clock.now();
            if self.next_instant().is_some_and(|instant| instant <= now) {
                self.run_due().await;
                match shutdown_rx.try_recv() {
                    Err(TryRecvError::Empty) => continue,
                    _ => break,
                }
            }

            let sleep_time = self.sleep_duration(now);
            select! {
                biased;
                _ = &mut shutdown_rx => { break; }
                _ = sleep(sleep_time) => {}
            }
        }

        log!(ScheduleLog::SchedulerStopped {
            pending: self.pending(),
        });
    }
}
