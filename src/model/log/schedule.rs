use chrono::NaiveDateTime;
use macros::loggable;

loggable! {
    ScheduleLog {
        #[error("Scheduled {job} for {at}")]
        JobScheduled { job: String, at: NaiveDateTime } => tracing::Level::INFO,

        #[error("Running {job}, due at {due}")]
        JobDue { job: String, due: NaiveDateTime } => tracing::Level::DEBUG,

        #[error("No backup jobs are scheduled")]
        NothingScheduled => tracing::Level::WARN,

        #[error("Scheduler stopped with {pending} pending jobs")]
        SchedulerStopped { pending: usize } => tracing::Level::INFO,
    }
}
