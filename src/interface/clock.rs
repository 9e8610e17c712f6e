use chrono::NaiveDateTime;

/// Supplies the local wall-clock time used for scheduling and timestamps.
pub trait ClockSource: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}
