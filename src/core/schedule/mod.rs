pub mod schedule_rule;
pub mod scheduler;
