pub mod backup_entry;
pub mod backup_report;
pub mod backup_target;
pub mod config;
pub mod error;
pub mod log;
pub mod schedule;
