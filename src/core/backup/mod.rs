pub mod backup_job;
pub mod retention;
pub mod source_walker;
