pub mod app_config;
pub mod backup;
pub mod destination;
pub mod io_manager;
pub mod schedule;
pub mod system;
