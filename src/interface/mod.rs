pub mod clock;
pub mod core;
pub mod destination;
pub mod file_system;
pub mod object_store;
