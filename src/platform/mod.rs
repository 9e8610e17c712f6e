mod file_system;

pub mod constants;

pub use file_system::FileSystem;
