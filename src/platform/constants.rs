pub const CONFIG_PATH: &str = "./config.toml";

pub const CONFIG_PATH_ENV: &str = "SNAPKEEPER_CONFIG";

pub const LOG_FILE_PREFIX: &str = "snapkeeper.log";

/// Suffix of a copy still being written; never parsed as a backup entry.
pub const PARTIAL_SUFFIX: &str = "partial";
