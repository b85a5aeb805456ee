//! Fixed defaults shared by the configuration and the platform layer

/// Stack size requested for every thread created through `ThreadAttr` (1 MiB).
pub const DEFAULT_STACK_SIZE: usize = 1024 * 1024;

/// Smallest stack size accepted from configuration.
pub const MIN_STACK_SIZE: usize = 16 * 1024;

pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub const DEFAULT_TIME_BUFFER: usize = 64;

/// Largest time buffer a caller may ask for (64 KiB).
pub const MAX_TIME_BUFFER: usize = 64 * 1024;

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const CONFIG_DIR_NAME: &str = "rmkit";
pub const CONFIG_FILE_NAME: &str = "config.toml";
