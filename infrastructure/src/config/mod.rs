//! Configuration loading for corral

mod file_config;
mod loader;

pub use file_config::{FileConfig, FileLimitsConfig, FileShellConfig};
pub use loader::{ConfigError, ConfigLoader};
