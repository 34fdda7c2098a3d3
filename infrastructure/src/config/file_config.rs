//! File configuration from TOML (`[limits]` and `[shell]` sections)
//!
//! Example configuration:
//!
//! ```toml
//! [limits]
//! max_read_bytes = 5242880
//! max_matches = 500
//! command_timeout_secs = 30
//!
//! [shell]
//! enabled = true
//! denylist = ["git push --force"]
//! ```

use crate::tools::ShellPolicy;
use corral_application::config::ExecutionLimits;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Resource limits configuration (`[limits]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLimitsConfig {
    /// Maximum file size read_file will return (bytes)
    pub max_read_bytes: u64,
    /// Maximum size of a single file considered by content search (bytes)
    pub max_search_file_bytes: u64,
    /// Maximum number of search matches returned
    pub max_matches: usize,
    /// Maximum captured stdout+stderr bytes for shell execution
    pub max_output_bytes: usize,
    /// Shell command timeout in seconds (0 disables the timeout)
    pub command_timeout_secs: u64,
}

impl Default for FileLimitsConfig {
    fn default() -> Self {
        let limits = ExecutionLimits::default();
        Self {
            max_read_bytes: limits.max_read_bytes,
            max_search_file_bytes: limits.max_search_file_bytes,
            max_matches: limits.max_matches,
            max_output_bytes: limits.max_output_bytes,
            command_timeout_secs: limits
                .command_timeout
                .map(|t| t.as_secs())
                .unwrap_or(0),
        }
    }
}

impl FileLimitsConfig {
    /// Convert to the application-layer limits struct.
    pub fn to_limits(&self) -> ExecutionLimits {
        let timeout = if self.command_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.command_timeout_secs))
        };
        ExecutionLimits::default()
            .with_max_read_bytes(self.max_read_bytes)
            .with_max_search_file_bytes(self.max_search_file_bytes)
            .with_max_matches(self.max_matches)
            .with_max_output_bytes(self.max_output_bytes)
            .with_command_timeout(timeout)
    }
}

/// Shell execution configuration (`[shell]` section)
///
/// The denylist here extends the built-in defaults; it can never shrink
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileShellConfig {
    /// Whether shell execution is available at all
    pub enabled: bool,
    /// Extra denied command patterns on top of the defaults
    #[serde(default)]
    pub denylist: Vec<String>,
}

impl Default for FileShellConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            denylist: Vec::new(),
        }
    }
}

impl FileShellConfig {
    /// Convert to the runtime shell policy.
    pub fn to_policy(&self) -> ShellPolicy {
        if !self.enabled {
            return ShellPolicy::disabled();
        }
        ShellPolicy::new().with_extra_denied(&self.denylist)
    }
}

/// Complete file configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Resource limits
    pub limits: FileLimitsConfig,
    /// Shell execution settings
    pub shell: FileShellConfig,
}
