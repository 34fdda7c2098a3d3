//! Execution limits — resource caps for tool invocations.
//!
//! [`ExecutionLimits`] groups the static caps the registry applies to every
//! invocation. These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Resource caps applied by the tool registry.
///
/// | Limit | Applies to | Default |
/// |-------|-----------|---------|
/// | `max_read_bytes` | `read_file` | 10 MB |
/// | `max_search_file_bytes` | per candidate in `search_file_content` | 5 MB |
/// | `max_matches` | `search_file_content` | 1000 |
/// | `max_output_bytes` | `run_shell_command` capture | 1 MB |
/// | `command_timeout` | `run_shell_command` (as auto-cancellation) | 60 s |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionLimits {
    /// Maximum file size read_file will return
    pub max_read_bytes: u64,
    /// Maximum size of a single file considered by content search
    pub max_search_file_bytes: u64,
    /// Maximum number of search matches returned
    pub max_matches: usize,
    /// Maximum captured stdout+stderr bytes for shell execution
    pub max_output_bytes: usize,
    /// Timeout for shell execution, applied as an automatic cancellation
    /// trigger on a child token. `None` disables the timeout.
    pub command_timeout: Option<Duration>,
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        Self {
            max_read_bytes: 10 * 1024 * 1024,
            max_search_file_bytes: 5 * 1024 * 1024,
            max_matches: 1000,
            max_output_bytes: 1024 * 1024,
            command_timeout: Some(Duration::from_secs(60)),
        }
    }
}

impl ExecutionLimits {
    // ==================== Builder Methods ====================

    pub fn with_max_read_bytes(mut self, max: u64) -> Self {
        self.max_read_bytes = max;
        self
    }

    pub fn with_max_search_file_bytes(mut self, max: u64) -> Self {
        self.max_search_file_bytes = max;
        self
    }

    pub fn with_max_matches(mut self, max: usize) -> Self {
        self.max_matches = max;
        self
    }

    pub fn with_max_output_bytes(mut self, max: usize) -> Self {
        self.max_output_bytes = max;
        self
    }

    pub fn with_command_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.command_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let limits = ExecutionLimits::default();
        assert_eq!(limits.max_read_bytes, 10 * 1024 * 1024);
        assert_eq!(limits.max_matches, 1000);
        assert_eq!(limits.command_timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_builder() {
        let limits = ExecutionLimits::default()
            .with_max_read_bytes(1024)
            .with_max_matches(5)
            .with_command_timeout(None);

        assert_eq!(limits.max_read_bytes, 1024);
        assert_eq!(limits.max_matches, 5);
        assert!(limits.command_timeout.is_none());
    }
}
