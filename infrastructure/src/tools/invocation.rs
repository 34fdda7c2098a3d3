//! Tool invocation — the validated, ready-to-run unit.
//!
//! `Unvalidated --build()--> Ready --execute()--> Terminal(Success|Failure)`.
//! No transition skips `build`: it front-loads every fallible step
//! (semantic validation, path-guard resolution) and is all-or-nothing. An
//! invocation, once constructed, never fails validation again.
//!
//! The tool set is a closed enum: adding a tool means adding a variant, not
//! subclassing anything.

use crate::tools::dir::{self, ListDirectoryInvocation};
use crate::tools::edit::{self, ReplaceInvocation};
use crate::tools::file::{self, ReadFileInvocation, WriteFileInvocation};
use crate::tools::search::{self, SearchInvocation};
use crate::tools::shell::{self, ShellInvocation, ShellPolicy};
use crate::workspace::PathGuard;
use corral_application::config::ExecutionLimits;
use corral_domain::tool::{
    entities::ToolCall,
    value_objects::{ToolError, ToolResult},
};
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// A validated, parameter-bound, ready-to-run tool invocation.
#[derive(Debug, Clone)]
pub enum ToolInvocation {
    ReadFile(ReadFileInvocation),
    WriteFile(WriteFileInvocation),
    ListDirectory(ListDirectoryInvocation),
    SearchFileContent(SearchInvocation),
    Replace(ReplaceInvocation),
    RunShellCommand(ShellInvocation),
}

impl ToolInvocation {
    /// Build an invocation from an untrusted call.
    ///
    /// The call must already have passed structural validation against its
    /// definition; this step performs the semantic checks and path-guard
    /// resolution. Failure at any step aborts construction — no partial
    /// invocation exists.
    pub fn build(
        call: &ToolCall,
        guard: &PathGuard,
        shell_policy: &ShellPolicy,
    ) -> Result<Self, ToolError> {
        match call.tool_name.as_str() {
            file::READ_FILE => Ok(Self::ReadFile(ReadFileInvocation::build(call, guard)?)),
            file::WRITE_FILE => Ok(Self::WriteFile(WriteFileInvocation::build(call, guard)?)),
            dir::LIST_DIRECTORY => Ok(Self::ListDirectory(ListDirectoryInvocation::build(
                call, guard,
            )?)),
            search::SEARCH_FILE_CONTENT => {
                Ok(Self::SearchFileContent(SearchInvocation::build(call, guard)?))
            }
            edit::REPLACE => Ok(Self::Replace(ReplaceInvocation::build(call, guard)?)),
            shell::RUN_SHELL_COMMAND => Ok(Self::RunShellCommand(ShellInvocation::build(
                call,
                guard,
                shell_policy,
            )?)),
            _ => Err(ToolError::validation(format!(
                "Unknown tool: {}",
                call.tool_name
            ))),
        }
    }

    /// The canonical path a write-class invocation mutates, if any.
    /// Drives the registry's per-path write serialization.
    pub fn write_target(&self) -> Option<&Path> {
        match self {
            Self::WriteFile(invocation) => Some(invocation.path()),
            Self::Replace(invocation) => Some(invocation.path()),
            _ => None,
        }
    }

    /// Perform the effect. Checks the token before starting and at each
    /// natural suspension point; all failures come back as data.
    pub async fn execute(self, token: &CancellationToken, limits: &ExecutionLimits) -> ToolResult {
        match self {
            Self::ReadFile(invocation) => invocation.run(token, limits).await,
            Self::WriteFile(invocation) => invocation.run(token).await,
            Self::ListDirectory(invocation) => invocation.run(token).await,
            Self::SearchFileContent(invocation) => invocation.run(token, limits).await,
            Self::Replace(invocation) => invocation.run(token).await,
            Self::RunShellCommand(invocation) => invocation.run(token, limits).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corral_domain::tool::value_objects::ErrorKind;
    use tempfile::tempdir;

    #[test]
    fn test_unknown_tool_rejected() {
        let dir = tempdir().unwrap();
        let guard = PathGuard::new(dir.path()).unwrap();

        let call = ToolCall::new("conjure_file");
        let err = ToolInvocation::build(&call, &guard, &ShellPolicy::new()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("Unknown tool"));
    }

    #[test]
    fn test_write_target_only_for_write_tools() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("f.txt"), "x").unwrap();
        let guard = PathGuard::new(dir.path()).unwrap();
        let policy = ShellPolicy::new();

        let read = ToolInvocation::build(
            &ToolCall::new(file::READ_FILE)
                .with_arg("path", dir.path().join("f.txt").display().to_string()),
            &guard,
            &policy,
        )
        .unwrap();
        assert!(read.write_target().is_none());

        let write = ToolInvocation::build(
            &ToolCall::new(file::WRITE_FILE)
                .with_arg("path", dir.path().join("g.txt").display().to_string())
                .with_arg("content", "y"),
            &guard,
            &policy,
        )
        .unwrap();
        assert!(write.write_target().is_some());
    }
}
