//! Directory listing tool: list_directory

use crate::workspace::PathGuard;
use corral_domain::tool::{
    entities::{Capability, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{
        DirEntry, EntryKind, ToolError, ToolPayload, ToolResult, ToolResultMetadata,
    },
};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Tool name constant
pub const LIST_DIRECTORY: &str = "list_directory";

/// Get the tool definition for list_directory
pub fn list_directory_definition() -> ToolDefinition {
    ToolDefinition::new(
        LIST_DIRECTORY,
        "List the entries of a directory (non-recursive), tagged as file, dir, or symlink",
        Capability::List,
    )
    .with_parameter(
        ToolParameter::new("path", "Absolute path to the directory to list", true)
            .with_type("path"),
    )
}

/// Validated, ready-to-run list_directory invocation
#[derive(Debug, Clone)]
pub struct ListDirectoryInvocation {
    path: PathBuf,
    guard: PathGuard,
}

impl ListDirectoryInvocation {
    pub fn build(call: &ToolCall, guard: &PathGuard) -> Result<Self, ToolError> {
        let path_str = call.require_string("path").map_err(ToolError::validation)?;
        let path = guard.resolve(path_str)?;

        if !path.exists() {
            return Err(ToolError::not_found(path_str));
        }
        if !path.is_dir() {
            return Err(ToolError::validation(format!(
                "'{}' is not a directory",
                path_str
            )));
        }

        Ok(Self {
            path,
            guard: guard.clone(),
        })
    }

    pub async fn run(self, token: &CancellationToken) -> ToolResult {
        if token.is_cancelled() {
            return ToolResult::failure(LIST_DIRECTORY, ToolError::cancelled());
        }

        let display = self.path.display().to_string();
        let mut read_dir = match tokio::fs::read_dir(&self.path).await {
            Ok(r) => r,
            Err(e) => {
                return ToolResult::failure(LIST_DIRECTORY, ToolError::from_io(&e, &display));
            }
        };

        let mut entries = Vec::new();
        loop {
            let entry = match read_dir.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                // One unreadable entry does not fail the whole listing
                Err(_) => continue,
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            let entry_path = entry.path();

            // An entry whose resolved target escapes the boundary (symlink
            // pointing outside) is silently skipped, not an error.
            if self
                .guard
                .resolve(&entry_path.display().to_string())
                .is_err()
            {
                trace!(entry = %entry_path.display(), "Skipping entry outside boundary");
                continue;
            }

            let kind = match tokio::fs::symlink_metadata(&entry_path).await {
                Ok(meta) if meta.file_type().is_symlink() => EntryKind::Symlink,
                Ok(meta) if meta.is_dir() => EntryKind::Dir,
                Ok(_) => EntryKind::File,
                Err(_) => continue,
            };

            entries.push(DirEntry { name, kind });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        let count = entries.len();

        ToolResult::success(
            LIST_DIRECTORY,
            ToolPayload::Listing {
                path: display.clone(),
                entries,
            },
        )
        .with_metadata(ToolResultMetadata {
            path: Some(display),
            match_count: Some(count),
            ..Default::default()
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corral_domain::tool::value_objects::ErrorKind;
    use std::fs;
    use tempfile::tempdir;

    fn guard(root: &Path) -> PathGuard {
        PathGuard::new(root).unwrap()
    }

    fn arg(path: &Path) -> String {
        path.display().to_string()
    }

    #[tokio::test]
    async fn test_list_directory_tags_and_order() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("b.ts"), "b").unwrap();
        fs::write(src.join("a.ts"), "a").unwrap();
        fs::create_dir(src.join("sub")).unwrap();
        let guard = guard(dir.path());

        let call = ToolCall::new(LIST_DIRECTORY).with_arg("path", arg(&src));
        let invocation = ListDirectoryInvocation::build(&call, &guard).unwrap();
        let result = invocation.run(&CancellationToken::new()).await;

        assert!(result.is_success());
        match result.payload().unwrap() {
            ToolPayload::Listing { entries, .. } => {
                assert_eq!(entries.len(), 3);
                assert_eq!(entries[0].name, "a.ts");
                assert_eq!(entries[0].kind, EntryKind::File);
                assert_eq!(entries[1].name, "b.ts");
                assert_eq!(entries[1].kind, EntryKind::File);
                assert_eq!(entries[2].name, "sub");
                assert_eq!(entries[2].kind, EntryKind::Dir);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_list_directory_not_found() {
        let dir = tempdir().unwrap();
        let guard = guard(dir.path());

        let call = ToolCall::new(LIST_DIRECTORY).with_arg("path", arg(&dir.path().join("nope")));
        let err = ListDirectoryInvocation::build(&call, &guard).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_list_directory_file_rejected() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("f.txt");
        fs::write(&file, "x").unwrap();
        let guard = guard(dir.path());

        let call = ToolCall::new(LIST_DIRECTORY).with_arg("path", arg(&file));
        let err = ListDirectoryInvocation::build(&call, &guard).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_list_directory_skips_escaping_symlink() {
        let outside = tempdir().unwrap();
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("inside.txt"), "x").unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("leak")).unwrap();
        let guard = guard(dir.path());

        let call = ToolCall::new(LIST_DIRECTORY).with_arg("path", arg(dir.path()));
        let invocation = ListDirectoryInvocation::build(&call, &guard).unwrap();
        let result = invocation.run(&CancellationToken::new()).await;

        assert!(result.is_success());
        match result.payload().unwrap() {
            ToolPayload::Listing { entries, .. } => {
                // The escaping symlink is skipped, the listing still succeeds
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].name, "inside.txt");
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_list_directory_tags_internal_symlink() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("real.txt"), "x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("alias.txt"))
            .unwrap();
        let guard = guard(dir.path());

        let call = ToolCall::new(LIST_DIRECTORY).with_arg("path", arg(dir.path()));
        let invocation = ListDirectoryInvocation::build(&call, &guard).unwrap();
        let result = invocation.run(&CancellationToken::new()).await;

        match result.payload().unwrap() {
            ToolPayload::Listing { entries, .. } => {
                let alias = entries.iter().find(|e| e.name == "alias.txt").unwrap();
                assert_eq!(alias.kind, EntryKind::Symlink);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }
}
