//! File operation tools: read_file, write_file

use crate::workspace::PathGuard;
use corral_application::config::ExecutionLimits;
use corral_domain::tool::{
    entities::{Capability, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolPayload, ToolResult, ToolResultMetadata},
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

/// Tool name constants
pub const READ_FILE: &str = "read_file";
pub const WRITE_FILE: &str = "write_file";

/// Chunk size for streamed writes (cancellation is checked between chunks)
const WRITE_CHUNK: usize = 64 * 1024;

/// Bytes sniffed for NUL when deciding whether content is binary
const BINARY_SNIFF_LEN: usize = 8192;

/// Get the tool definition for read_file
pub fn read_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        READ_FILE,
        "Read the contents of a file at the specified absolute path",
        Capability::Read,
    )
    .with_parameter(
        ToolParameter::new("path", "Absolute path to the file to read", true).with_type("path"),
    )
    .with_parameter(
        ToolParameter::new(
            "offset",
            "Line number to start reading from (0-indexed)",
            false,
        )
        .with_type("integer"),
    )
    .with_parameter(
        ToolParameter::new("limit", "Maximum number of lines to read", false).with_type("integer"),
    )
}

/// Get the tool definition for write_file
pub fn write_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        WRITE_FILE,
        "Write content to a file at the specified absolute path. Overwrites by default and creates missing parent directories.",
        Capability::Write,
    )
    .with_parameter(
        ToolParameter::new("path", "Absolute path to the file to write", true).with_type("path"),
    )
    .with_parameter(
        ToolParameter::new("content", "Content to write to the file", true).with_type("string"),
    )
    .with_parameter(
        ToolParameter::new(
            "mode",
            "Write mode: 'overwrite' replaces an existing file, 'create_new' fails if the target exists",
            false,
        )
        .with_allowed_values(["overwrite", "create_new"]),
    )
}

/// Validated, ready-to-run read_file invocation
#[derive(Debug, Clone)]
pub struct ReadFileInvocation {
    path: PathBuf,
    offset: usize,
    limit: Option<usize>,
}

impl ReadFileInvocation {
    /// Build from an untrusted call. All fallibility lives here; existence
    /// is a cheap pre-check only and is re-verified at execute time.
    pub fn build(call: &ToolCall, guard: &PathGuard) -> Result<Self, ToolError> {
        let path_str = call.require_string("path").map_err(ToolError::validation)?;
        let path = guard.resolve(path_str)?;

        if path.exists() && !path.is_file() {
            return Err(ToolError::validation(format!(
                "'{}' is not a file",
                path_str
            )));
        }
        if !path.exists() {
            return Err(ToolError::not_found(path_str));
        }

        let offset = match call.get_i64("offset") {
            Some(n) if n < 0 => {
                return Err(ToolError::validation("offset must not be negative"));
            }
            Some(n) => n as usize,
            None => 0,
        };
        let limit = match call.get_i64("limit") {
            Some(n) if n <= 0 => {
                return Err(ToolError::validation("limit must be positive"));
            }
            Some(n) => Some(n as usize),
            None => None,
        };

        Ok(Self {
            path,
            offset,
            limit,
        })
    }

    pub async fn run(self, token: &CancellationToken, limits: &ExecutionLimits) -> ToolResult {
        if token.is_cancelled() {
            return ToolResult::failure(READ_FILE, ToolError::cancelled());
        }

        let display = self.path.display().to_string();

        let metadata = match tokio::fs::metadata(&self.path).await {
            Ok(m) => m,
            Err(e) => return ToolResult::failure(READ_FILE, ToolError::from_io(&e, &display)),
        };
        if metadata.len() > limits.max_read_bytes {
            return ToolResult::failure(
                READ_FILE,
                ToolError::validation(format!(
                    "File too large ({} bytes). Maximum size is {} bytes",
                    metadata.len(),
                    limits.max_read_bytes
                )),
            );
        }

        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) => return ToolResult::failure(READ_FILE, ToolError::from_io(&e, &display)),
        };
        let size = bytes.len() as u64;

        // Binary content is flagged, never decoded
        let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
        let text = if sniff.contains(&0) {
            None
        } else {
            String::from_utf8(bytes).ok()
        };

        let payload = match text {
            None => ToolPayload::FileContent {
                path: display.clone(),
                text: None,
                binary: true,
                size,
                truncated: false,
            },
            Some(content) => {
                let (windowed, truncated) = window_lines(&content, self.offset, self.limit);
                ToolPayload::FileContent {
                    path: display.clone(),
                    text: Some(windowed),
                    binary: false,
                    size,
                    truncated,
                }
            }
        };

        ToolResult::success(READ_FILE, payload).with_metadata(ToolResultMetadata {
            bytes: Some(size as usize),
            path: Some(display),
            ..Default::default()
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Apply an offset/limit line window. Returns the windowed text and whether
/// anything outside the window was cut.
fn window_lines(content: &str, offset: usize, limit: Option<usize>) -> (String, bool) {
    if offset == 0 && limit.is_none() {
        return (content.to_string(), false);
    }

    let lines: Vec<&str> = content.lines().collect();
    let total = lines.len();
    if offset >= total {
        return (String::new(), total > 0);
    }
    let end = match limit {
        Some(l) => (offset + l).min(total),
        None => total,
    };
    let truncated = offset > 0 || end < total;
    (lines[offset..end].join("\n"), truncated)
}

/// Validated, ready-to-run write_file invocation
#[derive(Debug, Clone)]
pub struct WriteFileInvocation {
    path: PathBuf,
    content: String,
    create_new: bool,
}

impl WriteFileInvocation {
    pub fn build(call: &ToolCall, guard: &PathGuard) -> Result<Self, ToolError> {
        let path_str = call.require_string("path").map_err(ToolError::validation)?;
        let content = call
            .require_string("content")
            .map_err(ToolError::validation)?;
        let path = guard.resolve(path_str)?;

        if path.exists() && !path.is_file() {
            return Err(ToolError::validation(format!(
                "'{}' is not a file",
                path_str
            )));
        }

        let create_new = matches!(call.get_string("mode"), Some("create_new"));
        // Cheap pre-check; re-verified at execute time
        if create_new && path.exists() {
            return Err(ToolError::already_exists(path_str));
        }

        Ok(Self {
            path,
            content: content.to_string(),
            create_new,
        })
    }

    pub async fn run(self, token: &CancellationToken) -> ToolResult {
        if token.is_cancelled() {
            return ToolResult::failure(WRITE_FILE, ToolError::cancelled());
        }

        let display = self.path.display().to_string();
        let existed = self.path.exists();
        if self.create_new && existed {
            return ToolResult::failure(WRITE_FILE, ToolError::already_exists(&display));
        }

        if let Some(parent) = self.path.parent()
            && !parent.exists()
            && let Err(e) = tokio::fs::create_dir_all(parent).await
        {
            return ToolResult::failure(
                WRITE_FILE,
                ToolError::from_io(&e, parent.display().to_string()),
            );
        }

        let bytes = match write_atomic(&self.path, self.content.as_bytes(), token).await {
            Ok(n) => n,
            Err(e) => return ToolResult::failure(WRITE_FILE, e),
        };

        ToolResult::success(
            WRITE_FILE,
            ToolPayload::Written {
                path: display.clone(),
                bytes,
                created: !existed,
            },
        )
        .with_metadata(ToolResultMetadata {
            bytes: Some(bytes),
            path: Some(display),
            ..Default::default()
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Write `bytes` to `path` atomically: stream into a same-directory
/// temporary file (checking the token between chunks), then rename into
/// place. The target is either untouched or holds the full content —
/// cancellation and errors never leave a truncated file behind.
pub(crate) async fn write_atomic(
    path: &Path,
    bytes: &[u8],
    token: &CancellationToken,
) -> Result<usize, ToolError> {
    let parent = path
        .parent()
        .ok_or_else(|| ToolError::validation(format!("'{}' has no parent", path.display())))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp = parent.join(format!(
        ".{}.{}.{}.tmp",
        file_name,
        std::process::id(),
        seq
    ));

    let mut file = match tokio::fs::File::create(&tmp).await {
        Ok(f) => f,
        Err(e) => return Err(ToolError::from_io(&e, tmp.display().to_string())),
    };

    for chunk in bytes.chunks(WRITE_CHUNK) {
        if token.is_cancelled() {
            drop(file);
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(ToolError::cancelled());
        }
        if let Err(e) = file.write_all(chunk).await {
            drop(file);
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(ToolError::from_io(&e, tmp.display().to_string()));
        }
    }

    if let Err(e) = file.flush().await {
        drop(file);
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(ToolError::from_io(&e, tmp.display().to_string()));
    }
    drop(file);

    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(ToolError::from_io(&e, path.display().to_string()));
    }

    Ok(bytes.len())
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
    async fn test_read_file_success() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        fs::write(&path, "Hello, World!").unwrap();
        let guard = guard(dir.path());

        let call = ToolCall::new(READ_FILE).with_arg("path", arg(&path));
        let invocation = ReadFileInvocation::build(&call, &guard).unwrap();
        let result = invocation
            .run(&CancellationToken::new(), &ExecutionLimits::default())
            .await;

        assert!(result.is_success());
        assert!(result.render().contains("Hello, World!"));
    }

    #[test]
    fn test_read_file_not_found() {
        let dir = tempdir().unwrap();
        let guard = guard(dir.path());

        let call = ToolCall::new(READ_FILE).with_arg("path", arg(&dir.path().join("missing.txt")));
        let err = ReadFileInvocation::build(&call, &guard).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_read_file_outside_workspace() {
        let dir = tempdir().unwrap();
        let guard = guard(dir.path());

        let candidate = format!("{}/../etc/passwd", dir.path().display());
        let call = ToolCall::new(READ_FILE).with_arg("path", candidate);
        let err = ReadFileInvocation::build(&call, &guard).unwrap_err();
        assert_eq!(err.kind, ErrorKind::PathOutsideWorkspace);
    }

    #[test]
    fn test_read_file_directory_rejected() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let guard = guard(dir.path());

        let call = ToolCall::new(READ_FILE).with_arg("path", arg(&sub));
        let err = ReadFileInvocation::build(&call, &guard).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_read_file_binary_flagged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        fs::write(&path, [0u8, 159, 146, 150, 0, 1, 2]).unwrap();
        let guard = guard(dir.path());

        let call = ToolCall::new(READ_FILE).with_arg("path", arg(&path));
        let invocation = ReadFileInvocation::build(&call, &guard).unwrap();
        let result = invocation
            .run(&CancellationToken::new(), &ExecutionLimits::default())
            .await;

        assert!(result.is_success());
        match result.payload().unwrap() {
            ToolPayload::FileContent { binary, text, .. } => {
                assert!(binary);
                assert!(text.is_none());
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_read_file_too_large() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.txt");
        fs::write(&path, "0123456789").unwrap();
        let guard = guard(dir.path());

        let call = ToolCall::new(READ_FILE).with_arg("path", arg(&path));
        let invocation = ReadFileInvocation::build(&call, &guard).unwrap();
        let limits = ExecutionLimits::default().with_max_read_bytes(4);
        let result = invocation.run(&CancellationToken::new(), &limits).await;

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_read_file_with_offset_and_limit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lines.txt");
        fs::write(&path, "line1\nline2\nline3\nline4\nline5").unwrap();
        let guard = guard(dir.path());

        let call = ToolCall::new(READ_FILE)
            .with_arg("path", arg(&path))
            .with_arg("offset", 1i64)
            .with_arg("limit", 2i64);
        let invocation = ReadFileInvocation::build(&call, &guard).unwrap();
        let result = invocation
            .run(&CancellationToken::new(), &ExecutionLimits::default())
            .await;

        assert!(result.is_success());
        let output = result.render();
        assert!(output.contains("line2"));
        assert!(output.contains("line3"));
        assert!(!output.contains("line1"));
        assert!(!output.contains("line4"));
    }

    #[tokio::test]
    async fn test_write_file_success_and_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let guard = guard(dir.path());

        for _ in 0..2 {
            let call = ToolCall::new(WRITE_FILE)
                .with_arg("path", arg(&path))
                .with_arg("content", "written content");
            let invocation = WriteFileInvocation::build(&call, &guard).unwrap();
            let result = invocation.run(&CancellationToken::new()).await;

            assert!(result.is_success());
            assert_eq!(fs::read_to_string(&path).unwrap(), "written content");
        }
    }

    #[tokio::test]
    async fn test_write_file_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a/b/c.txt");
        let guard = guard(dir.path());

        let call = ToolCall::new(WRITE_FILE)
            .with_arg("path", arg(&path))
            .with_arg("content", "deep");
        let invocation = WriteFileInvocation::build(&call, &guard).unwrap();
        let result = invocation.run(&CancellationToken::new()).await;

        assert!(result.is_success());
        assert_eq!(fs::read_to_string(&path).unwrap(), "deep");
    }

    #[test]
    fn test_write_file_create_new_refuses_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("exists.txt");
        fs::write(&path, "old").unwrap();
        let guard = guard(dir.path());

        let call = ToolCall::new(WRITE_FILE)
            .with_arg("path", arg(&path))
            .with_arg("content", "new")
            .with_arg("mode", "create_new");
        let err = WriteFileInvocation::build(&call, &guard).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
    }

    #[tokio::test]
    async fn test_write_file_cancelled_leaves_original() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kept.txt");
        fs::write(&path, "original").unwrap();
        let guard = guard(dir.path());

        let call = ToolCall::new(WRITE_FILE)
            .with_arg("path", arg(&path))
            .with_arg("content", "replacement");
        let invocation = WriteFileInvocation::build(&call, &guard).unwrap();

        let token = CancellationToken::new();
        token.cancel();
        let result = invocation.run(&token).await;

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().kind, ErrorKind::Cancelled);
        // Pre-write content intact, never truncated
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }

    #[tokio::test]
    async fn test_write_atomic_cancel_mid_stream_leaves_original() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("streamed.txt");
        fs::write(&path, "original").unwrap();

        // Token cancelled before the second chunk: > WRITE_CHUNK bytes
        let big = vec![b'x'; WRITE_CHUNK + 1];
        let token = CancellationToken::new();
        token.cancel();

        let err = write_atomic(&path, &big, &token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Cancelled);
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");

        // No temp litter left behind
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
