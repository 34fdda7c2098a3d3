//! Tool domain value objects — immutable result and error types
//!
//! These types form the **output side** of the tool pipeline. Every
//! invocation produces a [`ToolResult`] carrying either a typed
//! [`ToolPayload`] or a [`ToolError`] with exactly one [`ErrorKind`],
//! plus [`ToolResultMetadata`] (timing, byte counts, paths).
//!
//! Error kinds drive the agent loop's **retry strategy**: kinds the model
//! can correct by changing its arguments are retryable, everything else
//! terminates the attempt.

use serde::{Deserialize, Serialize};

/// Flat error taxonomy for tool execution.
///
/// Exactly one kind per failure. The taxonomy is deliberately flat — the
/// agent loop pattern-matches on it to decide whether to retry with
/// corrected arguments, surface the message, or abort.
///
/// | Kind | Retryable? | Meaning |
/// |------|-----------|---------|
/// | `Validation` | Yes | Bad/missing/unknown argument, unknown tool |
/// | `PathOutsideWorkspace` | No | Boundary violation (refused pre-effect) |
/// | `NotFound` | Yes | File or directory absent |
/// | `PermissionDenied` | No | OS denied access |
/// | `AlreadyExists` | Yes | Target exists in a non-overwrite write mode |
/// | `PatternNotFound` | Yes | Search/replace target absent or ambiguous |
/// | `ProcessBlocked` | No | Shell command matched the denylist |
/// | `Cancelled` | No | Cooperative cancellation observed |
/// | `Io` | No | Underlying OS failure not covered above |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    PathOutsideWorkspace,
    NotFound,
    PermissionDenied,
    AlreadyExists,
    PatternNotFound,
    ProcessBlocked,
    Cancelled,
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::PathOutsideWorkspace => "path_outside_workspace",
            ErrorKind::NotFound => "not_found",
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::PatternNotFound => "pattern_not_found",
            ErrorKind::ProcessBlocked => "process_blocked",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Io => "io",
        }
    }

    /// Whether the agent loop may retry after correcting its arguments
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Validation
                | ErrorKind::NotFound
                | ErrorKind::AlreadyExists
                | ErrorKind::PatternNotFound
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error that occurred during tool validation or execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolError {
    /// Which failure class this is
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Additional context (offending path, pattern, command)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ToolError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    // Common constructors
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn outside_workspace(path: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::PathOutsideWorkspace,
            format!("Path is outside the workspace: {}", path.into()),
        )
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::NotFound,
            format!("Not found: {}", resource.into()),
        )
    }

    pub fn permission_denied(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::PermissionDenied,
            format!("Permission denied: {}", resource.into()),
        )
    }

    pub fn already_exists(path: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::AlreadyExists,
            format!("Target already exists: {}", path.into()),
        )
    }

    pub fn pattern_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PatternNotFound, message)
    }

    pub fn process_blocked(command: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::ProcessBlocked,
            format!("Command blocked by policy: {}", command.into()),
        )
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "Operation cancelled")
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    /// Re-express an OS error as the matching taxonomy kind.
    pub fn from_io(err: &std::io::Error, resource: impl Into<String>) -> Self {
        let resource = resource.into();
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(resource),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(resource),
            std::io::ErrorKind::AlreadyExists => Self::already_exists(resource),
            _ => Self::io(format!("{}: {}", resource, err)),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(context) = &self.context {
            write!(f, " ({})", context)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Kind tag for a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
}

impl EntryKind {
    pub fn as_str(&self) -> &str {
        match self {
            EntryKind::File => "file",
            EntryKind::Dir => "dir",
            EntryKind::Symlink => "symlink",
        }
    }
}

/// One entry of a directory listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// One content-search hit: file, line number (1-based), matched line text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMatch {
    pub path: String,
    pub line: u64,
    pub text: String,
}

/// Typed success payload, shaped by the tool's capability class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolPayload {
    /// read_file: file content with an explicit binary flag. Binary files
    /// carry no text — they are flagged, never decoded.
    FileContent {
        path: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        binary: bool,
        size: u64,
        truncated: bool,
    },
    /// list_directory: tagged entries sorted by name
    Listing {
        path: String,
        entries: Vec<DirEntry>,
    },
    /// search_file_content: match records
    Matches {
        matches: Vec<SearchMatch>,
        truncated: bool,
    },
    /// write_file: confirmation
    Written {
        path: String,
        bytes: usize,
        created: bool,
    },
    /// replace: confirmation
    Replaced { path: String, replacements: usize },
    /// run_shell_command: captured output and exit code
    Command {
        command: String,
        exit_code: i32,
        output: String,
        truncated: bool,
    },
}

impl ToolPayload {
    /// Render the payload as model-facing text for the agent loop.
    pub fn render(&self) -> String {
        match self {
            ToolPayload::FileContent {
                path,
                text,
                binary,
                size,
                truncated,
            } => {
                if *binary {
                    format!("{} is a binary file ({} bytes), content not shown", path, size)
                } else {
                    let mut out = text.clone().unwrap_or_default();
                    if *truncated {
                        out.push_str("\n... (content truncated)");
                    }
                    out
                }
            }
            ToolPayload::Listing { path, entries } => {
                if entries.is_empty() {
                    format!("{} is empty", path)
                } else {
                    entries
                        .iter()
                        .map(|e| format!("[{}] {}", e.kind.as_str(), e.name))
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            ToolPayload::Matches { matches, truncated } => {
                if matches.is_empty() {
                    "No matches found".to_string()
                } else {
                    let mut out = matches
                        .iter()
                        .map(|m| format!("{}:{}: {}", m.path, m.line, m.text))
                        .collect::<Vec<_>>()
                        .join("\n");
                    if *truncated {
                        out.push_str("\n... (matches truncated)");
                    }
                    out
                }
            }
            ToolPayload::Written {
                path,
                bytes,
                created,
            } => {
                let verb = if *created { "Created" } else { "Wrote" };
                format!("{} {} ({} bytes)", verb, path, bytes)
            }
            ToolPayload::Replaced { path, replacements } => {
                format!("Replaced {} occurrence(s) in {}", replacements, path)
            }
            ToolPayload::Command {
                exit_code,
                output,
                truncated,
                ..
            } => {
                let mut out = if *exit_code == 0 {
                    output.clone()
                } else {
                    format!("Command exited with code {}\n{}", exit_code, output)
                };
                if *truncated {
                    out.push_str("\n... (output truncated)");
                }
                out
            }
        }
    }
}

/// Result of a tool invocation, carrying payload or error information.
///
/// Produced by tool executors and consumed by the agent loop. Never thrown
/// past the registry boundary — always returned as data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was invoked
    pub tool_name: String,
    /// Whether the invocation was successful
    pub success: bool,
    /// Typed payload (for successful invocation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<ToolPayload>,
    /// Error information (for failed invocation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    /// Metadata about the execution
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

/// Structured metadata about tool execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Duration of execution in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Number of bytes processed/returned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    /// For file operations: the affected path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// For command execution: exit code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// For search operations: number of matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_count: Option<usize>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, payload: ToolPayload) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            payload: Some(payload),
            error: None,
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            payload: None,
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: ToolResultMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn payload(&self) -> Option<&ToolPayload> {
        self.payload.as_ref()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Model-facing text form of the result.
    pub fn render(&self) -> String {
        match (&self.payload, &self.error) {
            (Some(payload), _) => payload.render(),
            (None, Some(error)) => error.to_string(),
            (None, None) => String::new(),
        }
    }
}
