//! Shell execution tool: run_shell_command
//!
//! Commands run with the working directory pinned to the workspace root, in
//! their own process group so cancellation kills the whole tree. A denylist
//! of destructive patterns is checked before anything is spawned — it is a
//! guardrail against obviously destructive commands, not a sandbox.

use crate::workspace::PathGuard;
use corral_application::config::ExecutionLimits;
use corral_domain::tool::{
    entities::{Capability, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolPayload, ToolResult, ToolResultMetadata},
};
use corral_domain::util::cap_output;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Child;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Tool name constant
pub const RUN_SHELL_COMMAND: &str = "run_shell_command";

/// Destructive command patterns refused by default. Matched as substrings
/// of the whitespace-normalized, lowercased command line.
const DEFAULT_DENYLIST: &[&str] = &[
    "rm -rf /",
    "rm -fr /",
    "rm -rf ~",
    "rm -rf *",
    "mkfs",
    "dd if=",
    "of=/dev/",
    ":(){",
    "shutdown",
    "reboot",
    "poweroff",
    "sudo ",
    "chmod -r 777 /",
    "init 0",
    "init 6",
];

/// Policy for shell execution: enabled flag plus the denylist.
///
/// Config may extend the denylist but never shrink it below the defaults.
#[derive(Debug, Clone)]
pub struct ShellPolicy {
    pub enabled: bool,
    denylist: Vec<String>,
}

impl ShellPolicy {
    pub fn new() -> Self {
        Self {
            enabled: true,
            denylist: DEFAULT_DENYLIST.iter().map(|p| normalize(p)).collect(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            denylist: Vec::new(),
        }
    }

    /// Add extra denied patterns on top of the defaults.
    pub fn with_extra_denied(
        mut self,
        patterns: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        for pattern in patterns {
            self.denylist.push(normalize(pattern.as_ref()));
        }
        self
    }

    /// Return the denylist pattern the command matches, if any.
    pub fn blocked_by(&self, command: &str) -> Option<&str> {
        let normalized = normalize(command);
        self.denylist
            .iter()
            .find(|pattern| normalized.contains(pattern.as_str()))
            .map(|s| s.as_str())
    }
}

impl Default for ShellPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapse whitespace and lowercase for denylist matching.
fn normalize(command: &str) -> String {
    command
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Get the tool definition for run_shell_command
pub fn run_shell_command_definition() -> ToolDefinition {
    ToolDefinition::new(
        RUN_SHELL_COMMAND,
        "Execute a shell command in the workspace root and capture its output. Destructive commands are refused.",
        Capability::Execute,
    )
    .with_parameter(
        ToolParameter::new("command", "The command to execute", true)
            .with_type("string")
            .with_max_length(8 * 1024),
    )
}

/// Validated, ready-to-run run_shell_command invocation
#[derive(Debug, Clone)]
pub struct ShellInvocation {
    command: String,
    workdir: PathBuf,
}

impl ShellInvocation {
    pub fn build(
        call: &ToolCall,
        guard: &PathGuard,
        policy: &ShellPolicy,
    ) -> Result<Self, ToolError> {
        if !policy.enabled {
            return Err(ToolError::process_blocked("shell execution is disabled"));
        }

        let command = call
            .require_string("command")
            .map_err(ToolError::validation)?;
        if command.trim().is_empty() {
            return Err(ToolError::validation("command must not be empty"));
        }

        // Refused before any side effect occurs
        if let Some(pattern) = policy.blocked_by(command) {
            warn!(command, pattern, "Command refused by denylist");
            return Err(ToolError::process_blocked(command).with_context(pattern.to_string()));
        }

        Ok(Self {
            command: command.to_string(),
            workdir: guard.root().to_path_buf(),
        })
    }

    pub async fn run(self, token: &CancellationToken, limits: &ExecutionLimits) -> ToolResult {
        if token.is_cancelled() {
            return ToolResult::failure(RUN_SHELL_COMMAND, ToolError::cancelled());
        }

        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = tokio::process::Command::new("cmd");
            c.args(["/C", &self.command]);
            c
        } else {
            let mut c = tokio::process::Command::new("sh");
            c.args(["-c", &self.command]);
            c
        };
        cmd.current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = match cmd.spawn() {
            Ok(c) => c,
            Err(e) => {
                return ToolResult::failure(
                    RUN_SHELL_COMMAND,
                    ToolError::io(format!("Failed to spawn command: {}", e)),
                );
            }
        };
        let pid = child.id();

        // Drain pipes concurrently with the wait so a chatty child cannot
        // deadlock on a full pipe buffer.
        let cap = limits.max_output_bytes;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let out_task = tokio::spawn(read_capped(stdout, cap));
        let err_task = tokio::spawn(read_capped(stderr, cap));

        // Branch bodies must not touch the child while its wait future is
        // alive; select yields the outcome and the child is handled after.
        let waited = tokio::select! {
            status = child.wait() => Some(status),
            _ = token.cancelled() => None,
        };

        let status = match waited {
            Some(Ok(status)) => status,
            Some(Err(e)) => {
                return ToolResult::failure(
                    RUN_SHELL_COMMAND,
                    ToolError::io(format!("Failed to wait for command: {}", e)),
                );
            }
            None => {
                debug!(command = %self.command, "Cancelling shell command");
                kill_process_group(pid, &mut child).await;
                out_task.abort();
                err_task.abort();
                return ToolResult::failure(RUN_SHELL_COMMAND, ToolError::cancelled());
            }
        };

        let (stdout_buf, out_truncated) = out_task.await.unwrap_or((Vec::new(), false));
        let (stderr_buf, err_truncated) = err_task.await.unwrap_or((Vec::new(), false));

        let stdout = String::from_utf8_lossy(&stdout_buf);
        let stderr = String::from_utf8_lossy(&stderr_buf);
        let mut combined = String::new();
        if !stdout.is_empty() {
            combined.push_str(&stdout);
        }
        if !stderr.is_empty() {
            if !combined.is_empty() {
                combined.push_str("\n--- stderr ---\n");
            }
            combined.push_str(&stderr);
        }
        let (output, combined_truncated) = cap_output(&combined, cap);
        let truncated = out_truncated || err_truncated || combined_truncated;

        let exit_code = status.code().unwrap_or(-1);
        let bytes = output.len();

        // A non-zero exit is still a successful capture; the agent decides
        // what to do with the exit code.
        ToolResult::success(
            RUN_SHELL_COMMAND,
            ToolPayload::Command {
                command: self.command,
                exit_code,
                output,
                truncated,
            },
        )
        .with_metadata(ToolResultMetadata {
            bytes: Some(bytes),
            exit_code: Some(exit_code),
            ..Default::default()
        })
    }
}

/// Read a pipe to EOF, keeping at most `cap` bytes and reporting whether
/// anything was dropped.
async fn read_capped<R>(reader: Option<R>, cap: usize) -> (Vec<u8>, bool)
where
    R: tokio::io::AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return (Vec::new(), false);
    };
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    let mut truncated = false;
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                if buf.len() < cap {
                    let take = n.min(cap - buf.len());
                    buf.extend_from_slice(&chunk[..take]);
                    if take < n {
                        truncated = true;
                    }
                } else {
                    truncated = true;
                }
            }
            Err(_) => break,
        }
    }
    (buf, truncated)
}

/// Kill the child's whole process group, then reap the child.
async fn kill_process_group(pid: Option<u32>, child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = pid {
        // The child is its own group leader (process_group(0))
        unsafe {
            libc::killpg(pid as libc::pid_t, libc::SIGKILL);
        }
    }
    #[cfg(not(unix))]
    let _ = pid;
    let _ = child.kill().await;
}
