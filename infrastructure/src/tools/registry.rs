//! Tool Registry
//!
//! The [`ToolRegistry`] owns the mapping from tool name to definition for
//! one workspace and is the sole entry point an agent uses to discover and
//! invoke tools. `invoke` composes lookup → structural validation → build →
//! execute; every failure mode comes back as a [`ToolResult`], never as an
//! unwound error.
//!
//! # Usage
//!
//! ```ignore
//! use corral_infrastructure::tools::ToolRegistry;
//!
//! let registry = ToolRegistry::with_builtins("/path/to/workspace")?;
//!
//! let call = ToolCall::new("read_file").with_arg("path", "/path/to/workspace/README.md");
//! let result = registry.invoke(&call, &CancellationToken::new()).await;
//! ```
//!
//! # Concurrency
//!
//! Read/list/search invocations run fully concurrently. Write-class
//! invocations targeting the same resolved path are serialized through a
//! per-canonical-path mutex owned by this registry; writes to different
//! paths proceed independently. The registry holds no session state and is
//! reusable across agent turns.
//!
//! # Cancellation and timeouts
//!
//! One [`CancellationToken`] is threaded through `invoke` → `execute`. A
//! configured command timeout is an automatic cancellation trigger on a
//! child token, not a separate mechanism.

use crate::tools::invocation::ToolInvocation;
use crate::tools::locks::PathLocks;
use crate::tools::schema::JsonSchemaToolConverter;
use crate::tools::shell::{self, ShellPolicy};
use crate::workspace::PathGuard;
use corral_application::config::ExecutionLimits;
use corral_application::ports::invocation_logger::{
    InvocationEvent, InvocationLogger, NoopInvocationLogger,
};
use corral_application::ports::tool_executor::ToolExecutorPort;
use corral_application::ports::tool_schema::ToolSchemaPort;
use corral_domain::tool::{
    entities::{Capability, ToolCall, ToolDefinition, ToolSpec},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolResult},
};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Registry of tools for one workspace.
pub struct ToolRegistry {
    spec: ToolSpec,
    guard: PathGuard,
    locks: PathLocks,
    limits: ExecutionLimits,
    shell_policy: ShellPolicy,
    logger: Arc<dyn InvocationLogger>,
}

impl ToolRegistry {
    /// Create an empty registry rooted at `root`.
    ///
    /// The root is canonicalized once here and fixed for the registry's
    /// lifetime.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, ToolError> {
        Ok(Self {
            spec: ToolSpec::new(),
            guard: PathGuard::new(root)?,
            locks: PathLocks::new(),
            limits: ExecutionLimits::default(),
            shell_policy: ShellPolicy::new(),
            logger: Arc::new(NoopInvocationLogger),
        })
    }

    /// Create a registry with all builtin tools.
    pub fn with_builtins(root: impl AsRef<Path>) -> Result<Self, ToolError> {
        let mut registry = Self::new(root)?;
        for definition in super::default_tool_spec().all() {
            registry.register(definition.clone())?;
        }
        Ok(registry)
    }

    /// Create a registry with only non-mutating tools.
    ///
    /// Used for agent phases that must not modify the workspace.
    pub fn read_only(root: impl AsRef<Path>) -> Result<Self, ToolError> {
        let mut registry = Self::new(root)?;
        for definition in super::read_only_tool_spec().all() {
            registry.register(definition.clone())?;
        }
        Ok(registry)
    }

    /// Set the execution limits.
    pub fn with_limits(mut self, limits: ExecutionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the shell policy. A disabled policy unregisters the shell tool.
    pub fn with_shell_policy(mut self, policy: ShellPolicy) -> Self {
        if !policy.enabled {
            let mut spec = ToolSpec::new();
            for definition in self.spec.all() {
                if definition.name != shell::RUN_SHELL_COMMAND {
                    spec = spec.register(definition.clone());
                }
            }
            self.spec = spec;
        }
        self.shell_policy = policy;
        self
    }

    /// Set the invocation audit logger.
    pub fn with_logger(mut self, logger: Arc<dyn InvocationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Register a tool definition.
    ///
    /// Fails if the name is already registered — no silent overwrite.
    pub fn register(&mut self, definition: ToolDefinition) -> Result<(), ToolError> {
        if self.spec.contains(&definition.name) {
            return Err(ToolError::validation(format!(
                "Tool '{}' is already registered",
                definition.name
            )));
        }
        debug!(tool = %definition.name, capability = %definition.capability, "Registered tool");
        self.spec = std::mem::take(&mut self.spec).register(definition);
        Ok(())
    }

    /// Look up a tool definition by name.
    pub fn lookup(&self, name: &str) -> Option<&ToolDefinition> {
        self.spec.get(name)
    }

    /// The workspace root this registry is confined to.
    pub fn root(&self) -> &Path {
        self.guard.root()
    }

    /// Declaration export for a function-calling model API: sorted
    /// `{name, description, input_schema}` records. Pure data projection.
    pub fn declarations(&self) -> Vec<serde_json::Value> {
        JsonSchemaToolConverter.all_tools_schema(&self.spec)
    }

    /// Declarations for the non-mutating subset only.
    pub fn read_only_declarations(&self) -> Vec<serde_json::Value> {
        JsonSchemaToolConverter.read_only_tools_schema(&self.spec)
    }

    async fn invoke_inner(&self, call: &ToolCall, token: &CancellationToken) -> ToolResult {
        // "Unknown tool" is a structured validation failure the agent can
        // distinguish from a tool that ran and found nothing.
        let Some(definition) = self.spec.get(&call.tool_name) else {
            return ToolResult::failure(
                &call.tool_name,
                ToolError::validation(format!("Unknown tool: {}", call.tool_name)),
            );
        };

        if token.is_cancelled() {
            return ToolResult::failure(&call.tool_name, ToolError::cancelled());
        }

        if let Err(e) = DefaultToolValidator.validate(call, definition) {
            return ToolResult::failure(&call.tool_name, e);
        }

        let invocation = match ToolInvocation::build(call, &self.guard, &self.shell_policy) {
            Ok(invocation) => invocation,
            Err(e) => return ToolResult::failure(&call.tool_name, e),
        };

        // Timeout is an automatic cancellation trigger on a child token
        let exec_token = token.child_token();
        let timer = match (definition.capability, self.limits.command_timeout) {
            (Capability::Execute, Some(timeout)) => {
                let trigger = exec_token.clone();
                Some(tokio::spawn(async move {
                    tokio::time::sleep(timeout).await;
                    trigger.cancel();
                }))
            }
            _ => None,
        };

        let result = match invocation.write_target().map(Path::to_path_buf) {
            Some(path) => {
                let handle = self.locks.handle(&path);
                let _write_guard = handle.lock().await;
                invocation.execute(&exec_token, &self.limits).await
            }
            None => invocation.execute(&exec_token, &self.limits).await,
        };

        if let Some(timer) = timer {
            timer.abort();
        }
        result
    }
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn invoke(&self, call: &ToolCall, token: &CancellationToken) -> ToolResult {
        let start = Instant::now();
        self.logger.log(InvocationEvent::new(
            "invocation_started",
            serde_json::json!({
                "tool": call.tool_name,
                "arguments": call.arguments,
            }),
        ));

        let result = self
            .invoke_inner(call, token)
            .await
            .with_duration(start.elapsed().as_millis() as u64);

        debug!(
            tool = %call.tool_name,
            duration_ms = result.metadata.duration_ms.unwrap_or(0),
            success = result.is_success(),
            "Tool invocation finished"
        );
        self.logger.log(InvocationEvent::new(
            "invocation_finished",
            serde_json::json!({
                "tool": call.tool_name,
                "success": result.is_success(),
                "duration_ms": result.metadata.duration_ms,
                "error_kind": result.error().map(|e| e.kind.as_str()),
            }),
        ));

        result
    }
}
