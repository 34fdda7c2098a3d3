//! Tool Executor port
//!
//! Defines the inbound interface the agent loop uses to discover and invoke
//! tools. Arguments arrive as loose JSON inside a [`ToolCall`] and are fully
//! validated behind this port; the cancellation token is an explicit
//! parameter on every invocation so behavior is identical across whatever
//! concurrency the host provides.

use async_trait::async_trait;
use corral_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolSpec},
    value_objects::ToolResult,
};
use tokio_util::sync::CancellationToken;

/// Port for tool discovery and invocation
///
/// The application layer depends on this trait; the concrete registry
/// (adapter) lives in the infrastructure layer.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn spec(&self) -> &ToolSpec;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.spec().get(name).is_some()
    }

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.spec().get(name)
    }

    /// Get names of all available tools
    fn available_tools(&self) -> Vec<&str> {
        self.spec().names().collect()
    }

    /// Invoke a tool call.
    ///
    /// Never panics and never returns a transport-level error: every
    /// failure mode is a [`ToolResult`] carrying a structured error the
    /// agent loop can pattern-match on. Cancelling the token makes any
    /// in-flight invocation stop at its next suspension point.
    async fn invoke(&self, call: &ToolCall, token: &CancellationToken) -> ToolResult;
}
