//! Tool schema conversion port.
//!
//! Separates "which tools exist" (domain) from "how to serialize for a
//! model-calling API" (infrastructure). The domain layer defines
//! [`ToolDefinition`] and [`ToolSpec`]; this port handles the JSON Schema
//! declaration projection a function-calling API consumes. The projection
//! is pure data: it exposes name, description, and parameter schema — never
//! capability class or implementation detail.

use corral_domain::tool::entities::{ToolDefinition, ToolSpec};

/// Port for converting tool definitions to declaration format (JSON Schema).
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single tool definition to a provider-neutral declaration.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// Convert all tools to a declaration array (sorted by name).
    fn all_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value>;

    /// Convert non-mutating tools only to a declaration array (sorted by
    /// name), for agent phases that must not modify the workspace.
    fn read_only_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value>;
}
