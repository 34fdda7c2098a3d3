//! Infrastructure layer for corral
//!
//! This crate contains the adapters that implement the ports defined in
//! the application layer: the path guard, the concrete tools, the tool
//! registry, JSON Schema declaration export, configuration loading, and
//! the JSONL invocation audit logger.

pub mod config;
pub mod logging;
pub mod tools;
pub mod workspace;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, FileConfig, FileLimitsConfig, FileShellConfig};
pub use logging::JsonlInvocationLogger;
pub use tools::{
    JsonSchemaToolConverter, PathLocks, ShellPolicy, ToolInvocation, ToolRegistry,
    default_tool_spec, read_only_tool_spec,
};
pub use workspace::PathGuard;
