//! Tool implementations for the agent-facing execution framework
//!
//! Each tool module follows the same shape: a name constant, a
//! `*_definition()` describing its parameter schema, a typed invocation
//! struct with `build` (all validation, no effects) and an async `run`
//! (the effect, cancellation-aware). The [`ToolRegistry`] wires them
//! together behind the application layer's `ToolExecutorPort`.

pub mod dir;
pub mod edit;
pub mod file;
pub mod search;
pub mod shell;

mod invocation;
mod locks;
mod registry;
mod schema;

pub use invocation::ToolInvocation;
pub use locks::PathLocks;
pub use registry::ToolRegistry;
pub use schema::JsonSchemaToolConverter;
pub use shell::ShellPolicy;

use corral_domain::tool::entities::ToolSpec;

/// Create the default tool specification with all available tools
pub fn default_tool_spec() -> ToolSpec {
    ToolSpec::new()
        .register(file::read_file_definition())
        .register(file::write_file_definition())
        .register(dir::list_directory_definition())
        .register(search::search_file_content_definition())
        .register(edit::replace_definition())
        .register(shell::run_shell_command_definition())
}

/// Get definitions for non-mutating tools only
pub fn read_only_tool_spec() -> ToolSpec {
    ToolSpec::new()
        .register(file::read_file_definition())
        .register(dir::list_directory_definition())
        .register(search::search_file_content_definition())
}
