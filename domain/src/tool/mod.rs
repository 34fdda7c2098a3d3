//! Tool domain module
//!
//! Core abstractions for the **tool execution framework** — how an external
//! reasoning agent acts on a project directory (file I/O, directory listing,
//! content search, shell execution) in a validated, boundary-confined manner.
//!
//! # Overview
//!
//! Every tool is defined by a [`ToolDefinition`] (name, parameter schema,
//! capability class), requested via a [`ToolCall`] (untrusted, loosely-typed
//! arguments straight from a model's function-call output), and answered
//! with a [`ToolResult`] carrying a typed payload or a single-kind error.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (definitions)│    │ (untrusted)  │    │ (data, never │
//! └──────┬───────┘    └──────────────┘    │  exceptions) │
//!        │                                └──────────────┘
//!        └─ "read_file" → ToolDefinition
//! ```
//!
//! # Capability-Based Policy
//!
//! Each tool carries a [`Capability`](entities::Capability) used for policy,
//! not dispatch:
//!
//! | Capability | Examples | Policy |
//! |------------|----------|--------|
//! | read/list/search | `read_file`, `list_directory`, `search_file_content` | Run fully concurrently |
//! | write | `write_file`, `replace` | Serialized per canonical target path |
//! | execute | `run_shell_command` | Denylist-gated, process-group cancellation |
//!
//! # Architecture
//!
//! The tool domain follows the onion layering:
//!
//! - **Domain** (this module): pure definitions and the validation rules,
//!   no I/O
//! - **Application** (`ToolExecutorPort`): port traits for invocation and
//!   declaration export
//! - **Infrastructure** (`ToolRegistry`): concrete execution with the path
//!   guard, per-path write locks, and cancellation

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{Capability, ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{
    DirEntry, EntryKind, ErrorKind, SearchMatch, ToolError, ToolPayload, ToolResult,
    ToolResultMetadata,
};
