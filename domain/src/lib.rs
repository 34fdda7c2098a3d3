//! Domain layer for corral
//!
//! This crate contains the core entities and value objects of the tool
//! execution framework. It has no dependencies on infrastructure or
//! presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Workspace confinement
//!
//! Every tool side effect must resolve to a path at or beneath a single
//! [`WorkspaceBoundary`]. The boundary rule lives here; the resolving path
//! guard (symlinks, `..`) is an infrastructure adapter.
//!
//! ## Parse, don't validate
//!
//! Untrusted [`ToolCall`] arguments are converted into strongly-typed
//! invocations exactly once, at build time. Nothing unvalidated reaches an
//! effectful operation.

pub mod tool;
pub mod util;
pub mod workspace;

// Re-export commonly used types
pub use tool::{
    entities::{Capability, ToolCall, ToolDefinition, ToolParameter, ToolSpec},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{
        DirEntry, EntryKind, ErrorKind, SearchMatch, ToolError, ToolPayload, ToolResult,
        ToolResultMetadata,
    },
};
pub use workspace::WorkspaceBoundary;
