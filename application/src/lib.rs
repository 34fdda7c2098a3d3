//! Application layer for corral
//!
//! This crate contains the port definitions and execution limits that sit
//! between the domain model and the infrastructure adapters. It depends
//! only on the domain layer.

pub mod config;
pub mod ports;

// Re-export commonly used types
pub use config::ExecutionLimits;
pub use ports::{
    invocation_logger::{InvocationEvent, InvocationLogger, NoopInvocationLogger},
    tool_executor::ToolExecutorPort,
    tool_schema::ToolSchemaPort,
};
