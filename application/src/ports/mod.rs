//! Application ports — interfaces between layers
//!
//! Ports are implemented by infrastructure adapters and consumed by the
//! (external) agent loop.

pub mod invocation_logger;
pub mod tool_executor;
pub mod tool_schema;

pub use invocation_logger::{InvocationEvent, InvocationLogger, NoopInvocationLogger};
pub use tool_executor::ToolExecutorPort;
pub use tool_schema::ToolSchemaPort;
