//! Invocation audit logging port.
//!
//! Fire-and-forget structured events for every tool invocation. Adapters
//! decide persistence (JSONL file, stderr, nothing); a logging failure must
//! never fail the invocation itself.

use serde_json::Value;

/// One audit event with a type tag and an arbitrary JSON payload.
#[derive(Debug, Clone)]
pub struct InvocationEvent {
    /// Event type (e.g. "invocation_started", "invocation_finished")
    pub event_type: String,
    /// Structured payload merged into the logged record
    pub payload: Value,
}

impl InvocationEvent {
    pub fn new(event_type: impl Into<String>, payload: Value) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
        }
    }
}

/// Port for recording tool invocation events.
pub trait InvocationLogger: Send + Sync {
    /// Record one event. Must not block the invocation path on failure.
    fn log(&self, event: InvocationEvent);
}

/// Logger that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopInvocationLogger;

impl InvocationLogger for NoopInvocationLogger {
    fn log(&self, _event: InvocationEvent) {}
}
