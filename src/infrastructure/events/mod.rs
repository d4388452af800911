//! Event Sink Implementations
//!
//! Provides concrete implementations of DeployEventSink:
//! - JsonEventSink: NDJSON output for CI/automation
//! - TracingEventSink: log lines through `tracing`

mod json;
mod log_sink;

pub use json::{event_to_json, JsonEventSink};
pub use log_sink::TracingEventSink;
