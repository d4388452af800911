//! JSON Event Sink
//!
//! One JSON object per deploy event, newline-delimited, for scripts that
//! drive the CLI with `--json --events`.

use crate::domain::ports::{DeployEvent, DeployEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs one JSON object per line
pub struct JsonEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a JSON event sink writing to stderr, leaving stdout for the
    /// final result envelope
    pub fn stderr() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stderr())),
        }
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

/// JSON shape of one event.
pub fn event_to_json(event: &DeployEvent) -> serde_json::Value {
    match event {
        DeployEvent::Started {
            target,
            branch,
            dry_run,
            page_count,
        } => serde_json::json!({
            "event": "start",
            "command": "deploy",
            "target": target,
            "branch": branch,
            "dry_run": dry_run,
            "page_count": page_count,
        }),

        DeployEvent::PhaseEntered { phase } => serde_json::json!({
            "event": "phase",
            "phase": phase,
        }),

        DeployEvent::Generated { file_count } => serde_json::json!({
            "event": "generated",
            "file_count": file_count,
        }),

        DeployEvent::FileExcluded { path, rule, reason } => serde_json::json!({
            "event": "item_excluded",
            "path": path,
            "rule": rule,
            "reason": reason,
        }),

        DeployEvent::Filtered {
            included,
            excluded,
            fingerprint,
        } => serde_json::json!({
            "event": "filtered",
            "included": included,
            "excluded": excluded,
            "fingerprint": fingerprint,
        }),

        DeployEvent::Planned {
            write_count,
            skip_count,
            delete_count,
        } => serde_json::json!({
            "event": "planned",
            "write": write_count,
            "unchanged": skip_count,
            "delete": delete_count,
        }),

        DeployEvent::Committed {
            commit_id,
            file_count,
        } => serde_json::json!({
            "event": "committed",
            "commit": commit_id,
            "file_count": file_count,
        }),

        DeployEvent::CommitSkipped { head } => serde_json::json!({
            "event": "commit_skipped",
            "head": head,
        }),

        DeployEvent::Published { deployment_id, url } => serde_json::json!({
            "event": "published",
            "deployment": deployment_id,
            "url": url,
        }),

        DeployEvent::Failed { phase, error } => serde_json::json!({
            "event": "error",
            "phase": phase,
            "error": error,
        }),

        DeployEvent::Completed {
            commit_id,
            deployment_id,
            dry_run,
        } => serde_json::json!({
            "event": "complete",
            "command": "deploy",
            "status": "success",
            "commit": commit_id,
            "deployment": deployment_id,
            "dry_run": dry_run,
        }),
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: DeployEvent) {
        self.write_event(event_to_json(&event));
    }

    fn wants_detailed_events(&self) -> bool {
        true // JSON mode wants all events
    }
}
