//! Deploy Event Port
//!
//! Every phase transition of a deploy is reported here, so outer surfaces
//! can stream progress without knowing the orchestrator.

use crate::domain::policies::FilterRule;
use crate::domain::value_objects::{DeployPhase, DeployTarget};

/// Event emitted during deploy operations
#[derive(Debug, Clone, PartialEq)]
pub enum DeployEvent {
    /// Deploy request accepted
    Started {
        target: DeployTarget,
        branch: String,
        dry_run: bool,
        page_count: usize,
    },

    /// The state machine moved to a new phase
    PhaseEntered { phase: DeployPhase },

    /// Generation completed
    Generated { file_count: usize },

    /// A candidate was kept out of the deployment (or would be, for previews)
    FileExcluded {
        path: String,
        rule: FilterRule,
        reason: String,
    },

    /// Filtering completed
    Filtered {
        included: usize,
        excluded: usize,
        fingerprint: String,
    },

    /// Commit plan computed against the branch head
    Planned {
        write_count: usize,
        skip_count: usize,
        delete_count: usize,
    },

    /// A commit was created
    Committed { commit_id: String, file_count: usize },

    /// Nothing changed; no commit was created
    CommitSkipped { head: Option<String> },

    /// Hosting deployment created or updated
    Published { deployment_id: String, url: String },

    /// Deploy failed in `phase`
    Failed { phase: DeployPhase, error: String },

    /// Deploy reached a terminal success
    Completed {
        commit_id: Option<String>,
        deployment_id: Option<String>,
        dry_run: bool,
    },
}

/// Receiver of deploy progress.
///
/// `TracingEventSink` logs, `JsonEventSink` streams NDJSON and
/// `NoopEventSink` drops everything.
pub trait DeployEventSink: Send + Sync {
    /// Handle a deploy event
    fn on_event(&self, event: DeployEvent);

    /// Whether per-file events (exclusions) are worth emitting
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Test event sink that records all events
    struct RecordingEventSink {
        events: Arc<Mutex<Vec<DeployEvent>>>,
    }

    impl DeployEventSink for RecordingEventSink {
        fn on_event(&self, event: DeployEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn recording_sink_captures_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingEventSink {
            events: events.clone(),
        };

        sink.on_event(DeployEvent::PhaseEntered {
            phase: DeployPhase::Generating,
        });
        sink.on_event(DeployEvent::CommitSkipped {
            head: Some("abc".into()),
        });

        let recorded = events.lock().unwrap();
        assert_eq!(recorded.len(), 2);
        assert!(sink.wants_detailed_events());
    }

    #[test]
    fn noop_sink_wants_no_details() {
        let sink = NoopEventSink;
        assert!(!sink.wants_detailed_events());
    }
}
