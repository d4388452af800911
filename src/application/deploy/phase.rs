//! Phase tracking for one deployment request

use tracing::{debug, error};

use crate::domain::ports::{DeployEvent, DeployEventSink};
use crate::domain::value_objects::DeployPhase;

use super::error::{DeployError, DeployFailure};

/// Walks the deploy state machine and reports every transition.
pub(crate) struct PhaseTracker<'a> {
    phase: DeployPhase,
    branch: String,
    dry_run: bool,
    commit_id: Option<String>,
    sink: &'a dyn DeployEventSink,
}

impl<'a> PhaseTracker<'a> {
    pub(crate) fn start(
        phase: DeployPhase,
        branch: &str,
        dry_run: bool,
        sink: &'a dyn DeployEventSink,
    ) -> Self {
        debug!(%phase, branch, "deploy phase");
        sink.on_event(DeployEvent::PhaseEntered { phase });
        Self {
            phase,
            branch: branch.to_string(),
            dry_run,
            commit_id: None,
            sink,
        }
    }

    pub(crate) fn phase(&self) -> DeployPhase {
        self.phase
    }

    pub(crate) fn advance(&mut self, next: DeployPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal deploy transition {} -> {}",
            self.phase,
            next
        );
        debug!(from = %self.phase, to = %next, branch = %self.branch, "deploy phase");
        self.phase = next;
        self.sink.on_event(DeployEvent::PhaseEntered { phase: next });
    }

    /// Remember the commit so a later failure reports it as retained.
    pub(crate) fn record_commit(&mut self, commit_id: &str) {
        self.commit_id = Some(commit_id.to_string());
    }

    /// Move to `Failed` and build the error for the phase that failed.
    pub(crate) fn fail(&mut self, cause: impl Into<DeployFailure>) -> DeployError {
        let cause = cause.into();
        let failed_in = self.phase;
        error!(
            phase = %failed_in,
            branch = %self.branch,
            dry_run = self.dry_run,
            commit = self.commit_id.as_deref().unwrap_or("none"),
            error = %cause,
            "deploy failed"
        );
        self.sink.on_event(DeployEvent::Failed {
            phase: failed_in,
            error: cause.to_string(),
        });
        self.phase = DeployPhase::Failed;
        DeployError {
            phase: failed_in,
            branch: self.branch.clone(),
            dry_run: self.dry_run,
            commit_id: self.commit_id.clone(),
            cause,
        }
    }
}
