//! Tracing Event Sink
//!
//! Turns deploy events into log lines for human-facing runs.

use tracing::{debug, error, info};

use crate::domain::ports::{DeployEvent, DeployEventSink};

/// Event sink that logs through `tracing`
pub struct TracingEventSink {
    detailed: bool,
}

impl TracingEventSink {
    pub fn new(detailed: bool) -> Self {
        Self { detailed }
    }
}

impl DeployEventSink for TracingEventSink {
    fn on_event(&self, event: DeployEvent) {
        match event {
            DeployEvent::Started {
                target,
                branch,
                dry_run,
                page_count,
            } => info!(%target, %branch, dry_run, pages = page_count, "deploy started"),
            DeployEvent::PhaseEntered { phase } => debug!(%phase, "phase"),
            DeployEvent::Generated { file_count } => debug!(files = file_count, "generated"),
            DeployEvent::FileExcluded { path, rule, reason } => {
                debug!(%path, %rule, %reason, "excluded")
            }
            DeployEvent::Filtered {
                included,
                excluded,
                fingerprint,
            } => info!(included, excluded, %fingerprint, "filtered"),
            DeployEvent::Planned {
                write_count,
                skip_count,
                delete_count,
            } => info!(
                write = write_count,
                unchanged = skip_count,
                delete = delete_count,
                "commit planned"
            ),
            DeployEvent::Committed {
                commit_id,
                file_count,
            } => info!(commit = %commit_id, files = file_count, "committed"),
            DeployEvent::CommitSkipped { head } => {
                info!(head = head.as_deref().unwrap_or("none"), "no changes, commit skipped")
            }
            DeployEvent::Published { deployment_id, url } => {
                info!(deployment = %deployment_id, %url, "published")
            }
            DeployEvent::Failed { phase, error } => error!(%phase, %error, "deploy failed"),
            DeployEvent::Completed {
                commit_id,
                deployment_id,
                dry_run,
            } => info!(
                commit = commit_id.as_deref().unwrap_or("none"),
                deployment = deployment_id.as_deref().unwrap_or("none"),
                dry_run,
                "deploy complete"
            ),
        }
    }

    fn wants_detailed_events(&self) -> bool {
        self.detailed
    }
}
