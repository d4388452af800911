//! Deploy errors
//!
//! Every failure carries the phase it happened in, the branch and the dry-run
//! flag so a caller can decide on a manual retry.

use thiserror::Error;

use crate::domain::policies::FilterRule;
use crate::domain::ports::{HostingError, LockError, ProjectSourceError, SourceControlError};
use crate::domain::services::GenerationError;
use crate::domain::value_objects::DeployPhase;

/// What went wrong.
#[derive(Error, Debug)]
pub enum DeployFailure {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Project(#[from] ProjectSourceError),

    #[error(transparent)]
    SourceControl(#[from] SourceControlError),

    #[error(transparent)]
    Hosting(#[from] HostingError),

    #[error(transparent)]
    Lock(#[from] LockError),

    /// A preview tried to write to the production branch.
    #[error("preview deploys may not target the production branch '{branch}'")]
    Ownership { branch: String },

    /// The production filter would drop a file the generator produced, which
    /// leaves a page half-published. Usually a page key that collides with an
    /// editor or deploy path.
    #[error("generated file '{path}' would be excluded from production ({rule}): {reason}")]
    GeneratedFileExcluded {
        path: String,
        rule: FilterRule,
        reason: String,
    },

    #[error("{0}")]
    Configuration(String),
}

/// A failed deployment request.
#[derive(Error, Debug)]
#[error("deploy to '{branch}' failed during {phase}{}: {cause}", dry_run_note(.dry_run))]
pub struct DeployError {
    pub phase: DeployPhase,
    pub branch: String,
    pub dry_run: bool,
    /// Commit left on the branch when publishing failed after committing
    pub commit_id: Option<String>,
    #[source]
    pub cause: DeployFailure,
}

fn dry_run_note(dry_run: &bool) -> &'static str {
    if *dry_run {
        " (dry run)"
    } else {
        ""
    }
}

impl DeployError {
    /// Failure from the upstream source-control or hosting service.
    pub fn is_transport(&self) -> bool {
        matches!(
            self.cause,
            DeployFailure::SourceControl(_) | DeployFailure::Hosting(_)
        )
    }
}
