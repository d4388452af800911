//! Deployment phases
//!
//! A deployment request walks `Generating → Filtering → Committing →
//! Publishing → Succeeded`; any phase may instead end in `Failed`.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeployPhase {
    Generating,
    Filtering,
    Committing,
    Publishing,
    Succeeded,
    Failed,
}

impl DeployPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployPhase::Generating => "GENERATING",
            DeployPhase::Filtering => "FILTERING",
            DeployPhase::Committing => "COMMITTING",
            DeployPhase::Publishing => "PUBLISHING",
            DeployPhase::Succeeded => "SUCCEEDED",
            DeployPhase::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DeployPhase::Succeeded | DeployPhase::Failed)
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(&self, next: DeployPhase) -> bool {
        use DeployPhase::*;
        match (self, next) {
            (Succeeded | Failed, _) => false,
            (_, Failed) => true,
            (Generating, Filtering)
            | (Filtering, Committing)
            | (Committing, Publishing)
            | (Publishing, Succeeded) => true,
            // dry run
            (Filtering, Succeeded) => true,
            _ => false,
        }
    }
}

impl fmt::Display for DeployPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
