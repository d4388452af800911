//! BranchLock port - per-branch serialization of commit and publish
//!
//! Two deployments to the same branch must never interleave. Holding the
//! guard returned by [`BranchLocker::lock`] grants exclusive use of the branch
//! until it is dropped.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LockError {
    #[error("failed to lock branch '{branch}': {message}")]
    Failed { branch: String, message: String },
}

/// Held while a deployment commits and publishes; released on drop.
pub trait BranchGuard: Send {
    fn branch(&self) -> &str;
}

pub trait BranchLocker: Send + Sync {
    /// Block until `branch` is free, then take it.
    fn lock(&self, branch: &str) -> Result<Box<dyn BranchGuard + '_>, LockError>;
}
