//! Per-branch locks
//!
//! Serializes committing and publishing per branch: an in-process set of held
//! branches (threads wait on a condvar) plus, when a lock directory is
//! configured, an advisory `fs2` file lock so separate processes on the same
//! machine serialize too.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Condvar, Mutex};

use fs2::FileExt;
use sha2::{Digest, Sha256};

use crate::domain::ports::{BranchGuard, BranchLocker, LockError};

/// Branch locker used by the orchestrator.
#[derive(Debug, Default)]
pub struct BranchLocks {
    dir: Option<PathBuf>,
    held: Mutex<HashSet<String>>,
    released: Condvar,
}

impl BranchLocks {
    /// In-process locking only.
    pub fn in_process() -> Self {
        Self::default()
    }

    /// In-process locking plus lock files under `dir`.
    pub fn with_lock_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            ..Self::default()
        }
    }

    pub fn lock_dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Lock file path for `branch`. Branch names may contain `/`, so the
    /// readable part is sanitized and a digest of the full name keeps
    /// `feature/a` and `feature_a` apart.
    pub fn lock_path(dir: &Path, branch: &str) -> PathBuf {
        let name: String = branch
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
            .collect();
        let digest = format!("{:x}", Sha256::digest(branch.as_bytes()));
        dir.join(format!("{}-{}.lock", name, &digest[..8]))
    }

    fn acquire_local(&self, branch: &str) -> Result<(), LockError> {
        let mut held = self.held.lock().map_err(|_| poisoned(branch))?;
        while held.contains(branch) {
            held = self.released.wait(held).map_err(|_| poisoned(branch))?;
        }
        held.insert(branch.to_string());
        Ok(())
    }

    fn release_local(&self, branch: &str) {
        if let Ok(mut held) = self.held.lock() {
            held.remove(branch);
        }
        self.released.notify_all();
    }

    fn acquire_file(&self, branch: &str) -> Result<Option<fs::File>, LockError> {
        let Some(dir) = &self.dir else {
            return Ok(None);
        };
        let failed = |e: std::io::Error| LockError::Failed {
            branch: branch.to_string(),
            message: e.to_string(),
        };

        fs::create_dir_all(dir).map_err(failed)?;
        let file = fs::File::create(Self::lock_path(dir, branch)).map_err(failed)?;
        file.lock_exclusive().map_err(failed)?;
        Ok(Some(file))
    }
}

fn poisoned(branch: &str) -> LockError {
    LockError::Failed {
        branch: branch.to_string(),
        message: "lock table poisoned".to_string(),
    }
}

/// Releases the branch when dropped.
pub struct BranchLockGuard<'a> {
    locks: &'a BranchLocks,
    branch: String,
    file: Option<fs::File>,
}

impl BranchGuard for BranchLockGuard<'_> {
    fn branch(&self) -> &str {
        &self.branch
    }
}

impl Drop for BranchLockGuard<'_> {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = file.unlock();
        }
        self.locks.release_local(&self.branch);
        tracing::debug!(branch = %self.branch, "branch lock released");
    }
}

impl BranchLocker for BranchLocks {
    fn lock(&self, branch: &str) -> Result<Box<dyn BranchGuard + '_>, LockError> {
        self.acquire_local(branch)?;
        let file = match self.acquire_file(branch) {
            Ok(file) => file,
            Err(err) => {
                self.release_local(branch);
                return Err(err);
            }
        };
        tracing::debug!(branch, "branch lock acquired");
        Ok(Box::new(BranchLockGuard {
            locks: self,
            branch: branch.to_string(),
            file,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn guard_releases_on_drop() {
        let locks = BranchLocks::in_process();
        {
            let guard = locks.lock("main").unwrap();
            assert_eq!(guard.branch(), "main");
        }
        // Would block forever if the first guard leaked.
        let _again = locks.lock("main").unwrap();
    }

    #[test]
    fn different_branches_do_not_block() {
        let locks = BranchLocks::in_process();
        let _main = locks.lock("main").unwrap();
        let _preview = locks.lock("preview").unwrap();
    }

    #[test]
    fn same_branch_is_serialized_across_threads() {
        let locks = Arc::new(BranchLocks::in_process());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let locks = locks.clone();
                let inside = inside.clone();
                let max_inside = max_inside.clone();
                thread::spawn(move || {
                    let _guard = locks.lock("main").unwrap();
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    max_inside.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(10));
                    inside.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn lock_dir_gets_a_file_per_branch() {
        let dir = tempdir().unwrap();
        let locks = BranchLocks::with_lock_dir(dir.path().join("locks"));

        let _guard = locks.lock("feature/new-hero").unwrap();

        let path = BranchLocks::lock_path(&dir.path().join("locks"), "feature/new-hero");
        assert!(path.exists());
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("feature_new-hero-"));
        assert!(name.ends_with(".lock"));
    }

    #[test]
    fn similar_branch_names_get_distinct_lock_files() {
        let dir = Path::new("/tmp/locks");
        let slash = BranchLocks::lock_path(dir, "feature/a");
        let underscore = BranchLocks::lock_path(dir, "feature_a");
        assert_ne!(slash, underscore);
        assert_eq!(slash, BranchLocks::lock_path(dir, "feature/a"));
    }

    #[test]
    fn similar_branch_names_do_not_share_a_file_lock() {
        let dir = tempdir().unwrap();
        let locks = BranchLocks::with_lock_dir(dir.path());
        let _slash = locks.lock("feature/a").unwrap();
        // Shares the sanitized stem; blocks forever if both map to one file.
        let _underscore = locks.lock("feature_a").unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }
}
