//! Commit planning service
//!
//! Pure domain logic deciding which candidate files a commit has to carry.
//! Each file's git blob id is compared with the blob recorded at the branch
//! head; identical blobs are skipped, so an unchanged site yields an empty plan.
//! Branch paths the generator owns that no retained file claims any more are
//! planned for deletion.

use std::collections::HashSet;

use crate::domain::entities::{CandidateFile, FileContent};
use crate::domain::ports::source_control::{BranchSnapshot, FileWrite};
use crate::domain::value_objects::{BlobId, SitePath};

/// The action to take for a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    /// New file on the branch
    Create,
    /// Content differs from the branch head
    Update,
    /// Already up to date
    Skip,
    /// Owned by the generator but no longer produced
    Delete,
}

/// A planned action for a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub path: SitePath,
    pub content: FileContent,
    pub blob: BlobId,
    pub action: FileAction,
}

impl PlannedFile {
    pub fn should_write(&self) -> bool {
        matches!(self.action, FileAction::Create | FileAction::Update)
    }

    pub fn should_skip(&self) -> bool {
        matches!(self.action, FileAction::Skip)
    }
}

/// Result of planning a commit
#[derive(Debug, Clone, Default)]
pub struct CommitPlan {
    /// Head the plan was computed against; `None` for a branch that does not exist
    pub base: Option<String>,
    pub files: Vec<PlannedFile>,
    /// Stale branch paths, sorted
    pub deletions: Vec<SitePath>,
}

impl CommitPlan {
    pub fn to_write(&self) -> impl Iterator<Item = &PlannedFile> {
        self.files.iter().filter(|f| f.should_write())
    }

    pub fn write_count(&self) -> usize {
        self.to_write().count()
    }

    pub fn skip_count(&self) -> usize {
        self.files.iter().filter(|f| f.should_skip()).count()
    }

    pub fn delete_count(&self) -> usize {
        self.deletions.len()
    }

    /// Writes plus deletions.
    pub fn change_count(&self) -> usize {
        self.write_count() + self.delete_count()
    }

    pub fn total_files(&self) -> usize {
        self.files.len()
    }

    /// Action for `path`, if the plan mentions it.
    pub fn action(&self, path: &SitePath) -> Option<FileAction> {
        if self.deletions.contains(path) {
            return Some(FileAction::Delete);
        }
        self.files.iter().find(|f| &f.path == path).map(|f| f.action)
    }

    /// Nothing differs from the branch head.
    ///
    /// A branch that does not exist yet always needs a commit, even for an
    /// empty file set, so that publishing has something to build.
    pub fn is_noop(&self) -> bool {
        self.base.is_some() && self.change_count() == 0
    }

    /// The changes handed to the source-control port: writes in plan order,
    /// then deletions.
    pub fn writes(&self) -> Vec<FileWrite> {
        self.to_write()
            .map(|f| FileWrite::put(f.path.clone(), f.content.clone()))
            .chain(self.deletions.iter().cloned().map(FileWrite::delete))
            .collect()
    }
}

/// Pure planning service
pub struct CommitPlanner;

impl CommitPlanner {
    /// Plan a single file against the blob currently on the branch.
    pub fn plan_file(new_blob: &BlobId, current: Option<&BlobId>) -> FileAction {
        match current {
            None => FileAction::Create,
            Some(existing) if existing == new_blob => FileAction::Skip,
            Some(_) => FileAction::Update,
        }
    }

    /// Plan every retained file against the branch snapshot.
    ///
    /// Branch paths absent from `files` are deleted when `owned` claims them
    /// and left alone otherwise.
    pub fn plan(
        files: &[CandidateFile],
        snapshot: Option<&BranchSnapshot>,
        owned: impl Fn(&SitePath) -> bool,
    ) -> CommitPlan {
        let planned = files
            .iter()
            .map(|file| {
                let blob = file.blob_id();
                let current = snapshot.and_then(|s| s.blob(&file.path));
                PlannedFile {
                    path: file.path.clone(),
                    content: file.content.clone(),
                    action: Self::plan_file(&blob, current),
                    blob,
                }
            })
            .collect();

        let retained: HashSet<&SitePath> = files.iter().map(|f| &f.path).collect();
        let deletions: Vec<SitePath> = snapshot
            .map(|s| {
                s.blobs
                    .keys()
                    .filter(|path| !retained.contains(*path) && owned(*path))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        CommitPlan {
            base: snapshot.map(|s| s.head.clone()),
            files: planned,
            deletions,
        }
    }
}
