//! ProjectSource port - the editor project checkout
//!
//! Generated files are layered over the project's own sources (pages,
//! shared components, configuration) to form the candidate set the filter
//! sees.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::entities::CandidateFile;

#[derive(Error, Debug)]
pub enum ProjectSourceError {
    #[error("project root not found: {0}")]
    RootNotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk project: {0}")]
    Walk(String),
}

/// Source of project files, relative to the project root.
pub trait ProjectSource: Send + Sync {
    /// Every project file, sorted by path.
    fn list_files(&self) -> Result<Vec<CandidateFile>, ProjectSourceError>;
}

/// A project with no files of its own; the candidate set is only what the
/// generator produces.
pub struct EmptyProject;

impl ProjectSource for EmptyProject {
    fn list_files(&self) -> Result<Vec<CandidateFile>, ProjectSourceError> {
        Ok(Vec::new())
    }
}

impl<T: ProjectSource + ?Sized> ProjectSource for std::sync::Arc<T> {
    fn list_files(&self) -> Result<Vec<CandidateFile>, ProjectSourceError> {
        (**self).list_files()
    }
}
