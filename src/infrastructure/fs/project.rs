//! Local project checkout as a ProjectSource
//!
//! Walks the project root honouring `.gitignore` (even outside a git
//! repository), so build output and dependencies never reach the candidate
//! set. Dot files are included: `.gitignore`, `.npmrc` and `.nvmrc` are
//! deployable root configuration.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::domain::entities::{CandidateFile, FileContent};
use crate::domain::ports::{ProjectSource, ProjectSourceError};
use crate::domain::value_objects::SitePath;

/// Directories never walked, ignored or not.
const ALWAYS_SKIPPED: &[&str] = &[".git", "node_modules", ".next", ".vercel"];

/// Project files under a local root.
#[derive(Debug, Clone)]
pub struct LocalProjectSource {
    root: PathBuf,
}

impl LocalProjectSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ProjectSource for LocalProjectSource {
    fn list_files(&self) -> Result<Vec<CandidateFile>, ProjectSourceError> {
        if !self.root.is_dir() {
            return Err(ProjectSourceError::RootNotFound(self.root.clone()));
        }

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_exclude(false)
            .git_global(false)
            .require_git(false)
            .filter_entry(|entry| {
                let skipped = entry.file_type().is_some_and(|t| t.is_dir())
                    && ALWAYS_SKIPPED
                        .iter()
                        .any(|name| entry.file_name() == std::ffi::OsStr::new(name));
                !skipped
            })
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| ProjectSourceError::Walk(e.to_string()))?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let absolute = entry.path();
            let relative = match absolute.strip_prefix(&self.root) {
                Ok(rel) => rel,
                Err(_) => continue,
            };
            let Some(relative) = relative.to_str() else {
                tracing::warn!(path = %absolute.display(), "skipping non UTF-8 path");
                continue;
            };
            let path = match SitePath::new(relative) {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!(path = relative, error = %e, "skipping unrepresentable path");
                    continue;
                }
            };

            let bytes = fs::read(absolute).map_err(|source| ProjectSourceError::Read {
                path: absolute.to_path_buf(),
                source,
            })?;
            files.push(CandidateFile::project(path, FileContent::from_bytes(bytes)));
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!(root = %self.root.display(), files = files.len(), "project walked");
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, body: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn paths(files: &[CandidateFile]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn lists_files_sorted_and_relative() {
        let dir = tempdir().unwrap();
        write(dir.path(), "src/app/page.tsx", b"export default 1");
        write(dir.path(), "package.json", b"{}");
        write(dir.path(), "public/logo.png", &[0x89, 0x50, 0xff, 0x00]);

        let files = LocalProjectSource::new(dir.path()).list_files().unwrap();

        assert_eq!(
            paths(&files),
            vec!["package.json", "public/logo.png", "src/app/page.tsx"]
        );
        assert!(files[1].content.is_binary());
        assert_eq!(files[2].content.as_text(), Some("export default 1"));
    }

    #[test]
    fn honours_gitignore_without_a_repository() {
        let dir = tempdir().unwrap();
        write(dir.path(), ".gitignore", b"dist/\n*.log\n");
        write(dir.path(), "dist/bundle.js", b"x");
        write(dir.path(), "debug.log", b"x");
        write(dir.path(), "src/lib/util.ts", b"x");

        let files = LocalProjectSource::new(dir.path()).list_files().unwrap();

        assert_eq!(paths(&files), vec![".gitignore", "src/lib/util.ts"]);
    }

    #[test]
    fn skips_dependency_and_vcs_directories() {
        let dir = tempdir().unwrap();
        write(dir.path(), ".git/HEAD", b"ref: refs/heads/main");
        write(dir.path(), "node_modules/react/index.js", b"x");
        write(dir.path(), ".next/cache/a", b"x");
        write(dir.path(), "src/app/layout.tsx", b"x");

        let files = LocalProjectSource::new(dir.path()).list_files().unwrap();

        assert_eq!(paths(&files), vec!["src/app/layout.tsx"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let err = LocalProjectSource::new(dir.path().join("missing"))
            .list_files()
            .unwrap_err();
        assert!(matches!(err, ProjectSourceError::RootNotFound(_)));
    }
}
