//! In-memory adapters
//!
//! A source-control remote and hosting provider that live entirely in memory.
//! Previews run against them so no credentials are needed, and the test
//! suites use them to observe commits and deployments.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use crate::domain::entities::Commit;
use crate::domain::ports::{
    BranchSnapshot, CommitResult, Deployment, DeploymentRequest, FileChange, FileWrite,
    HostingError, HostingProvider, ProvisionedProject, RepoRef, SourceControl,
    SourceControlError,
};
use crate::domain::value_objects::{BlobId, SitePath};

#[derive(Debug, Clone, Default)]
struct Branch {
    /// Newest last
    commits: Vec<Commit>,
    blobs: BTreeMap<SitePath, BlobId>,
    contents: BTreeMap<SitePath, Vec<u8>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    branches: HashMap<String, Branch>,
    next_commit: u64,
    fail_next_write: Option<SourceControlError>,
    fail_next_list: Option<SourceControlError>,
}

/// In-memory source-control remote
#[derive(Debug, Default)]
pub struct MemorySourceControl {
    state: Mutex<MemoryState>,
}

impl MemorySourceControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a commit to `branch` without touching its files.
    pub fn seed_commit(&self, branch: &str, message: &str) -> String {
        let mut state = self.lock();
        let id = next_id(&mut state);
        let entry = state.branches.entry(branch.to_string()).or_default();
        entry.commits.push(Commit {
            id: id.clone(),
            message: message.to_string(),
            author: "siteforge".to_string(),
            timestamp: None,
            url: format!("memory://commit/{}", id),
        });
        id
    }

    /// Make the next `write_files` call fail with `error`.
    pub fn fail_next_write(&self, error: SourceControlError) {
        self.lock().fail_next_write = Some(error);
    }

    /// Make the next `list_commits` call fail with `error`.
    pub fn fail_next_list(&self, error: SourceControlError) {
        self.lock().fail_next_list = Some(error);
    }

    /// Number of commits on `branch`.
    pub fn commit_count(&self, branch: &str) -> usize {
        self.lock()
            .branches
            .get(branch)
            .map_or(0, |b| b.commits.len())
    }

    /// Content of `path` at the head of `branch`.
    pub fn file(&self, branch: &str, path: &str) -> Option<Vec<u8>> {
        let path = SitePath::new(path).ok()?;
        self.lock()
            .branches
            .get(branch)
            .and_then(|b| b.contents.get(&path).cloned())
    }

    /// Paths present at the head of `branch`.
    pub fn paths(&self, branch: &str) -> Vec<String> {
        self.lock()
            .branches
            .get(branch)
            .map(|b| b.contents.keys().map(|p| p.to_string()).collect())
            .unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn next_id(state: &mut MemoryState) -> String {
    state.next_commit += 1;
    format!("{:040x}", state.next_commit)
}

impl SourceControl for MemorySourceControl {
    fn list_commits(
        &self,
        _repo: &RepoRef,
        branch: &str,
        per_page: u32,
    ) -> Result<Vec<Commit>, SourceControlError> {
        let mut state = self.lock();
        if let Some(err) = state.fail_next_list.take() {
            return Err(err);
        }
        let branch = state
            .branches
            .get(branch)
            .ok_or_else(|| SourceControlError::NotFound {
                what: format!("branch '{}'", branch),
            })?;
        Ok(branch
            .commits
            .iter()
            .rev()
            .take(per_page as usize)
            .cloned()
            .collect())
    }

    fn snapshot(
        &self,
        _repo: &RepoRef,
        branch: &str,
    ) -> Result<Option<BranchSnapshot>, SourceControlError> {
        let state = self.lock();
        Ok(state.branches.get(branch).and_then(|b| {
            b.commits.last().map(|head| BranchSnapshot {
                head: head.id.clone(),
                blobs: b.blobs.clone(),
            })
        }))
    }

    fn write_files(
        &self,
        _repo: &RepoRef,
        branch: &str,
        expected_head: Option<&str>,
        files: &[FileWrite],
        message: &str,
    ) -> Result<CommitResult, SourceControlError> {
        let mut state = self.lock();
        if let Some(err) = state.fail_next_write.take() {
            return Err(err);
        }

        let current_head = state
            .branches
            .get(branch)
            .and_then(|b| b.commits.last())
            .map(|c| c.id.clone());
        if current_head.as_deref() != expected_head {
            return Err(SourceControlError::HeadMoved {
                branch: branch.to_string(),
                expected: expected_head.unwrap_or("none").to_string(),
            });
        }

        let id = next_id(&mut state);
        let entry = state.branches.entry(branch.to_string()).or_default();
        for file in files {
            match &file.change {
                FileChange::Put(content) => {
                    let bytes = content.as_bytes().to_vec();
                    entry.blobs.insert(file.path.clone(), BlobId::of(&bytes));
                    entry.contents.insert(file.path.clone(), bytes);
                }
                FileChange::Delete => {
                    entry.blobs.remove(&file.path);
                    entry.contents.remove(&file.path);
                }
            }
        }
        let url = format!("memory://commit/{}", id);
        entry.commits.push(Commit {
            id: id.clone(),
            message: message.to_string(),
            author: "siteforge".to_string(),
            timestamp: None,
            url: url.clone(),
        });

        Ok(CommitResult { commit_id: id, url })
    }
}

/// A deployment the in-memory host was asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDeployment {
    pub project: String,
    pub branch: String,
    pub commit: Option<String>,
}

#[derive(Debug, Default)]
struct HostingState {
    deployments: Vec<RecordedDeployment>,
    projects: Vec<ProvisionedProject>,
    fail_next: Option<HostingError>,
}

/// In-memory hosting provider
#[derive(Debug, Default)]
pub struct MemoryHosting {
    state: Mutex<HostingState>,
}

impl MemoryHosting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call fail with `error`.
    pub fn fail_next(&self, error: HostingError) {
        self.lock().fail_next = Some(error);
    }

    pub fn deployments(&self) -> Vec<RecordedDeployment> {
        self.lock().deployments.clone()
    }

    pub fn projects(&self) -> Vec<ProvisionedProject> {
        self.lock().projects.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HostingState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl HostingProvider for MemoryHosting {
    fn create_or_update_deployment(
        &self,
        request: &DeploymentRequest<'_>,
    ) -> Result<Deployment, HostingError> {
        let mut state = self.lock();
        if let Some(err) = state.fail_next.take() {
            return Err(err);
        }
        state.deployments.push(RecordedDeployment {
            project: request.project.to_string(),
            branch: request.branch.to_string(),
            commit: request.commit.map(str::to_string),
        });
        let n = state.deployments.len();
        Ok(Deployment {
            id: format!("dpl_{}", n),
            url: format!("https://{}-{}.memory.test", request.project, n),
        })
    }

    fn provision_project(
        &self,
        repo: &RepoRef,
        custom_domain: Option<&str>,
    ) -> Result<ProvisionedProject, HostingError> {
        let mut state = self.lock();
        if let Some(err) = state.fail_next.take() {
            return Err(err);
        }
        let project = ProvisionedProject {
            id: format!("prj_{}", state.projects.len() + 1),
            url: format!("https://{}.memory.test", repo.repo),
            domain: custom_domain.map(str::to_string),
        };
        state.projects.push(project.clone());
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::FileContent;

    fn repo() -> RepoRef {
        RepoRef::new("acme", "site")
    }

    fn write(path: &str, body: &str) -> FileWrite {
        FileWrite::put(
            SitePath::new(path).unwrap(),
            FileContent::Text(body.to_string()),
        )
    }

    #[test]
    fn write_then_snapshot() {
        let sc = MemorySourceControl::new();
        assert!(sc.snapshot(&repo(), "main").unwrap().is_none());

        let commit = sc
            .write_files(&repo(), "main", None, &[write("a.ts", "a")], "first")
            .unwrap();
        let snapshot = sc.snapshot(&repo(), "main").unwrap().unwrap();

        assert_eq!(snapshot.head, commit.commit_id);
        assert_eq!(
            snapshot.blob(&SitePath::new("a.ts").unwrap()),
            Some(&BlobId::of(b"a"))
        );
    }

    #[test]
    fn stale_head_is_rejected() {
        let sc = MemorySourceControl::new();
        sc.write_files(&repo(), "main", None, &[write("a.ts", "a")], "first")
            .unwrap();

        let err = sc
            .write_files(&repo(), "main", None, &[write("a.ts", "b")], "second")
            .unwrap_err();

        assert!(matches!(err, SourceControlError::HeadMoved { .. }));
        assert_eq!(sc.commit_count("main"), 1);
    }

    #[test]
    fn deletes_remove_files_from_the_head() {
        let sc = MemorySourceControl::new();
        let first = sc
            .write_files(
                &repo(),
                "main",
                None,
                &[write("a.ts", "a"), write("b.ts", "b")],
                "first",
            )
            .unwrap();

        sc.write_files(
            &repo(),
            "main",
            Some(&first.commit_id),
            &[FileWrite::delete(SitePath::new("b.ts").unwrap())],
            "second",
        )
        .unwrap();

        assert_eq!(sc.paths("main"), vec!["a.ts"]);
        let snapshot = sc.snapshot(&repo(), "main").unwrap().unwrap();
        assert!(snapshot.blob(&SitePath::new("b.ts").unwrap()).is_none());
    }

    #[test]
    fn list_commits_newest_first() {
        let sc = MemorySourceControl::new();
        let first = sc.seed_commit("main", "one");
        let second = sc.seed_commit("main", "two");

        let commits = sc.list_commits(&repo(), "main", 10).unwrap();
        let ids: Vec<&str> = commits.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec![second.as_str(), first.as_str()]);
    }

    #[test]
    fn hosting_records_deployments() {
        let host = MemoryHosting::new();
        let repo = repo();
        let deployment = host
            .create_or_update_deployment(&DeploymentRequest {
                project: "site",
                repo: &repo,
                branch: "main",
                commit: Some("abc"),
                target: crate::domain::value_objects::DeployTarget::Production,
            })
            .unwrap();

        assert_eq!(deployment.id, "dpl_1");
        assert_eq!(host.deployments()[0].commit.as_deref(), Some("abc"));
    }
}
