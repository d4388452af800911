//! GitHub REST source control
//!
//! Reads commit history and branch snapshots, and writes multi-file commits
//! through the git data API: blobs, a tree on top of the head's tree, a
//! commit, then a non-forced ref update. A ref update rejected because the
//! branch moved surfaces as `HeadMoved`, which makes the write a
//! compare-and-swap on the observed head.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::entities::{Commit, FileContent};
use crate::domain::ports::{
    BranchSnapshot, CommitResult, FileChange, FileWrite, RepoRef, SourceControl,
    SourceControlError,
};
use crate::domain::value_objects::{BlobId, SitePath};
use crate::infrastructure::http::{self, HttpFailure};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const FILE_MODE: &str = "100644";

/// GitHub REST client
pub struct GitHubClient {
    http: Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, SourceControlError> {
        let http = http::build_client(timeout_secs)
            .map_err(|e| SourceControlError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn url(&self, repo: &RepoRef, path: &str) -> String {
        format!("{}/repos/{}/{}/{}", self.api_url, repo.owner, repo.repo, path)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    fn send<T: for<'de> Deserialize<'de>>(
        &self,
        repo: &RepoRef,
        what: &str,
        request: RequestBuilder,
    ) -> Result<T, SourceControlError> {
        let response = self
            .authed(request)
            .send()
            .map_err(|e| SourceControlError::Transport(e.to_string()))?;
        let response = http::check(response).map_err(|f| map_failure(repo, what, f))?;
        response
            .json()
            .map_err(|e| SourceControlError::InvalidResponse(format!("{}: {}", what, e)))
    }

    fn head_of(&self, repo: &RepoRef, branch: &str) -> Result<Option<String>, SourceControlError> {
        let path = format!("git/ref/heads/{}", branch);
        let request = self.http.get(self.url(repo, &path));
        match self.send::<GitRef>(repo, &format!("branch '{}'", branch), request) {
            Ok(r) => Ok(Some(r.object.sha)),
            Err(SourceControlError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn tree_of(&self, repo: &RepoRef, commit: &str) -> Result<String, SourceControlError> {
        let request = self.http.get(self.url(repo, &format!("git/commits/{}", commit)));
        let commit: GitCommit = self.send(repo, &format!("commit {}", commit), request)?;
        Ok(commit.tree.sha)
    }

    fn create_blob(&self, repo: &RepoRef, bytes: &[u8]) -> Result<String, SourceControlError> {
        let request = self.http.post(self.url(repo, "git/blobs")).json(&json!({
            "content": BASE64.encode(bytes),
            "encoding": "base64",
        }));
        let created: Sha = self.send(repo, "blob", request)?;
        Ok(created.sha)
    }
}

/// Map a failed response to the port's error vocabulary.
fn map_failure(repo: &RepoRef, what: &str, failure: HttpFailure) -> SourceControlError {
    match failure.status {
        401 | 403 => SourceControlError::Unauthorized {
            repo: repo.to_string(),
            status: failure.status,
            message: failure.message,
        },
        404 => SourceControlError::NotFound {
            what: what.to_string(),
        },
        status => SourceControlError::Http {
            status,
            message: failure.message,
        },
    }
}

#[derive(Deserialize)]
struct Sha {
    sha: String,
}

#[derive(Deserialize)]
struct GitRef {
    object: Sha,
}

#[derive(Deserialize)]
struct GitCommit {
    tree: Sha,
}

#[derive(Deserialize)]
struct CreatedCommit {
    sha: String,
    #[serde(default)]
    html_url: Option<String>,
}

#[derive(Deserialize)]
struct GitTree {
    #[serde(default)]
    tree: Vec<TreeItem>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Deserialize)]
struct TreeItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    sha: String,
}

/// `sha: Some(None)` serializes as `"sha": null`, which removes the path
/// from the base tree.
#[derive(Serialize)]
struct NewTreeEntry<'a> {
    path: &'a str,
    mode: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
}

#[derive(Deserialize)]
struct ListedCommit {
    sha: String,
    html_url: String,
    commit: ListedCommitDetail,
}

#[derive(Deserialize)]
struct ListedCommitDetail {
    message: String,
    #[serde(default)]
    author: Option<ListedAuthor>,
}

#[derive(Deserialize)]
struct ListedAuthor {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    date: Option<DateTime<Utc>>,
}

impl From<ListedCommit> for Commit {
    fn from(listed: ListedCommit) -> Self {
        let (author, timestamp) = match listed.commit.author {
            Some(a) => (a.name.unwrap_or_default(), a.date),
            None => (String::new(), None),
        };
        Commit {
            id: listed.sha,
            message: listed.commit.message,
            author,
            timestamp,
            url: listed.html_url,
        }
    }
}

fn snapshot_from_tree(head: String, tree: GitTree) -> BranchSnapshot {
    let mut snapshot = BranchSnapshot::new(head);
    for item in tree.tree.into_iter().filter(|i| i.kind == "blob") {
        match SitePath::new(&item.path) {
            Ok(path) => {
                snapshot.blobs.insert(path, BlobId::new(item.sha));
            }
            Err(e) => tracing::warn!(path = %item.path, error = %e, "ignoring remote path"),
        }
    }
    snapshot
}

impl SourceControl for GitHubClient {
    #[tracing::instrument(skip(self), fields(repo = %repo))]
    fn list_commits(
        &self,
        repo: &RepoRef,
        branch: &str,
        per_page: u32,
    ) -> Result<Vec<Commit>, SourceControlError> {
        let request = self
            .http
            .get(self.url(repo, "commits"))
            .query(&[("sha", branch.to_string()), ("per_page", per_page.to_string())]);
        let listed: Vec<ListedCommit> =
            self.send(repo, &format!("branch '{}'", branch), request)?;
        Ok(listed.into_iter().map(Commit::from).collect())
    }

    #[tracing::instrument(skip(self), fields(repo = %repo))]
    fn snapshot(
        &self,
        repo: &RepoRef,
        branch: &str,
    ) -> Result<Option<BranchSnapshot>, SourceControlError> {
        let Some(head) = self.head_of(repo, branch)? else {
            tracing::debug!("branch does not exist yet");
            return Ok(None);
        };
        let tree_sha = self.tree_of(repo, &head)?;
        let request = self
            .http
            .get(self.url(repo, &format!("git/trees/{}", tree_sha)))
            .query(&[("recursive", "1")]);
        let tree: GitTree = self.send(repo, "tree", request)?;
        if tree.truncated {
            // Missing entries only cost redundant writes, never a wrong skip.
            tracing::warn!(%head, "remote tree listing truncated");
        }
        Ok(Some(snapshot_from_tree(head, tree)))
    }

    #[tracing::instrument(skip(self, files, message), fields(repo = %repo, files = files.len()))]
    fn write_files(
        &self,
        repo: &RepoRef,
        branch: &str,
        expected_head: Option<&str>,
        files: &[FileWrite],
        message: &str,
    ) -> Result<CommitResult, SourceControlError> {
        let base_tree = expected_head
            .map(|head| self.tree_of(repo, head))
            .transpose()?;

        let mut entries = Vec::with_capacity(files.len());
        for file in files {
            let (sha, content) = match &file.change {
                FileChange::Put(FileContent::Text(text)) => (None, Some(text.as_str())),
                FileChange::Put(FileContent::Binary(bytes)) => {
                    (Some(Some(self.create_blob(repo, bytes)?)), None)
                }
                FileChange::Delete => (Some(None), None),
            };
            entries.push(NewTreeEntry {
                path: file.path.as_str(),
                mode: FILE_MODE,
                kind: "blob",
                sha,
                content,
            });
        }

        let mut tree_body = json!({ "tree": entries });
        if let Some(base) = &base_tree {
            tree_body["base_tree"] = json!(base);
        }
        let request = self.http.post(self.url(repo, "git/trees")).json(&tree_body);
        let tree: Sha = self.send(repo, "tree", request)?;

        let parents: Vec<&str> = expected_head.into_iter().collect();
        let request = self.http.post(self.url(repo, "git/commits")).json(&json!({
            "message": message,
            "tree": tree.sha,
            "parents": parents,
        }));
        let commit: CreatedCommit = self.send(repo, "commit", request)?;

        let moved = |_: SourceControlError| SourceControlError::HeadMoved {
            branch: branch.to_string(),
            expected: expected_head.unwrap_or("none").to_string(),
        };
        let ref_result = match expected_head {
            Some(_) => {
                let request = self
                    .http
                    .patch(self.url(repo, &format!("git/refs/heads/{}", branch)))
                    .json(&json!({ "sha": commit.sha, "force": false }));
                self.send::<serde_json::Value>(repo, "ref", request)
            }
            None => {
                let request = self.http.post(self.url(repo, "git/refs")).json(&json!({
                    "ref": format!("refs/heads/{}", branch),
                    "sha": commit.sha,
                }));
                self.send::<serde_json::Value>(repo, "ref", request)
            }
        };
        match ref_result {
            Ok(_) => {}
            // 422: not a fast-forward, or the ref appeared since the snapshot.
            Err(e @ SourceControlError::Http { status: 409 | 422, .. }) => return Err(moved(e)),
            Err(e) => return Err(e),
        }

        tracing::info!(commit = %commit.sha, "branch updated");
        let url = commit.html_url.unwrap_or_else(|| {
            format!(
                "https://github.com/{}/{}/commit/{}",
                repo.owner, repo.repo, commit.sha
            )
        });
        Ok(CommitResult {
            commit_id: commit.sha,
            url,
        })
    }
}
