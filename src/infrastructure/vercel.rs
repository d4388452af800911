//! Vercel REST hosting
//!
//! Deployments are created from the git source (repo + branch, optionally a
//! pinned commit), so the hosting side always builds exactly what was
//! committed.

use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::ports::{
    Deployment, DeploymentRequest, HostingError, HostingProvider, ProvisionedProject, RepoRef,
};
use crate::domain::value_objects::DeployTarget;
use crate::infrastructure::http::{self, HttpFailure};

pub const DEFAULT_API_URL: &str = "https://api.vercel.com";

/// Vercel REST client
pub struct VercelClient {
    http: Client,
    api_url: String,
    token: String,
    team_id: Option<String>,
}

impl VercelClient {
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        team_id: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, HostingError> {
        let http =
            http::build_client(timeout_secs).map_err(|e| HostingError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            team_id,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    fn send<T: for<'de> Deserialize<'de>>(
        &self,
        what: &str,
        request: RequestBuilder,
    ) -> Result<T, HostingError> {
        let mut request = request.bearer_auth(&self.token);
        if let Some(team) = &self.team_id {
            request = request.query(&[("teamId", team)]);
        }
        let response = request
            .send()
            .map_err(|e| HostingError::Transport(e.to_string()))?;
        let response = http::check(response).map_err(map_failure)?;
        response
            .json()
            .map_err(|e| HostingError::InvalidResponse(format!("{}: {}", what, e)))
    }
}

fn map_failure(failure: HttpFailure) -> HostingError {
    match failure.status {
        401 | 403 => HostingError::Unauthorized {
            status: failure.status,
            message: failure.message,
        },
        status => HostingError::Http {
            status,
            message: failure.message,
        },
    }
}

/// Deployment URLs come back without a scheme.
fn with_scheme(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

fn deployment_body(request: &DeploymentRequest<'_>) -> Value {
    let mut git_source = json!({
        "type": "github",
        "org": request.repo.owner,
        "repo": request.repo.repo,
        "ref": request.branch,
    });
    if let Some(sha) = request.commit {
        git_source["sha"] = json!(sha);
    }
    let mut body = json!({
        "name": request.project,
        "project": request.project,
        "gitSource": git_source,
    });
    if request.target == DeployTarget::Production {
        body["target"] = json!("production");
    }
    body
}

#[derive(Deserialize)]
struct CreatedDeployment {
    id: String,
    url: String,
}

#[derive(Deserialize)]
struct CreatedProject {
    id: String,
    name: String,
}

impl HostingProvider for VercelClient {
    #[tracing::instrument(skip(self, request), fields(project = request.project, branch = request.branch))]
    fn create_or_update_deployment(
        &self,
        request: &DeploymentRequest<'_>,
    ) -> Result<Deployment, HostingError> {
        let http_request = self
            .http
            .post(self.url("v13/deployments"))
            .json(&deployment_body(request));
        let created: CreatedDeployment = self.send("deployment", http_request)?;
        tracing::info!(deployment = %created.id, "deployment created");
        Ok(Deployment {
            id: created.id,
            url: with_scheme(&created.url),
        })
    }

    #[tracing::instrument(skip(self), fields(repo = %repo))]
    fn provision_project(
        &self,
        repo: &RepoRef,
        custom_domain: Option<&str>,
    ) -> Result<ProvisionedProject, HostingError> {
        let request = self.http.post(self.url("v10/projects")).json(&json!({
            "name": repo.repo,
            "framework": "nextjs",
            "gitRepository": { "type": "github", "repo": repo.to_string() },
        }));
        let project: CreatedProject = self.send("project", request)?;

        if let Some(domain) = custom_domain {
            let request = self
                .http
                .post(self.url(&format!("v10/projects/{}/domains", project.id)))
                .json(&json!({ "name": domain }));
            let _: Value = self.send("domain", request)?;
            tracing::info!(domain, "custom domain bound");
        }

        Ok(ProvisionedProject {
            url: format!("https://{}.vercel.app", project.name),
            id: project.id,
            domain: custom_domain.map(str::to_string),
        })
    }
}
