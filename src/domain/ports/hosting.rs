//! Hosting Port
//!
//! The provider that builds and serves a branch. Invoked, not designed, by the
//! orchestrator.

use thiserror::Error;

use crate::domain::ports::source_control::RepoRef;
use crate::domain::value_objects::DeployTarget;

/// A created (or updated) deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub id: String,
    pub url: String,
}

/// A freshly provisioned hosting project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedProject {
    pub id: String,
    pub url: String,
    /// Custom domain bound to the project, if one was requested
    pub domain: Option<String>,
}

/// What to deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest<'a> {
    pub project: &'a str,
    pub repo: &'a RepoRef,
    pub branch: &'a str,
    /// Commit to build; the branch head when `None`
    pub commit: Option<&'a str>,
    pub target: DeployTarget,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostingError {
    #[error("hosting provider rejected credentials (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("hosting provider returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("hosting request failed: {0}")]
    Transport(String),

    #[error("unexpected hosting response: {0}")]
    InvalidResponse(String),
}

impl HostingError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Http { status, .. } => Some(*status),
            Self::Transport(_) | Self::InvalidResponse(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Trait for hosting providers
///
/// Implementations:
/// - `VercelClient` - Vercel REST API
/// - in-memory fakes in tests
pub trait HostingProvider: Send + Sync {
    /// Create a deployment of `request.branch` (or update the existing one).
    fn create_or_update_deployment(
        &self,
        request: &DeploymentRequest<'_>,
    ) -> Result<Deployment, HostingError>;

    /// Create a new project linked to `repo`, optionally binding a custom domain.
    fn provision_project(
        &self,
        repo: &RepoRef,
        custom_domain: Option<&str>,
    ) -> Result<ProvisionedProject, HostingError>;
}

impl<T: HostingProvider + ?Sized> HostingProvider for std::sync::Arc<T> {
    fn create_or_update_deployment(
        &self,
        request: &DeploymentRequest<'_>,
    ) -> Result<Deployment, HostingError> {
        (**self).create_or_update_deployment(request)
    }

    fn provision_project(
        &self,
        repo: &RepoRef,
        custom_domain: Option<&str>,
    ) -> Result<ProvisionedProject, HostingError> {
        (**self).provision_project(repo, custom_domain)
    }
}
