//! Deploy Options
//!
//! Configuration types for deploy operations.

use crate::domain::ports::RepoRef;
use crate::domain::services::SeoOverrides;
use crate::domain::value_objects::DeployTarget;

/// Where and what a deployment publishes; fixed for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploySettings {
    /// Repository holding the generated site
    pub repo: RepoRef,
    /// Branch production deploys commit to
    pub production_branch: String,
    /// Branch preview deploys commit to by default
    pub preview_branch: String,
    /// Hosting project to publish (absent until bootstrapped)
    pub hosting_project: Option<String>,
}

impl DeploySettings {
    pub fn new(repo: RepoRef) -> Self {
        Self {
            repo,
            production_branch: "main".to_string(),
            preview_branch: "preview".to_string(),
            hosting_project: None,
        }
    }

    pub fn with_branches(
        mut self,
        production: impl Into<String>,
        preview: impl Into<String>,
    ) -> Self {
        self.production_branch = production.into();
        self.preview_branch = preview.into();
        self
    }

    pub fn with_hosting_project(mut self, project: impl Into<String>) -> Self {
        self.hosting_project = Some(project.into());
        self
    }
}

/// Options for the deploy use case
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    /// Deployment target environment
    pub target: DeployTarget,
    /// Explicit branch (defaults to the target's configured branch)
    pub branch: Option<String>,
    /// Stop after filtering; nothing is committed or published
    pub dry_run: bool,
    /// Per-page SEO overrides applied at generation time
    pub seo_overrides: SeoOverrides,
    /// Commit message (a default naming the version is used otherwise)
    pub message: Option<String>,
}

impl DeployOptions {
    pub fn new(target: DeployTarget) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_seo_overrides(mut self, overrides: SeoOverrides) -> Self {
        self.seo_overrides = overrides;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Options for re-publishing a branch without regenerating
#[derive(Debug, Clone, Default)]
pub struct RepublishOptions {
    pub target: DeployTarget,
    pub branch: Option<String>,
}

impl RepublishOptions {
    pub fn new(target: DeployTarget) -> Self {
        Self {
            target,
            branch: None,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
}

/// Options for bootstrapping a new editor instance
#[derive(Debug, Clone, Default)]
pub struct BootstrapOptions {
    /// Custom domain to bind to the new hosting project
    pub custom_domain: Option<String>,
    pub seo_overrides: SeoOverrides,
}

impl BootstrapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_custom_domain(mut self, domain: impl Into<String>) -> Self {
        self.custom_domain = Some(domain.into());
        self
    }
}
