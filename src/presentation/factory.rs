//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application: clients are
//! built once per process here and handed to the use cases.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::{DeploySettings, DeployUseCase, VersionHistory};
use crate::config::{resolve_token, Config};
use crate::domain::entities::ComponentRegistry;
use crate::domain::ports::{
    DeployEventSink, EmptyProject, HostingProvider, NoopEventSink, ProjectSource, RepoRef,
    SourceControl,
};
use crate::domain::services::PageGenerator;
use crate::error::SiteforgeResult;
use crate::infrastructure::{
    load_registry, BranchLocks, GitHubClient, JsonEventSink, LocalProjectSource, MemoryHosting,
    MemorySourceControl, TracingEventSink, VercelClient,
};

/// Type alias for the concrete DeployUseCase used by the CLI
pub type ConcreteDeployUseCase = DeployUseCase<
    Arc<dyn SourceControl>,
    Arc<dyn HostingProvider>,
    Arc<dyn ProjectSource>,
    BranchLocks,
>;

/// Type alias for the concrete VersionHistory used by the CLI
pub type ConcreteVersionHistory = VersionHistory<Arc<dyn SourceControl>>;

/// Which remotes the use case talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// GitHub and Vercel, with tokens from the environment
    Live,
    /// In-memory remotes; for dry runs, which never reach them
    Offline,
    /// In-memory source control with live hosting; bootstrap only
    /// provisions a hosting project
    Provisioning,
}

/// Repository used by offline runs when none is configured.
const OFFLINE_REPO: (&str, &str) = ("local", "site");

/// Create the page generator from the configured layout and registry
pub fn create_page_generator(config: &Config, base: Option<&Path>) -> SiteforgeResult<PageGenerator> {
    let registry = match &config.generator.registry {
        Some(path) => load_registry(&resolve(base, path))?,
        None => ComponentRegistry::builtin(),
    };
    tracing::debug!(designs = registry.len(), "component registry ready");
    Ok(PageGenerator::new(registry, config.output_layout()?))
}

/// Create the project source: the configured checkout, or nothing
pub fn create_project_source(config: &Config, base: Option<&Path>) -> Arc<dyn ProjectSource> {
    match &config.project.root {
        Some(root) => Arc::new(LocalProjectSource::new(resolve(base, root))),
        None => Arc::new(EmptyProject),
    }
}

/// Create the source-control client for `backend`
pub fn create_source_control(
    config: &Config,
    backend: Backend,
) -> SiteforgeResult<Arc<dyn SourceControl>> {
    match backend {
        Backend::Offline | Backend::Provisioning => Ok(Arc::new(MemorySourceControl::new())),
        Backend::Live => {
            let token = resolve_token(&config.source_control.token_env)?;
            let client = GitHubClient::new(
                config.source_control.api_url.clone(),
                token,
                config.source_control.timeout_secs,
            )?;
            Ok(Arc::new(client))
        }
    }
}

/// Create the hosting client for `backend`
pub fn create_hosting(config: &Config, backend: Backend) -> SiteforgeResult<Arc<dyn HostingProvider>> {
    match backend {
        Backend::Offline => Ok(Arc::new(MemoryHosting::new())),
        Backend::Live | Backend::Provisioning => {
            let token = resolve_token(&config.hosting.token_env)?;
            let client = VercelClient::new(
                config.hosting.api_url.clone(),
                token,
                config.hosting.team_id.clone(),
                config.hosting.timeout_secs,
            )?;
            Ok(Arc::new(client))
        }
    }
}

/// Deploy settings from the configuration
pub fn create_settings(config: &Config, backend: Backend) -> SiteforgeResult<DeploySettings> {
    let repo = match (backend, config.repo()) {
        (_, Ok(repo)) => repo,
        (Backend::Offline, Err(_)) => RepoRef::new(OFFLINE_REPO.0, OFFLINE_REPO.1),
        (Backend::Live | Backend::Provisioning, Err(err)) => return Err(err.into()),
    };

    let mut settings = DeploySettings::new(repo).with_branches(
        config.source_control.production_branch.clone(),
        config.source_control.preview_branch.clone(),
    );
    if let Some(project) = &config.hosting.project {
        settings = settings.with_hosting_project(project.clone());
    }
    Ok(settings)
}

/// Create a deploy use case with all dependencies wired up
///
/// `base` resolves relative paths in the configuration (the project
/// directory, when one was given).
pub fn create_deploy_use_case(
    config: &Config,
    backend: Backend,
    base: Option<&Path>,
) -> SiteforgeResult<ConcreteDeployUseCase> {
    let generator = create_page_generator(config, base)?;
    let filter = config.production_filter()?;
    let source_control = create_source_control(config, backend)?;
    let hosting = create_hosting(config, backend)?;
    let project = create_project_source(config, base);
    let locks = match &config.locks.dir {
        Some(dir) => BranchLocks::with_lock_dir(resolve(base, dir)),
        None => BranchLocks::in_process(),
    };
    let settings = create_settings(config, backend)?;

    Ok(DeployUseCase::new(
        generator,
        filter,
        source_control,
        hosting,
        project,
        locks,
        settings,
    ))
}

/// Create the version history reader (always live)
pub fn create_version_history(config: &Config) -> SiteforgeResult<ConcreteVersionHistory> {
    let repo = config.repo()?;
    let source_control = create_source_control(config, Backend::Live)?;
    Ok(VersionHistory::new(source_control, repo))
}

/// Event sink for deploy progress
///
/// NDJSON on stderr when `json`, log lines otherwise; nothing unless asked.
pub fn create_event_sink(events: bool, json: bool, verbose: u8) -> Arc<dyn DeployEventSink> {
    match (events, json) {
        (false, _) => Arc::new(NoopEventSink),
        (true, true) => Arc::new(JsonEventSink::stderr()),
        (true, false) => Arc::new(TracingEventSink::new(verbose > 0)),
    }
}

fn resolve(base: Option<&Path>, path: &Path) -> PathBuf {
    match base {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    }
}
