//! Deploy use case wired to in-memory remotes and a project on disk.

use std::sync::Arc;

use siteforge::application::{DeploySettings, DeployUseCase};
use siteforge::domain::ports::RepoRef;
use siteforge::infrastructure::{BranchLocks, LocalProjectSource, MemoryHosting, MemorySourceControl};
use siteforge::{PageGenerator, ProductionFilter};
use tempfile::TempDir;

use super::fixtures::write_editor_project;

pub type MemoryDeploy =
    DeployUseCase<Arc<MemorySourceControl>, Arc<MemoryHosting>, LocalProjectSource, BranchLocks>;

pub struct Harness {
    pub use_case: MemoryDeploy,
    pub source_control: Arc<MemorySourceControl>,
    pub hosting: Arc<MemoryHosting>,
    _project: TempDir,
}

impl Harness {
    /// The editor project checkout, hosting project "bakery".
    pub fn new() -> Self {
        let project = tempfile::tempdir().unwrap();
        write_editor_project(project.path());

        let source_control = Arc::new(MemorySourceControl::new());
        let hosting = Arc::new(MemoryHosting::new());
        let use_case = DeployUseCase::new(
            PageGenerator::default(),
            ProductionFilter::new(),
            source_control.clone(),
            hosting.clone(),
            LocalProjectSource::new(project.path()),
            BranchLocks::in_process(),
            DeploySettings::new(RepoRef::new("acme", "bakery")).with_hosting_project("bakery"),
        );

        Self {
            use_case,
            source_control,
            hosting,
            _project: project,
        }
    }
}
