//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod branch_lock;
pub mod deploy_events;
pub mod document_repository;
pub mod hosting;
pub mod project_source;
pub mod source_control;

pub use branch_lock::{BranchGuard, BranchLocker, LockError};
pub use deploy_events::{DeployEvent, DeployEventSink, NoopEventSink};
pub use document_repository::{DocumentError, DocumentRepository, DocumentResult};
pub use hosting::{Deployment, DeploymentRequest, HostingError, HostingProvider, ProvisionedProject};
pub use project_source::{EmptyProject, ProjectSource, ProjectSourceError};
pub use source_control::{
    BranchSnapshot, CommitResult, FileChange, FileWrite, RepoRef, SourceControl, SourceControlError,
};
