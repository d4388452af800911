//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, policies, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeployUseCase` - generate, filter, commit and publish a website document
//!   (also dry runs, republish and bootstrap)
//! - `VersionHistory` - the deployed versions of a branch

pub mod deploy;
pub mod versions;

pub use deploy::{
    BootstrapOptions, BootstrapResult, DeployError, DeployFailure, DeployOptions, DeployResult,
    DeploySettings, DeployUseCase, RepublishOptions, RepublishResult,
};
pub use versions::{VersionFetchError, VersionHistory, DEFAULT_PER_PAGE, MAX_PER_PAGE};
