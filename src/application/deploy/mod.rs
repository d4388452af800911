//! Deploy Module
//!
//! Orchestrates the deployment flow for siteforge.
//!
//! ## Structure
//!
//! - `options` - Configuration types (`DeployOptions`, `DeploySettings`)
//! - `result` - Result types (`DeployResult`, `BootstrapResult`)
//! - `error` - `DeployError` with the phase reached
//! - `phase` - State machine bookkeeping
//! - `use_case` - Core use case logic (`DeployUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use siteforge::application::deploy::{DeployOptions, DeployUseCase};
//!
//! let use_case = DeployUseCase::new(generator, filter, github, vercel, project, locks, settings);
//! let result = use_case.execute(&document, &DeployOptions::new(DeployTarget::Production))?;
//! ```

mod error;
mod options;
mod phase;
mod result;
mod use_case;

pub use error::{DeployError, DeployFailure};
pub use options::{BootstrapOptions, DeployOptions, DeploySettings, RepublishOptions};
pub use result::{
    BootstrapResult, CommitInfo, DeployResult, DeploymentInfo, ExcludedFile, ProjectInfo,
    RepublishResult,
};
pub use use_case::{merge_candidates, DeployUseCase};
