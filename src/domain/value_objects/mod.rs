//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod config_warning;
mod deploy_phase;
mod deploy_target;
mod hash;
mod ignore_patterns;
mod path;
mod route;

pub use config_warning::ConfigWarning;
pub use deploy_phase::DeployPhase;
pub use deploy_target::DeployTarget;
pub use hash::{BlobId, ContentHash};
pub use ignore_patterns::{PatternError, PatternSet};
pub use path::{PathError, SitePath};
pub use route::{Route, RouteError};
