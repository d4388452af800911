//! Siteforge - website compiler and deploy pipeline for no-code site editors
//!
//! Siteforge turns the editor's website document (pages of configured
//! components) into the source files of a Next.js site, strips everything
//! that belongs to the editor itself, commits the result to a GitHub branch
//! and publishes it through Vercel.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{
    DeployError, DeployOptions, DeployResult, DeployUseCase, VersionFetchError, VersionHistory,
};
pub use config::Config;
pub use domain::entities::{ComponentInstance, ComponentRegistry, Page, SeoMetadata, WebsiteDocument};
pub use domain::policies::{FilterDecision, FilterRule, ProductionFilter};
pub use domain::services::PageGenerator;
pub use domain::value_objects::{DeployPhase, DeployTarget};
pub use error::{ErrorKind, SiteforgeError, SiteforgeResult};
