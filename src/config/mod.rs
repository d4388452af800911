//! Configuration module for siteforge
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (SITEFORGE_*)
//! 3. Project config (siteforge.toml)
//! 4. User config (~/.config/siteforge/config.toml)
//! 5. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use crate::domain::value_objects::ConfigWarning;

pub use loader::PROJECT_CONFIG_FILE;
pub use types::{
    resolve_token, Config, ConfigError, FilterConfig, GeneratorConfig, HostingConfig,
    LocksConfig, ProjectConfig, SourceControlConfig, VersionsConfig,
};
