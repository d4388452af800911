//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::policies::ProductionFilter;
use crate::domain::ports::RepoRef;
use crate::domain::services::OutputLayout;
use crate::domain::value_objects::{PathError, PatternError, SitePath};
use crate::infrastructure::{github, vercel};

use super::loader;
use super::ConfigWarning;

/// Configuration problems. Fatal, unlike `ConfigWarning`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("no repository configured; set [source_control] owner and repo or SITEFORGE_REPO")]
    MissingRepo,

    #[error("invalid repository '{0}'; expected owner/repo")]
    InvalidRepo(String),

    #[error("invalid {key}: {source}")]
    InvalidPath {
        key: &'static str,
        #[source]
        source: PathError,
    },

    #[error("invalid filter pattern: {0}")]
    InvalidPattern(#[from] PatternError),

    #[error("environment variable {0} is not set")]
    MissingToken(String),
}

/// Source-control remote configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceControlConfig {
    #[serde(default)]
    pub owner: Option<String>,

    #[serde(default)]
    pub repo: Option<String>,

    #[serde(default = "default_production_branch")]
    pub production_branch: String,

    #[serde(default = "default_preview_branch")]
    pub preview_branch: String,

    #[serde(default = "default_github_api")]
    pub api_url: String,

    /// Environment variable holding the API token
    #[serde(default = "default_github_token_env")]
    pub token_env: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for SourceControlConfig {
    fn default() -> Self {
        Self {
            owner: None,
            repo: None,
            production_branch: default_production_branch(),
            preview_branch: default_preview_branch(),
            api_url: default_github_api(),
            token_env: default_github_token_env(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_production_branch() -> String {
    "main".to_string()
}

fn default_preview_branch() -> String {
    "preview".to_string()
}

fn default_github_api() -> String {
    github::DEFAULT_API_URL.to_string()
}

fn default_github_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Hosting provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostingConfig {
    /// Hosting project name; absent until bootstrapped
    #[serde(default)]
    pub project: Option<String>,

    #[serde(default)]
    pub team_id: Option<String>,

    #[serde(default = "default_vercel_api")]
    pub api_url: String,

    #[serde(default = "default_vercel_token_env")]
    pub token_env: String,

    #[serde(default)]
    pub custom_domain: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for HostingConfig {
    fn default() -> Self {
        Self {
            project: None,
            team_id: None,
            api_url: default_vercel_api(),
            token_env: default_vercel_token_env(),
            custom_domain: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_vercel_api() -> String {
    vercel::DEFAULT_API_URL.to_string()
}

fn default_vercel_token_env() -> String {
    "VERCEL_TOKEN".to_string()
}

/// Page generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_app_dir")]
    pub app_dir: String,

    #[serde(default = "default_renderer_import")]
    pub renderer_import: String,

    #[serde(default)]
    pub component_modules: bool,

    /// TOML component registry replacing (or extending) the built-in designs
    #[serde(default)]
    pub registry: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            app_dir: default_app_dir(),
            renderer_import: default_renderer_import(),
            component_modules: false,
            registry: None,
        }
    }
}

fn default_data_dir() -> String {
    "src/data/pages".to_string()
}

fn default_app_dir() -> String {
    "src/app".to_string()
}

fn default_renderer_import() -> String {
    "@/components/PageRenderer".to_string()
}

/// Extra production filter patterns (gitignore syntax)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FilterConfig {
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub include: Vec<String>,
}

/// Editor project checkout
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProjectConfig {
    /// Project sources layered under the generated files
    #[serde(default)]
    pub root: Option<PathBuf>,
}

/// Version history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionsConfig {
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for VersionsConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
        }
    }
}

fn default_per_page() -> u32 {
    crate::application::DEFAULT_PER_PAGE
}

/// Cross-process branch locks
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocksConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Full configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub source_control: SourceControlConfig,

    #[serde(default)]
    pub hosting: HostingConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub versions: VersionsConfig,

    #[serde(default)]
    pub locks: LocksConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        loader::load_with_warnings(path)
    }

    /// Load from project config, user config, or defaults, then apply
    /// environment overrides.
    pub fn discover(project_dir: Option<&Path>) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        loader::discover(project_dir)
    }

    /// Apply environment variable overrides (SITEFORGE_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self, |key| std::env::var(key).ok())
    }

    /// The configured repository.
    pub fn repo(&self) -> Result<RepoRef, ConfigError> {
        match (&self.source_control.owner, &self.source_control.repo) {
            (Some(owner), Some(repo)) => {
                let joined = format!("{}/{}", owner, repo);
                RepoRef::parse(&joined).ok_or(ConfigError::InvalidRepo(joined))
            }
            _ => Err(ConfigError::MissingRepo),
        }
    }

    /// Generator output layout.
    pub fn output_layout(&self) -> Result<OutputLayout, ConfigError> {
        let data_dir =
            SitePath::new(&self.generator.data_dir).map_err(|source| ConfigError::InvalidPath {
                key: "generator.data_dir",
                source,
            })?;
        let app_dir =
            SitePath::new(&self.generator.app_dir).map_err(|source| ConfigError::InvalidPath {
                key: "generator.app_dir",
                source,
            })?;
        Ok(OutputLayout {
            data_dir,
            app_dir,
            renderer_import: self.generator.renderer_import.clone(),
            component_modules: self.generator.component_modules,
        })
    }

    /// Production filter with the configured patterns.
    pub fn production_filter(&self) -> Result<ProductionFilter, ConfigError> {
        Ok(ProductionFilter::with_patterns(
            &self.filter.include,
            &self.filter.exclude,
        )?)
    }
}

/// Read an API token from the environment variable `name`.
pub fn resolve_token(name: &str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingToken(name.to_string()))
}
