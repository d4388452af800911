//! Error types for siteforge
//!
//! Every concern has its own `thiserror` enum; they fold into
//! `SiteforgeError`, whose `kind()` decides the status the outer surface
//! reports.

use std::fmt;

use thiserror::Error;

use crate::application::{DeployError, DeployFailure, VersionFetchError};
use crate::config::ConfigError;
use crate::domain::policies::FilterConfigError;
use crate::domain::ports::{DocumentError, HostingError, SourceControlError};
use crate::domain::services::GenerationError;
use crate::infrastructure::RegistryLoadError;

/// Result type alias for siteforge operations
pub type SiteforgeResult<T> = Result<T, SiteforgeError>;

/// Main error type for siteforge operations
#[derive(Error, Debug)]
pub enum SiteforgeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Registry(#[from] RegistryLoadError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Filter(#[from] FilterConfigError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error(transparent)]
    Versions(#[from] VersionFetchError),

    #[error(transparent)]
    SourceControl(#[from] SourceControlError),

    #[error(transparent)]
    Hosting(#[from] HostingError),

    /// Malformed request input
    #[error("invalid input: {0}")]
    Input(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse error category, mapped to an HTTP-style status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input (400)
    InvalidInput,
    /// Authorization or branch ownership (403)
    Forbidden,
    /// Upstream service or transport failure (500)
    Upstream,
    /// Everything else (500)
    Internal,
}

impl ErrorKind {
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::InvalidInput => 400,
            ErrorKind::Forbidden => 403,
            ErrorKind::Upstream | ErrorKind::Internal => 500,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Upstream => "upstream",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn source_control_kind(err: &SourceControlError) -> ErrorKind {
    if err.is_unauthorized() {
        ErrorKind::Forbidden
    } else {
        ErrorKind::Upstream
    }
}

fn hosting_kind(err: &HostingError) -> ErrorKind {
    if err.is_unauthorized() {
        ErrorKind::Forbidden
    } else {
        ErrorKind::Upstream
    }
}

impl SiteforgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SiteforgeError::Config(_) | SiteforgeError::Registry(_) | SiteforgeError::Io(_) => {
                ErrorKind::Internal
            }
            SiteforgeError::Document(DocumentError::Io(_)) => ErrorKind::Internal,
            SiteforgeError::Document(_) => ErrorKind::InvalidInput,
            SiteforgeError::Generation(_) | SiteforgeError::Filter(_) | SiteforgeError::Input(_) => {
                ErrorKind::InvalidInput
            }
            SiteforgeError::Deploy(err) => match &err.cause {
                DeployFailure::Generation(_) | DeployFailure::GeneratedFileExcluded { .. } => {
                    ErrorKind::InvalidInput
                }
                DeployFailure::Ownership { .. } => ErrorKind::Forbidden,
                DeployFailure::SourceControl(e) => source_control_kind(e),
                DeployFailure::Hosting(e) => hosting_kind(e),
                DeployFailure::Project(_)
                | DeployFailure::Lock(_)
                | DeployFailure::Configuration(_) => ErrorKind::Internal,
            },
            SiteforgeError::Versions(err) if err.is_unauthorized() => ErrorKind::Forbidden,
            SiteforgeError::Versions(_) => ErrorKind::Upstream,
            SiteforgeError::SourceControl(e) => source_control_kind(e),
            SiteforgeError::Hosting(e) => hosting_kind(e),
        }
    }

    pub fn http_status(&self) -> u16 {
        self.kind().http_status()
    }
}
