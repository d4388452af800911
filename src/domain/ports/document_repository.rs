//! DocumentRepository port - abstraction for website document persistence
//!
//! The editor session layer owns the document; this port lets the
//! orchestrator's callers load it and write back the advanced version number
//! without knowing about JSON details.

use std::path::{Path, PathBuf};

use crate::domain::entities::WebsiteDocument;

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Document persistence errors
#[derive(Debug)]
pub enum DocumentError {
    /// No document at the path
    NotFound(PathBuf),
    /// The file is not a valid website document
    InvalidFormat { path: PathBuf, message: String },
    /// I/O error
    Io(std::io::Error),
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::NotFound(path) => {
                write!(f, "Website document not found: {}", path.display())
            }
            DocumentError::InvalidFormat { path, message } => {
                write!(f, "Invalid website document {}: {}", path.display(), message)
            }
            DocumentError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocumentError::Io(err) => Some(err),
            _ => None,
        }
    }
}

/// Abstract repository for website documents
pub trait DocumentRepository {
    /// Load the document at `path`
    fn load(&self, path: &Path) -> DocumentResult<WebsiteDocument>;

    /// Save the document to `path`, replacing it atomically
    fn save(&self, document: &WebsiteDocument, path: &Path) -> DocumentResult<()>;
}
