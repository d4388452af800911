//! JSON Document Repository
//!
//! Implements the DocumentRepository port for the editor's JSON export.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::domain::entities::WebsiteDocument;
use crate::domain::ports::{DocumentError, DocumentRepository, DocumentResult};

/// Website document stored as pretty-printed JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDocumentRepository;

impl JsonDocumentRepository {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentRepository for JsonDocumentRepository {
    fn load(&self, path: &Path) -> DocumentResult<WebsiteDocument> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DocumentError::NotFound(path.to_path_buf()),
            _ => DocumentError::Io(e),
        })?;

        serde_json::from_str(&content).map_err(|e| DocumentError::InvalidFormat {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn save(&self, document: &WebsiteDocument, path: &Path) -> DocumentResult<()> {
        let mut content =
            serde_json::to_string_pretty(document).map_err(|e| DocumentError::InvalidFormat {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        content.push('\n');

        // Temp file in the same directory so the rename stays on one filesystem.
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(DocumentError::Io)?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(DocumentError::Io)?;
        tmp.write_all(content.as_bytes()).map_err(DocumentError::Io)?;
        tmp.as_file().sync_all().map_err(DocumentError::Io)?;
        tmp.persist(path).map_err(|e| DocumentError::Io(e.error))?;

        tracing::debug!(path = %path.display(), version = document.current_version_number, "document saved");
        Ok(())
    }
}
