//! Generated and candidate files
//!
//! `GeneratedFile` is what the page generator emits: a project-relative path and
//! fully rendered text. `CandidateFile` is what the filter and commit stage work
//! on: generated files plus files taken from the editor project checkout.

use serde::Serialize;

use crate::domain::value_objects::{BlobId, SitePath};

/// A rendered source file, created fresh on every generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Destination relative to the generated project root
    path: SitePath,
    /// Rendered source text
    content: String,
}

impl GeneratedFile {
    pub fn new(path: SitePath, content: impl Into<String>) -> Self {
        Self {
            path,
            content: content.into(),
        }
    }

    pub fn path(&self) -> &SitePath {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Git blob id of the content
    pub fn blob_id(&self) -> BlobId {
        BlobId::of(self.content.as_bytes())
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }
}

/// Where a candidate file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOrigin {
    /// Produced by the page generator
    Generated,
    /// Copied from the editor project checkout
    Project,
}

/// File body; binary assets (images, fonts) are carried as bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    Binary(Vec<u8>),
}

impl FileContent {
    /// Text when the bytes are valid UTF-8, binary otherwise.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => FileContent::Text(text),
            Err(e) => FileContent::Binary(e.into_bytes()),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FileContent::Text(text) => text.as_bytes(),
            FileContent::Binary(bytes) => bytes,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FileContent::Text(text) => Some(text),
            FileContent::Binary(_) => None,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, FileContent::Binary(_))
    }
}

/// A file considered for a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: SitePath,
    pub content: FileContent,
    pub origin: FileOrigin,
}

impl CandidateFile {
    pub fn project(path: SitePath, content: FileContent) -> Self {
        Self {
            path,
            content,
            origin: FileOrigin::Project,
        }
    }

    pub fn blob_id(&self) -> BlobId {
        BlobId::of(self.content.as_bytes())
    }
}

impl From<GeneratedFile> for CandidateFile {
    fn from(file: GeneratedFile) -> Self {
        Self {
            path: file.path,
            content: FileContent::Text(file.content),
            origin: FileOrigin::Generated,
        }
    }
}
