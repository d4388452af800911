//! Domain Entities
//!
//! - `WebsiteDocument` - the editable site model (pages, components, props)
//! - `ComponentRegistry` - the closed set of component designs
//! - `GeneratedFile` / `CandidateFile` - compiled artifacts and commit candidates
//! - `VersionRecord` - a commit projected into the editor's version list

mod document;
mod generated_file;
mod registry;
mod version;

pub use document::{ComponentInstance, DocumentRouteError, Page, SeoMetadata, WebsiteDocument};
pub use generated_file::{CandidateFile, FileContent, FileOrigin, GeneratedFile};
pub use registry::{ComponentDesign, ComponentRegistry, FieldKind, FieldSpec, RegistryError};
pub use version::{Commit, VersionRecord, SHORT_ID_LEN};
