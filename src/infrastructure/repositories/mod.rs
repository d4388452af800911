//! Repository Implementations
//!
//! Concrete implementations of domain repository ports.

mod document;
mod registry;

pub use document::JsonDocumentRepository;
pub use registry::{load_registry, RegistryLoadError};
