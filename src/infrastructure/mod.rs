//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `github` / `vercel` - REST clients for the source-control and hosting ports
//! - `memory` - in-memory remotes for previews and tests
//! - `fs/` - the local project checkout
//! - `repositories/` - website document and component registry files
//! - `events/` - deploy event sinks (NDJSON, tracing)
//! - `locks` - per-branch serialization

pub mod events;
pub mod fs;
pub mod github;
mod http;
pub mod locks;
pub mod memory;
pub mod repositories;
pub mod vercel;

// Re-export for convenience
pub use events::{JsonEventSink, TracingEventSink};
pub use fs::LocalProjectSource;
pub use github::GitHubClient;
pub use locks::BranchLocks;
pub use memory::{MemoryHosting, MemorySourceControl, RecordedDeployment};
pub use repositories::{load_registry, JsonDocumentRepository, RegistryLoadError};
pub use vercel::VercelClient;
