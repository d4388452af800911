//! Domain Layer
//!
//! The core of siteforge: the website model, the page generator and the
//! production filter, without I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Core domain entities (WebsiteDocument, GeneratedFile, ComponentRegistry)
//! - `value_objects/` - Immutable value types (SitePath, Route, BlobId, DeployPhase)
//! - `services/` - Domain services (PageGenerator, CommitPlanner)
//! - `policies/` - Business rules (ProductionFilter)
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or network directly
//! 2. **Pure Functions** - Services are stateless and testable
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod policies;
pub mod ports;
pub mod services;
pub mod value_objects;
