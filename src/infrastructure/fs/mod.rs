//! File System Implementations
//!
//! The local project checkout, read through the ProjectSource port.

mod project;

pub use project::LocalProjectSource;
