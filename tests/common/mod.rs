//! Common test utilities for siteforge contract and scenario tests.
//!
//! This module provides:
//! - `TestEnv`: isolated project directory plus helpers to run the CLI
//! - Fixtures: reusable documents and project files
//! - `Harness`: the deploy use case over in-memory remotes

#![allow(dead_code)]

pub mod env;
pub mod fixtures;
pub mod harness;

pub use env::*;
pub use fixtures::*;
pub use harness::*;
