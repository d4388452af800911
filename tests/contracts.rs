//! Contract tests for siteforge.
//!
//! Contracts are invariants that must ALWAYS hold.
//! A failing contract test is a P0 bug.
//!
//! Run with: cargo test --test contracts

mod common;

#[path = "contracts/filter.rs"]
mod filter;

#[path = "contracts/generator.rs"]
mod generator;

#[path = "contracts/deploy.rs"]
mod deploy;
