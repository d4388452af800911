//! Scenario tests for siteforge.
//!
//! Scenarios test complete user journeys end-to-end.
//!
//! Run with: cargo test --test scenarios

mod common;

#[path = "scenarios/editor_publish.rs"]
mod editor_publish;

#[path = "scenarios/cli_journey.rs"]
mod cli_journey;
