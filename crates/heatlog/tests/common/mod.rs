//! Shared test utilities for heatlog integration tests.
//!
//! This module provides:
//! - `TestHarness` for an isolated app with a temp database and a manual clock
//! - Builder patterns for jobs, passes and configuration files

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
