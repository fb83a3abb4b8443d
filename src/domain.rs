//! Domain models for test case generation.
//!
//! This module contains the core domain types: requirement records and
//! their identifiers, test cases and their identifiers, and configuration.

/// Requirement records and identifiers.
pub mod requirement;
pub use requirement::{IdError, RequirementId, RequirementKind, RequirementRecord};

/// Test cases, identifiers, levels, priorities and methodologies.
pub mod test_case;
pub use test_case::{
    Methodology, Priority, Prose, TestCase, TestCaseId, TestCaseIdError, TestLevel,
};

mod config;
pub use config::Config;

mod details;
pub use details::{Labelled, TestingDetails};
