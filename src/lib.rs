//! Traceable test case generation from requirements documents
//!
//! A requirements document lists numbered functional (`FR`), non-functional
//! (`NFR`) and constraint (`CR`) requirements under numbered section
//! headers. This crate turns such a document into a set of test cases
//! covering every requirement at the levels it must be verified at, links
//! the test cases that rely on one another, and renders the result as a
//! ten-column table.
//!
//! ```
//! use reqtest::{Config, Pipeline};
//!
//! let document = "\
//! 3.1 Functional Requirements
//! - FR1.1: The system shall detect vehicle presence using IR sensor on GPIO P0.7.
//! ";
//!
//! let suite = Pipeline::new(Config::default()).run(document)?;
//! let ids: Vec<String> = suite.table().rows().iter().map(|row| row.test_case.clone()).collect();
//!
//! assert_eq!(ids, ["TC_UT_001", "TC_IT_001", "TC_VD_001"]);
//! # Ok::<(), reqtest::Error>(())
//! ```

pub mod domain;
pub use domain::{
    Config, Methodology, Priority, Prose, RequirementId, RequirementKind, RequirementRecord,
    TestCase, TestCaseId, TestLevel, TestingDetails,
};

pub mod parser;
pub use parser::{ParseError, parse};

pub mod allocator;
pub use allocator::IdAllocator;

pub mod synthesis;
pub use synthesis::{Phrasebook, SynthesisError, Synthesizer, TemplatePhrasebook};

pub mod dependency;
pub use dependency::DependencyCycleError;

pub mod matrix;
pub use matrix::{CoverageError, CoverageIssue, TraceabilityMatrix};

pub mod table;
pub use table::{Format, Table};

mod pipeline;
pub use pipeline::{Error, Pipeline, TestSuite};
