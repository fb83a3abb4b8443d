//! The end-to-end generation pipeline.
//!
//! Parser → Synthesizer (+ ID Allocator) → Dependency Resolver → Matrix
//! Builder → Serializer. Each stage runs to completion before the next one
//! starts, and any failure discards the whole batch.

use tracing::instrument;

use crate::{
    allocator::IdAllocator,
    dependency::{self, DependencyCycleError},
    domain::{Config, RequirementRecord, TestCase},
    matrix::{CoverageError, TraceabilityMatrix},
    parser::{self, ParseError},
    synthesis::{Phrasebook, SynthesisError, Synthesizer},
    table::Table,
};

/// Any failure of the pipeline.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The document could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A requirement could not be turned into test cases.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// The test cases depend on each other in a cycle.
    #[error(transparent)]
    Cycle(#[from] DependencyCycleError),

    /// A requirement is not covered, or the test cases are inconsistent.
    #[error(transparent)]
    Coverage(#[from] CoverageError),
}

/// Generates test suites from requirements documents.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
    synthesizer: Synthesizer,
}

impl Pipeline {
    /// Creates a pipeline with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            synthesizer: Synthesizer::new(config.clone()),
            config,
        }
    }

    /// Replaces the phrasebook used to write test case prose.
    #[must_use]
    pub fn with_phrasebook(mut self, phrasebook: impl Phrasebook + 'static) -> Self {
        self.synthesizer = self.synthesizer.with_phrasebook(phrasebook);
        self
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Runs every stage on a document, numbering test cases from 1.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure. No partial output is produced.
    pub fn run(&self, document: &str) -> Result<TestSuite, Error> {
        self.run_with(document, &IdAllocator::new())
    }

    /// Runs every stage on a document, drawing identifiers from an existing
    /// allocator.
    ///
    /// Use [`IdAllocator::resume_after`] to keep numbering after a previous
    /// run.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure. No partial output is produced.
    #[instrument(skip_all)]
    pub fn run_with(&self, document: &str, allocator: &IdAllocator) -> Result<TestSuite, Error> {
        let requirements = parser::parse(document)?;
        tracing::debug!("Parsed {} requirements", requirements.len());

        let drafts = self.synthesizer.draft_all(&requirements)?;

        let allocated = drafts
            .into_iter()
            .map(|draft| draft.allocate(allocator))
            .collect();
        let cases = dependency::resolve(allocated)?;
        tracing::debug!("Resolved dependencies of {} test cases", cases.len());

        let matrix = TraceabilityMatrix::build(&requirements, &cases);
        matrix.validate()?;

        let table = Table::render(&requirements, &cases, &self.config);
        tracing::info!(
            "Generated {} test cases for {} requirements",
            cases.len(),
            requirements.len()
        );

        Ok(TestSuite {
            requirements,
            cases,
            matrix,
            table,
        })
    }
}

/// The validated output of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSuite {
    requirements: Vec<RequirementRecord>,
    cases: Vec<TestCase>,
    matrix: TraceabilityMatrix,
    table: Table,
}

impl TestSuite {
    /// The parsed requirements, in document order.
    #[must_use]
    pub fn requirements(&self) -> &[RequirementRecord] {
        &self.requirements
    }

    /// The test cases, in allocation order.
    #[must_use]
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// The traceability matrix.
    #[must_use]
    pub const fn matrix(&self) -> &TraceabilityMatrix {
        &self.matrix
    }

    /// The rendered table.
    #[must_use]
    pub const fn table(&self) -> &Table {
        &self.table
    }
}
