use std::{collections::BTreeSet, fmt, num::NonZeroUsize, str::FromStr};

use serde::{Serialize, Serializer};

use super::RequirementId;

/// The scope of what a test case exercises.
///
/// The declaration order is the order rows are grouped in the output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TestLevel {
    /// A single component in isolation.
    Unit,
    /// Interaction between a component and an adjacent subsystem.
    Integration,
    /// End-to-end behaviour against the requirement.
    Validation,
}

impl TestLevel {
    /// All levels, in output order.
    pub const ALL: [Self; 3] = [Self::Unit, Self::Integration, Self::Validation];

    /// The short code used in test case identifiers.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Unit => "UT",
            Self::Integration => "IT",
            Self::Validation => "VD",
        }
    }

    /// Looks up a level from its identifier code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.code() == code)
    }

    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::Unit => 0,
            Self::Integration => 1,
            Self::Validation => 2,
        }
    }
}

impl fmt::Display for TestLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Unit => "Unit",
            Self::Integration => "Integration",
            Self::Validation => "Validation",
        })
    }
}

/// Execution priority of a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize)]
pub enum Priority {
    /// Must run; safety or security relevant.
    P1,
    /// Should run.
    P2,
    /// Run when time permits.
    P3,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
        })
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Test case design methodology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Methodology {
    /// Behaviour checked through the external interface only.
    BlackBox,
    /// Behaviour checked with knowledge of the internal structure.
    WhiteBox,
    /// Inputs at, just below and just above a limit.
    BoundaryValue,
    /// One representative input per class of equivalent inputs.
    EquivalencePartitioning,
    /// Unscripted exploration by a tester.
    ExploratoryAdHoc,
}

impl fmt::Display for Methodology {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::BlackBox => "Black Box",
            Self::WhiteBox => "White Box",
            Self::BoundaryValue => "Boundary Value Analysis",
            Self::EquivalencePartitioning => "Equivalence Partitioning",
            Self::ExploratoryAdHoc => "Exploratory / Ad-hoc",
        })
    }
}

/// The identifier of a test case.
///
/// Format: `TC_{LEVEL}_{SEQ}`, where `LEVEL` is `UT`, `IT` or `VD` and `SEQ`
/// is a positive integer, zero-padded when displayed.
///
/// Examples: `TC_UT_001`, `TC_VD_012`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TestCaseId {
    level: TestLevel,
    seq: NonZeroUsize,
}

impl TestCaseId {
    /// Default zero-padding width of the sequence number.
    pub const DEFAULT_DIGITS: usize = 3;

    /// Creates an identifier from pre-validated parts.
    #[must_use]
    pub const fn new(level: TestLevel, seq: NonZeroUsize) -> Self {
        Self { level, seq }
    }

    /// The testing level encoded in the identifier.
    #[must_use]
    pub const fn level(self) -> TestLevel {
        self.level
    }

    /// The allocation sequence number.
    #[must_use]
    pub const fn seq(self) -> NonZeroUsize {
        self.seq
    }

    /// Returns a displayable representation with the specified digit width.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use reqtest::{TestCaseId, TestLevel};
    ///
    /// let id = TestCaseId::new(TestLevel::Unit, NonZeroUsize::new(7).unwrap());
    ///
    /// assert_eq!(id.display(3).to_string(), "TC_UT_007");
    /// assert_eq!(id.display(1).to_string(), "TC_UT_7");
    /// ```
    #[must_use]
    pub const fn display(self, digits: usize) -> FormattedId {
        FormattedId { id: self, digits }
    }
}

impl fmt::Display for TestCaseId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.display(Self::DEFAULT_DIGITS).fmt(f)
    }
}

impl Serialize for TestCaseId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A [`TestCaseId`] formatted with a specific digit width.
#[derive(Debug, Clone, Copy)]
pub struct FormattedId {
    id: TestCaseId,
    digits: usize,
}

impl fmt::Display for FormattedId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "TC_{}_{:0width$}",
            self.id.level.code(),
            self.id.seq,
            width = self.digits
        )
    }
}

/// Error returned when a string is not a valid [`TestCaseId`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid test case ID '{0}': expected TC_<UT|IT|VD>_<number>")]
pub struct TestCaseIdError(String);

impl FromStr for TestCaseId {
    type Err = TestCaseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || TestCaseIdError(s.to_string());

        let mut parts = s.split('_');
        if parts.next() != Some("TC") {
            return Err(error());
        }
        let level = parts.next().and_then(TestLevel::from_code).ok_or_else(error)?;
        let seq = parts
            .next()
            .filter(|seq| !seq.is_empty() && seq.chars().all(|c| c.is_ascii_digit()))
            .and_then(|seq| seq.parse::<usize>().ok())
            .and_then(NonZeroUsize::new)
            .ok_or_else(error)?;
        if parts.next().is_some() {
            return Err(error());
        }

        Ok(Self::new(level, seq))
    }
}

/// The prose describing a test case.
///
/// Produced by a [`Phrasebook`](crate::synthesis::Phrasebook) and carried
/// through the pipeline unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Prose {
    /// What the test case verifies.
    pub objective: String,
    /// State the system must be in before the steps run.
    pub precondition: String,
    /// Ordered actions the tester performs.
    pub steps: Vec<String>,
    /// The observable result that constitutes a pass.
    pub expected_outcome: String,
}

/// One concrete verification unit tied to exactly one requirement and one
/// testing level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    id: TestCaseId,
    requirement: RequirementId,
    priority: Priority,
    methodology: Methodology,
    inputs: String,
    prose: Prose,
    dependencies: BTreeSet<TestCaseId>,
}

impl TestCase {
    /// Creates a test case with no dependencies.
    #[must_use]
    pub const fn new(
        id: TestCaseId,
        requirement: RequirementId,
        priority: Priority,
        methodology: Methodology,
        inputs: String,
        prose: Prose,
    ) -> Self {
        Self {
            id,
            requirement,
            priority,
            methodology,
            inputs,
            prose,
            dependencies: BTreeSet::new(),
        }
    }

    /// Replaces the dependency set.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = TestCaseId>) -> Self {
        self.dependencies = dependencies.into_iter().collect();
        self
    }

    /// The test case identifier.
    #[must_use]
    pub const fn id(&self) -> TestCaseId {
        self.id
    }

    /// The requirement this test case traces to.
    #[must_use]
    pub const fn requirement(&self) -> &RequirementId {
        &self.requirement
    }

    /// The testing level.
    #[must_use]
    pub const fn level(&self) -> TestLevel {
        self.id.level
    }

    /// The execution priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// The design methodology.
    #[must_use]
    pub const fn methodology(&self) -> Methodology {
        self.methodology
    }

    /// Test inputs (conditions and values).
    #[must_use]
    pub fn inputs(&self) -> &str {
        &self.inputs
    }

    /// What the test case verifies.
    #[must_use]
    pub fn objective(&self) -> &str {
        &self.prose.objective
    }

    /// Required state before execution.
    #[must_use]
    pub fn precondition(&self) -> &str {
        &self.prose.precondition
    }

    /// Ordered test steps.
    #[must_use]
    pub fn steps(&self) -> &[String] {
        &self.prose.steps
    }

    /// The expected outcome.
    #[must_use]
    pub fn expected_outcome(&self) -> &str {
        &self.prose.expected_outcome
    }

    /// Test cases whose outcome this test case presupposes.
    #[must_use]
    pub const fn dependencies(&self) -> &BTreeSet<TestCaseId> {
        &self.dependencies
    }

    pub(crate) const fn dependencies_mut(&mut self) -> &mut BTreeSet<TestCaseId> {
        &mut self.dependencies
    }
}
