//! Requirement to test case traceability.

use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use nonempty::NonEmpty;
use serde::Serialize;
use tracing::instrument;

use crate::domain::{
    RequirementId, RequirementKind, RequirementRecord, TestCase, TestCaseId, TestLevel,
};

/// The test cases tracing to one requirement, grouped by level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trace {
    requirement: RequirementId,
    #[serde(skip)]
    kind: RequirementKind,
    unit: Vec<TestCaseId>,
    integration: Vec<TestCaseId>,
    validation: Vec<TestCaseId>,
}

impl Trace {
    fn new(record: &RequirementRecord) -> Self {
        Self {
            requirement: record.id().clone(),
            kind: record.kind(),
            unit: Vec::new(),
            integration: Vec::new(),
            validation: Vec::new(),
        }
    }

    /// The requirement.
    #[must_use]
    pub const fn requirement(&self) -> &RequirementId {
        &self.requirement
    }

    /// The test cases at a level, in allocation order.
    #[must_use]
    pub fn cases(&self, level: TestLevel) -> &[TestCaseId] {
        match level {
            TestLevel::Unit => &self.unit,
            TestLevel::Integration => &self.integration,
            TestLevel::Validation => &self.validation,
        }
    }

    fn cases_mut(&mut self, level: TestLevel) -> &mut Vec<TestCaseId> {
        match level {
            TestLevel::Unit => &mut self.unit,
            TestLevel::Integration => &mut self.integration,
            TestLevel::Validation => &mut self.validation,
        }
    }

    /// The levels a requirement of this kind must be covered at.
    #[must_use]
    pub const fn required_levels(&self) -> &'static [TestLevel] {
        required_levels(self.kind)
    }

    /// The required levels that have no test case.
    pub fn missing_levels(&self) -> impl Iterator<Item = TestLevel> + '_ {
        self.required_levels()
            .iter()
            .copied()
            .filter(|level| self.cases(*level).is_empty())
    }

    /// Whether every required level has at least one test case.
    #[must_use]
    pub fn is_covered(&self) -> bool {
        self.missing_levels().next().is_none()
    }
}

/// The levels a requirement of a given kind must be covered at.
#[must_use]
pub const fn required_levels(kind: RequirementKind) -> &'static [TestLevel] {
    match kind {
        RequirementKind::Functional => &TestLevel::ALL,
        RequirementKind::NonFunctional | RequirementKind::Constraint => &[TestLevel::Validation],
    }
}

/// A mapping from every requirement to its test cases, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceabilityMatrix {
    traces: Vec<Trace>,
    #[serde(skip)]
    dangling: Vec<(TestCaseId, RequirementId)>,
    #[serde(skip)]
    duplicates: Vec<TestCaseId>,
}

impl TraceabilityMatrix {
    /// Aggregates test cases by requirement and level.
    ///
    /// Test cases that reference an unknown requirement, and repeated test
    /// case identifiers, are recorded and reported by
    /// [`validate`](Self::validate).
    #[must_use]
    #[instrument(level = "debug", skip_all, fields(requirements = records.len(), cases = cases.len()))]
    pub fn build(records: &[RequirementRecord], cases: &[TestCase]) -> Self {
        let mut traces: Vec<Trace> = records.iter().map(Trace::new).collect();
        let index: HashMap<&RequirementId, usize> = records
            .iter()
            .enumerate()
            .map(|(position, record)| (record.id(), position))
            .collect();

        let mut dangling = Vec::new();
        let mut duplicates = Vec::new();
        let mut seen = HashSet::with_capacity(cases.len());

        for case in cases {
            if !seen.insert(case.id()) {
                duplicates.push(case.id());
            }
            match index.get(case.requirement()) {
                Some(&position) => traces[position].cases_mut(case.level()).push(case.id()),
                None => dangling.push((case.id(), case.requirement().clone())),
            }
        }

        for trace in &mut traces {
            for level in TestLevel::ALL {
                trace.cases_mut(level).sort_unstable();
            }
        }

        Self {
            traces,
            dangling,
            duplicates,
        }
    }

    /// The per-requirement traces, in document order.
    #[must_use]
    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    /// The trace for a requirement.
    #[must_use]
    pub fn trace(&self, requirement: &RequirementId) -> Option<&Trace> {
        self.traces
            .iter()
            .find(|trace| trace.requirement() == requirement)
    }

    /// Every structural problem with the matrix.
    #[must_use]
    pub fn issues(&self) -> Vec<CoverageIssue> {
        let uncovered = self.traces.iter().flat_map(|trace| {
            trace.missing_levels().map(|level| CoverageIssue::Uncovered {
                requirement: trace.requirement.clone(),
                level,
            })
        });
        let dangling = self
            .dangling
            .iter()
            .map(|(case, requirement)| CoverageIssue::Dangling {
                case: *case,
                requirement: requirement.clone(),
            });
        let duplicates = self
            .duplicates
            .iter()
            .map(|case| CoverageIssue::DuplicateId { case: *case });

        uncovered.chain(dangling).chain(duplicates).collect()
    }

    /// Checks coverage and referential integrity.
    ///
    /// # Errors
    ///
    /// Returns a [`CoverageError`] listing every issue found.
    pub fn validate(&self) -> Result<(), CoverageError> {
        NonEmpty::from_vec(self.issues()).map_or(Ok(()), |issues| Err(CoverageError { issues }))
    }

    /// Counts of requirements and test cases.
    #[must_use]
    pub fn summary(&self) -> Summary {
        let mut cases = [0; 3];
        for trace in &self.traces {
            for level in TestLevel::ALL {
                cases[level.slot()] += trace.cases(level).len();
            }
        }

        Summary {
            requirements: self.traces.len(),
            covered: self.traces.iter().filter(|trace| trace.is_covered()).count(),
            unit: cases[TestLevel::Unit.slot()],
            integration: cases[TestLevel::Integration.slot()],
            validation: cases[TestLevel::Validation.slot()],
        }
    }
}

/// Aggregate coverage figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of requirements.
    pub requirements: usize,
    /// Number of requirements covered at every required level.
    pub covered: usize,
    /// Number of unit test cases.
    pub unit: usize,
    /// Number of integration test cases.
    pub integration: usize,
    /// Number of validation test cases.
    pub validation: usize,
}

impl Summary {
    /// Total number of test cases.
    #[must_use]
    pub const fn cases(&self) -> usize {
        self.unit + self.integration + self.validation
    }

    /// Share of covered requirements, in percent. An empty document is fully
    /// covered.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn coverage(&self) -> f64 {
        if self.requirements == 0 {
            100.0
        } else {
            self.covered as f64 * 100.0 / self.requirements as f64
        }
    }
}

/// One coverage or integrity problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverageIssue {
    /// A requirement has no test case at a level it must be covered at.
    Uncovered {
        /// The requirement.
        requirement: RequirementId,
        /// The missing level.
        level: TestLevel,
    },
    /// A test case references a requirement that does not exist.
    Dangling {
        /// The test case.
        case: TestCaseId,
        /// The unknown requirement.
        requirement: RequirementId,
    },
    /// A test case identifier is used more than once.
    DuplicateId {
        /// The repeated identifier.
        case: TestCaseId,
    },
}

impl fmt::Display for CoverageIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uncovered { requirement, level } => {
                write!(f, "{requirement} has no {level} test case")
            }
            Self::Dangling { case, requirement } => {
                write!(f, "{case} references unknown requirement {requirement}")
            }
            Self::DuplicateId { case } => write!(f, "{case} is used more than once"),
        }
    }
}

/// The matrix is incomplete or inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct CoverageError {
    /// Every issue found.
    pub issues: NonEmpty<CoverageIssue>,
}

impl fmt::Display for CoverageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX_DISPLAY: usize = 5;

        write!(f, "coverage check failed: ")?;

        let total = self.issues.len();
        let msg = self
            .issues
            .iter()
            .take(MAX_DISPLAY)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");

        if total <= MAX_DISPLAY {
            write!(f, "{msg}")
        } else {
            write!(f, "{msg}... (and {} more)", total - MAX_DISPLAY)
        }
    }
}

#[cfg(test)]
mod tests {
    use non_empty_string::NonEmptyString;

    use super::*;
    use crate::domain::{Methodology, Priority, Prose};

    fn record(id: &str) -> RequirementRecord {
        RequirementRecord::new(
            id.parse().unwrap(),
            vec![3],
            NonEmptyString::new("The system shall work".to_string()).unwrap(),
        )
    }

    fn case(tc: &str, requirement: &str) -> TestCase {
        TestCase::new(
            tc.parse().unwrap(),
            requirement.parse().unwrap(),
            Priority::P2,
            Methodology::BlackBox,
            String::new(),
            Prose::default(),
        )
    }

    #[test]
    fn complete_coverage_validates() {
        let records = [record("FR1.1"), record("NFR1.1"), record("CR1.1")];
        let cases = [
            case("TC_UT_001", "FR1.1"),
            case("TC_IT_001", "FR1.1"),
            case("TC_VD_001", "FR1.1"),
            case("TC_VD_002", "NFR1.1"),
            case("TC_UT_002", "CR1.1"),
            case("TC_VD_003", "CR1.1"),
        ];

        let matrix = TraceabilityMatrix::build(&records, &cases);
        assert_eq!(matrix.validate(), Ok(()));

        let summary = matrix.summary();
        assert_eq!(summary.requirements, 3);
        assert_eq!(summary.covered, 3);
        assert_eq!(summary.cases(), 6);
        assert!((summary.coverage() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn collects_every_issue() {
        let records = [record("FR1.1"), record("NFR1.1")];
        let cases = [
            case("TC_UT_001", "FR1.1"),
            case("TC_UT_001", "FR1.1"),
            case("TC_VD_001", "FR9.9"),
        ];

        let error = TraceabilityMatrix::build(&records, &cases)
            .validate()
            .unwrap_err();
        let issues: Vec<CoverageIssue> = error.issues.into();

        assert_eq!(
            issues,
            [
                CoverageIssue::Uncovered {
                    requirement: "FR1.1".parse().unwrap(),
                    level: TestLevel::Integration,
                },
                CoverageIssue::Uncovered {
                    requirement: "FR1.1".parse().unwrap(),
                    level: TestLevel::Validation,
                },
                CoverageIssue::Uncovered {
                    requirement: "NFR1.1".parse().unwrap(),
                    level: TestLevel::Validation,
                },
                CoverageIssue::Dangling {
                    case: "TC_VD_001".parse().unwrap(),
                    requirement: "FR9.9".parse().unwrap(),
                },
                CoverageIssue::DuplicateId {
                    case: "TC_UT_001".parse().unwrap(),
                },
            ]
        );
    }

    #[test]
    fn error_message_truncates_long_lists() {
        let records: Vec<RequirementRecord> =
            (1..=7).map(|n| record(&format!("NFR{n}.1"))).collect();
        let error = TraceabilityMatrix::build(&records, &[])
            .validate()
            .unwrap_err();

        assert!(error.to_string().ends_with("... (and 2 more)"));
        assert!(
            error
                .to_string()
                .starts_with("coverage check failed: NFR1.1 has no Validation test case")
        );
    }

    #[test]
    fn traces_follow_document_order_and_sort_ids() {
        let records = [record("FR1.2"), record("FR1.1")];
        let cases = [
            case("TC_VD_002", "FR1.1"),
            case("TC_VD_001", "FR1.1"),
            case("TC_VD_003", "FR1.2"),
        ];

        let matrix = TraceabilityMatrix::build(&records, &cases);
        assert_eq!(matrix.traces()[0].requirement().to_string(), "FR1.2");

        let trace = matrix.trace(&"FR1.1".parse().unwrap()).unwrap();
        let ids: Vec<String> = trace
            .cases(TestLevel::Validation)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(ids, ["TC_VD_001", "TC_VD_002"]);
    }

    #[test]
    fn serializes_to_yaml() {
        let records = [record("NFR1.1")];
        let cases = [case("TC_VD_001", "NFR1.1")];

        let yaml = serde_yaml::to_string(&TraceabilityMatrix::build(&records, &cases)).unwrap();
        assert!(yaml.contains("requirement: NFR1.1"));
        assert!(yaml.contains("- TC_VD_001"));
    }
}
