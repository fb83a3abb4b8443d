//! Expansion of requirement records into draft test cases.
//!
//! Each requirement is classified by the rule table in [`rules`], the
//! resulting [`Scenario`]s are turned into prose by a [`Phrasebook`], and the
//! drafts are handed back in document order without identifiers. Identifiers
//! are assigned afterwards by [`Draft::allocate`], so that the same document
//! always produces the same identifiers regardless of thread scheduling.

use std::{collections::BTreeSet, sync::Arc};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::instrument;

mod phrasebook;
mod rules;

pub use phrasebook::{Phrasebook, TemplatePhrasebook};
pub use rules::{
    Analysis, Attribute, Bound, BoundaryPoint, Direction, Position, Scenario, Unit,
};

use crate::{
    allocator::IdAllocator,
    dependency::{Allocated, Condition},
    domain::{
        Config, Priority, Prose, RequirementId, RequirementKind, RequirementRecord, TestCase,
        TestLevel,
    },
};

/// Errors raised while synthesizing test cases.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SynthesisError {
    /// The requirement contains no obligation, condition or measurable
    /// bound, so nothing could be tested.
    #[error("requirement {requirement} has no testable condition")]
    NoTestableCondition {
        /// The offending requirement.
        requirement: RequirementId,
    },
}

/// A test case that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    requirement: RequirementId,
    scenario: Scenario,
    priority: Priority,
    prose: Prose,
    provides: BTreeSet<Condition>,
    needs: BTreeSet<Condition>,
}

impl Draft {
    /// The requirement this draft verifies.
    #[must_use]
    pub const fn requirement(&self) -> &RequirementId {
        &self.requirement
    }

    /// The scenario this draft was derived from.
    #[must_use]
    pub const fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// The testing level of the draft.
    #[must_use]
    pub const fn level(&self) -> TestLevel {
        self.scenario.level()
    }

    /// The priority of the draft.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// The draft's prose.
    #[must_use]
    pub const fn prose(&self) -> &Prose {
        &self.prose
    }

    /// Assigns the next identifier for the draft's level.
    #[must_use]
    pub fn allocate(self, allocator: &IdAllocator) -> Allocated {
        let id = allocator.next(self.level());
        let case = TestCase::new(
            id,
            self.requirement,
            self.priority,
            self.scenario.methodology(),
            self.scenario.inputs(),
            self.prose,
        );

        Allocated {
            case,
            provides: self.provides,
            needs: self.needs,
        }
    }
}

/// Turns requirement records into draft test cases.
#[derive(Clone)]
pub struct Synthesizer {
    config: Config,
    phrasebook: Arc<dyn Phrasebook>,
}

impl std::fmt::Debug for Synthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synthesizer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Synthesizer {
    /// Creates a synthesizer using the [`TemplatePhrasebook`].
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            phrasebook: Arc::new(TemplatePhrasebook),
        }
    }

    /// Replaces the phrasebook used to write test case prose.
    #[must_use]
    pub fn with_phrasebook(mut self, phrasebook: impl Phrasebook + 'static) -> Self {
        self.phrasebook = Arc::new(phrasebook);
        self
    }

    /// Drafts the test cases for every record, in parallel.
    ///
    /// The result preserves document order: all drafts of the first record,
    /// then all drafts of the second, and so on.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing record in document order.
    #[instrument(level = "debug", skip_all, fields(requirements = records.len()))]
    pub fn draft_all(&self, records: &[RequirementRecord]) -> Result<Vec<Draft>, SynthesisError> {
        let results: Vec<Result<Vec<Draft>, SynthesisError>> =
            records.par_iter().map(|record| self.draft(record)).collect();

        let mut drafts = Vec::new();
        for result in results {
            drafts.extend(result?);
        }

        tracing::debug!("Drafted {} test cases", drafts.len());
        Ok(drafts)
    }

    /// Drafts the test cases for one record.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError::NoTestableCondition`] if the requirement
    /// text contains nothing that could be tested.
    pub fn draft(&self, record: &RequirementRecord) -> Result<Vec<Draft>, SynthesisError> {
        let analysis = Analysis::of(record.text());
        if !analysis.testable {
            return Err(SynthesisError::NoTestableCondition {
                requirement: record.id().clone(),
            });
        }

        let priority = self.priority(record);
        let drafts: Vec<Draft> = scenarios(record.kind(), &analysis)
            .into_iter()
            .map(|scenario| self.draft_scenario(record, scenario, priority))
            .collect();

        tracing::trace!("{} yields {} test cases", record.id(), drafts.len());
        Ok(drafts)
    }

    fn draft_scenario(
        &self,
        record: &RequirementRecord,
        scenario: Scenario,
        priority: Priority,
    ) -> Draft {
        let requirement = record.id().clone();
        let level = scenario.level();

        let mut provides = BTreeSet::from([Condition::Verified {
            requirement: requirement.clone(),
            level,
        }]);
        let mut needs = BTreeSet::new();

        match &scenario {
            Scenario::Interaction { .. } if self.config.link_levels => {
                needs.insert(Condition::Verified {
                    requirement: requirement.clone(),
                    level: TestLevel::Unit,
                });
            }
            Scenario::Insufficient { resource } => {
                provides.insert(Condition::Depleted(resource.clone()));
            }
            Scenario::NormalPath {
                replenishes: Some(resource),
                ..
            } => {
                needs.insert(Condition::Depleted(resource.clone()));
            }
            _ => {}
        }

        Draft {
            prose: self.phrasebook.compose(record, &scenario),
            requirement,
            scenario,
            priority,
            provides,
            needs,
        }
    }

    /// The priority of every test case of a requirement.
    ///
    /// A configured override wins. Otherwise functional requirements that
    /// mention a safety keyword are `P1`, the remaining functional and
    /// non-functional requirements are `P2`, and constraints are `P3`.
    #[must_use]
    pub fn priority(&self, record: &RequirementRecord) -> Priority {
        if let Some(priority) = self.config.priority_override(record.id()) {
            return priority;
        }

        match record.kind() {
            RequirementKind::Functional if self.mentions_safety(record.text()) => Priority::P1,
            RequirementKind::Functional | RequirementKind::NonFunctional => Priority::P2,
            RequirementKind::Constraint => Priority::P3,
        }
    }

    fn mentions_safety(&self, text: &str) -> bool {
        let keywords = self.config.safety_keywords();
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .any(|word| {
                let word = word.to_lowercase();
                keywords.iter().any(|keyword| *keyword == word)
            })
    }
}

/// Applies the synthesis policy to an analysed requirement.
///
/// Scenarios are returned grouped by level (unit, integration, validation),
/// followed by any special-case edge scenarios.
fn scenarios(kind: RequirementKind, analysis: &Analysis) -> Vec<Scenario> {
    let mut scenarios = Vec::new();
    let interface = analysis.interfaces.first().cloned();

    match kind {
        RequirementKind::Functional => {
            if analysis.bounds.is_empty() {
                scenarios.push(Scenario::UnitPartition {
                    interface: interface.clone(),
                });
            } else {
                scenarios.extend(
                    analysis
                        .bounds
                        .iter()
                        .map(|bound| Scenario::UnitBoundary {
                            bound: bound.clone(),
                        }),
                );
            }
            scenarios.push(Scenario::Interaction {
                subsystem: analysis.subsystems.first().cloned(),
            });
            scenarios.push(Scenario::NormalPath {
                interface,
                replenishes: analysis
                    .replenishes
                    .clone()
                    .filter(|_| analysis.insufficient.is_none()),
            });
        }
        RequirementKind::NonFunctional => {
            for bound in &analysis.bounds {
                scenarios.extend(bound.points().into_iter().map(|point| {
                    Scenario::MeasuredPoint {
                        bound: bound.clone(),
                        point,
                    }
                }));
            }
            scenarios.extend(
                analysis
                    .usability
                    .iter()
                    .map(|aspect| Scenario::Usability {
                        aspect: aspect.clone(),
                    }),
            );
            if scenarios.is_empty() {
                scenarios.push(Scenario::Qualitative);
            }
        }
        RequirementKind::Constraint => {
            let bound = analysis.primary_bound().cloned();
            scenarios.push(Scenario::LimitEdge {
                bound: bound.clone(),
            });
            scenarios.push(Scenario::LimitCompliance { bound });
        }
    }

    if let Some(subject) = &analysis.zero_charge {
        scenarios.push(Scenario::ZeroCharge {
            subject: subject.clone(),
        });
    }
    if let Some(resource) = &analysis.insufficient {
        scenarios.push(Scenario::Insufficient {
            resource: resource.clone(),
        });
    }

    scenarios
}

#[cfg(test)]
mod tests {
    use non_empty_string::NonEmptyString;
    use test_case::test_case;

    use super::*;
    use crate::domain::Methodology;

    fn record(id: &str, text: &str) -> RequirementRecord {
        RequirementRecord::new(
            id.parse().unwrap(),
            vec![3],
            NonEmptyString::new(text.to_string()).unwrap(),
        )
    }

    fn levels(drafts: &[Draft]) -> Vec<TestLevel> {
        drafts.iter().map(Draft::level).collect()
    }

    #[test]
    fn functional_requirement_covers_every_level() {
        let synthesizer = Synthesizer::new(Config::default());
        let drafts = synthesizer
            .draft(&record(
                "FR1.1",
                "The system shall detect vehicle presence using IR sensor on GPIO P0.7",
            ))
            .unwrap();

        assert_eq!(
            levels(&drafts),
            [TestLevel::Unit, TestLevel::Integration, TestLevel::Validation]
        );
        assert_eq!(
            drafts[0].scenario().methodology(),
            Methodology::EquivalencePartitioning
        );
        assert_eq!(
            drafts[1].scenario(),
            &Scenario::Interaction {
                subsystem: Some("IR sensor".to_string())
            }
        );
    }

    #[test]
    fn functional_bound_becomes_unit_boundary_case() {
        let synthesizer = Synthesizer::new(Config::default());
        let drafts = synthesizer
            .draft(&record("FR1.1", "The barrier shall open within 3 seconds"))
            .unwrap();

        assert_eq!(drafts[0].scenario().inputs(), "2s, 3s, 4s");
        assert_eq!(drafts[0].scenario().methodology(), Methodology::BoundaryValue);
    }

    #[test]
    fn non_functional_bound_yields_one_case_per_point() {
        let synthesizer = Synthesizer::new(Config::default());
        let drafts = synthesizer
            .draft(&record(
                "NFR1.1",
                "The system shall process each transaction within 10 seconds",
            ))
            .unwrap();

        let inputs: Vec<String> = drafts.iter().map(|d| d.scenario().inputs()).collect();
        assert_eq!(inputs, ["9s", "10s", "11s"]);
        assert!(drafts.iter().all(|d| d.level() == TestLevel::Validation));
        assert!(
            drafts
                .iter()
                .all(|d| d.scenario().methodology() == Methodology::BoundaryValue)
        );
    }

    #[test]
    fn non_functional_without_measure_is_black_box() {
        let synthesizer = Synthesizer::new(Config::default());
        let drafts = synthesizer
            .draft(&record("NFR2.1", "The enclosure shall be weatherproof"))
            .unwrap();

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].scenario(), &Scenario::Qualitative);
    }

    #[test]
    fn constraint_has_one_validation_case_and_one_edge_case() {
        let synthesizer = Synthesizer::new(Config::default());
        let drafts = synthesizer
            .draft(&record(
                "CR1.1",
                "Communication with the server shall use at most 3 retries",
            ))
            .unwrap();

        assert_eq!(levels(&drafts), [TestLevel::Unit, TestLevel::Validation]);
        assert_eq!(drafts[0].scenario().inputs(), "3 retries");
    }

    #[test]
    fn zero_charge_adds_a_dedicated_edge_case() {
        let synthesizer = Synthesizer::new(Config::default());
        let drafts = synthesizer
            .draft(&record(
                "FR2.1",
                "The system shall allow government vehicles with zero toll charge",
            ))
            .unwrap();

        let zero: Vec<&Draft> = drafts
            .iter()
            .filter(|d| matches!(d.scenario(), Scenario::ZeroCharge { .. }))
            .collect();
        assert_eq!(zero.len(), 1);
        assert!(zero[0].prose().expected_outcome.contains("zero charge"));
        assert_eq!(drafts.len(), 4);
    }

    #[test]
    fn degenerate_requirement_is_rejected() {
        let synthesizer = Synthesizer::new(Config::default());
        let error = synthesizer
            .draft(&record("FR1.1", "To be decided"))
            .unwrap_err();
        assert_eq!(
            error,
            SynthesisError::NoTestableCondition {
                requirement: "FR1.1".parse().unwrap()
            }
        );
    }

    #[test_case("FR1.1", "The system shall trigger an alarm on collision", Priority::P1; "safety functional")]
    #[test_case("FR1.1", "The system shall display the toll amount", Priority::P2; "plain functional")]
    #[test_case("NFR1.1", "The system shall be secure against tampering", Priority::P2; "non-functional ignores keywords")]
    #[test_case("CR1.1", "The controller shall use at most 64 KB of memory", Priority::P3; "constraint")]
    fn priority_by_kind_and_keywords(id: &str, text: &str, expected: Priority) {
        let synthesizer = Synthesizer::new(Config::default());
        assert_eq!(synthesizer.priority(&record(id, text)), expected);
    }

    #[test]
    fn safety_keywords_match_whole_words() {
        let synthesizer = Synthesizer::new(Config::default());
        let unsafe_looking = record("FR1.1", "The system shall show the firmware version");
        assert_eq!(synthesizer.priority(&unsafe_looking), Priority::P2);
    }

    #[test]
    fn override_beats_keyword_rule() {
        let mut config = Config::default();
        config.set_priority_override(&"FR1.1".parse().unwrap(), Priority::P3);
        let synthesizer = Synthesizer::new(config);

        let record = record("FR1.1", "The system shall sound the fire alarm");
        assert_eq!(synthesizer.priority(&record), Priority::P3);
    }

    #[test]
    fn integration_needs_unit_when_levels_are_linked() {
        let synthesizer = Synthesizer::new(Config::default());
        let drafts = synthesizer
            .draft(&record("FR1.1", "The barrier shall open after payment"))
            .unwrap();

        let integration = &drafts[1];
        assert!(integration.needs.contains(&Condition::Verified {
            requirement: "FR1.1".parse().unwrap(),
            level: TestLevel::Unit,
        }));
    }

    #[test]
    fn draft_all_preserves_document_order() {
        let synthesizer = Synthesizer::new(Config::default());
        let records: Vec<RequirementRecord> = (1..=20)
            .map(|group| {
                record(
                    &format!("FR{group}.1"),
                    "The system shall log every transaction",
                )
            })
            .collect();

        let drafts = synthesizer.draft_all(&records).unwrap();
        let order: Vec<String> = drafts
            .iter()
            .map(|d| d.requirement().to_string())
            .collect::<Vec<_>>()
            .chunks(3)
            .map(|chunk| chunk[0].clone())
            .collect();
        let expected: Vec<String> = (1..=20).map(|group| format!("FR{group}.1")).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn draft_all_reports_first_failure_in_document_order() {
        let synthesizer = Synthesizer::new(Config::default());
        let records = [
            record("FR1.1", "The system shall beep"),
            record("FR1.2", "Pending"),
            record("FR1.3", "Unknown"),
        ];

        assert_eq!(
            synthesizer.draft_all(&records),
            Err(SynthesisError::NoTestableCondition {
                requirement: "FR1.2".parse().unwrap()
            })
        );
    }
}
