//! Prose for test cases.

use crate::{
    domain::{Prose, RequirementRecord},
    synthesis::rules::{Position, Scenario},
};

/// Produces the objective, precondition, steps and expected outcome of a
/// test case.
///
/// Implementations must be deterministic: the same requirement and scenario
/// must always produce the same prose.
pub trait Phrasebook: Send + Sync {
    /// Writes the prose for one scenario of a requirement.
    fn compose(&self, requirement: &RequirementRecord, scenario: &Scenario) -> Prose;
}

/// A [`Phrasebook`] that fills fixed sentence templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplatePhrasebook;

const POWERED: &str = "System is powered on and initialised";

impl Phrasebook for TemplatePhrasebook {
    #[allow(clippy::too_many_lines)]
    fn compose(&self, requirement: &RequirementRecord, scenario: &Scenario) -> Prose {
        let id = requirement.id();
        let statement = requirement.text().trim_end_matches(['.', ';', ' ']);

        match scenario {
            Scenario::NormalPath {
                replenishes: Some(resource),
                ..
            } => Prose {
                objective: format!("Verify {id}: {statement}"),
                precondition: format!(
                    "{POWERED}; account {resource} is insufficient (see dependent test cases)"
                ),
                steps: vec![
                    format!("Bring the account {resource} below the required amount"),
                    "Submit a valid recharge request".to_string(),
                    format!("Observe the account {resource} and system response"),
                ],
                expected_outcome: format!(
                    "The {resource} is replenished by the requested amount and the system \
                     resumes normal operation"
                ),
            },
            Scenario::NormalPath { interface, .. } => Prose {
                objective: format!("Verify {id}: {statement}"),
                precondition: interface.as_ref().map_or_else(
                    || POWERED.to_string(),
                    |interface| format!("{POWERED}; {interface} is configured"),
                ),
                steps: vec![
                    "Apply the nominal operating inputs".to_string(),
                    "Trigger the behaviour described by the requirement".to_string(),
                    "Observe the system response".to_string(),
                ],
                expected_outcome: format!("The system behaves as specified: {statement}"),
            },
            Scenario::Interaction { subsystem } => {
                let partner = subsystem.as_deref().unwrap_or("dependent modules");
                Prose {
                    objective: format!("Verify {id} when interacting with the {partner}"),
                    precondition: format!("{POWERED}; the {partner} is connected and operational"),
                    steps: vec![
                        format!("Connect the component under test to the {partner}"),
                        format!("Generate the stimulus described in {id}"),
                        format!("Monitor the data exchanged with the {partner}"),
                        "Verify the resulting system state".to_string(),
                    ],
                    expected_outcome: format!(
                        "Data is exchanged correctly with the {partner} and the combined \
                         behaviour satisfies {id}"
                    ),
                }
            }
            Scenario::UnitBoundary { bound } => Prose {
                objective: format!(
                    "Verify boundary handling of the {} limit ({} {}) in {id}",
                    bound.attribute(),
                    bound.direction(),
                    bound.limit()
                ),
                precondition: "Unit under test is isolated with its inputs stubbed".to_string(),
                steps: bound
                    .points()
                    .iter()
                    .map(|point| format!("Apply {} and record the result", point.value))
                    .collect(),
                expected_outcome: boundary_outcome(&bound.points()),
            },
            Scenario::UnitPartition { interface } => {
                let input = interface.as_deref().unwrap_or("the input");
                Prose {
                    objective: format!("Verify valid and invalid input classes for {id}"),
                    precondition: "Unit under test is isolated with its inputs stubbed"
                        .to_string(),
                    steps: vec![
                        format!("Drive {input} with a representative valid value"),
                        "Record the unit output".to_string(),
                        format!("Drive {input} with a representative invalid value"),
                        "Record the unit output".to_string(),
                    ],
                    expected_outcome: "The valid class produces the specified behaviour; the \
                                       invalid class is ignored or rejected without side effects"
                        .to_string(),
                }
            }
            Scenario::MeasuredPoint { bound, point } => {
                let relation = match point.position {
                    Position::At => "at".to_string(),
                    position => format!("{position}"),
                };
                Prose {
                    objective: format!(
                        "Verify the {} of {id} {relation} the {} limit",
                        bound.attribute(),
                        bound.limit()
                    ),
                    precondition: format!("{POWERED}; measurement instrumentation is in place"),
                    steps: vec![
                        format!("Configure the test so that the measured value is {}", point.value),
                        "Execute the operation under test".to_string(),
                        format!("Measure the {}", bound.attribute()),
                    ],
                    expected_outcome: if point.accepted {
                        format!(
                            "{} is within the limit ({} {}); the requirement is met",
                            point.value,
                            bound.direction(),
                            bound.limit()
                        )
                    } else {
                        format!(
                            "{} violates the limit ({} {}); the deviation is detected and reported",
                            point.value,
                            bound.direction(),
                            bound.limit()
                        )
                    },
                }
            }
            Scenario::Usability { aspect } => Prose {
                objective: format!("Assess that the system is {aspect} as required by {id}"),
                precondition: format!("{POWERED}; a representative user is available"),
                steps: vec![
                    "Ask the user to perform the task without assistance".to_string(),
                    "Observe hesitations, errors and questions".to_string(),
                    "Collect the user's feedback".to_string(),
                ],
                expected_outcome: format!(
                    "The user completes the task unaided and judges the system {aspect}"
                ),
            },
            Scenario::Qualitative => Prose {
                objective: format!("Verify {id}: {statement}"),
                precondition: POWERED.to_string(),
                steps: vec![
                    "Operate the system under nominal conditions".to_string(),
                    "Inspect the behaviour against the requirement".to_string(),
                ],
                expected_outcome: format!("The quality attribute holds: {statement}"),
            },
            Scenario::LimitCompliance { bound } => Prose {
                objective: format!("Verify the limit stated in {id} is respected"),
                precondition: POWERED.to_string(),
                steps: vec![
                    "Operate the system under normal load".to_string(),
                    "Monitor the constrained resource or channel".to_string(),
                    "Compare the observed usage with the stated limit".to_string(),
                ],
                expected_outcome: bound.as_ref().map_or_else(
                    || "Usage stays within the stated limit".to_string(),
                    |bound| {
                        format!(
                            "Usage stays within the limit ({} {})",
                            bound.direction(),
                            bound.limit()
                        )
                    },
                ),
            },
            Scenario::LimitEdge { bound } => {
                let limit = bound
                    .as_ref()
                    .map_or_else(|| "the stated limit".to_string(), |bound| bound.limit());
                let admitted = bound
                    .as_ref()
                    .is_none_or(|bound| bound.accepts(Position::At));
                Prose {
                    objective: format!("Verify behaviour exactly at the limit of {limit} in {id}"),
                    precondition: "Unit under test is isolated with its inputs stubbed"
                        .to_string(),
                    steps: vec![
                        format!("Drive the unit to exactly {limit}"),
                        "Record the unit behaviour".to_string(),
                    ],
                    expected_outcome: if admitted {
                        format!(
                            "Operation at exactly {limit} is accepted and no limit violation is \
                             reported"
                        )
                    } else {
                        format!("Operation at exactly {limit} is refused as a limit violation")
                    },
                }
            }
            Scenario::ZeroCharge { subject } => Prose {
                objective: format!("Verify a zero charge is applied to {subject} ({id})"),
                precondition: format!("{POWERED}; {subject} are registered as exempt"),
                steps: vec![
                    format!("Present one of the {subject}"),
                    "Let the system compute the charge".to_string(),
                    "Inspect the charge and the account ledger".to_string(),
                ],
                expected_outcome: format!(
                    "A zero charge (0) is applied to {subject}; no amount is deducted and the \
                     transaction completes"
                ),
            },
            Scenario::Insufficient { resource } => Prose {
                objective: format!("Verify handling of insufficient {resource} ({id})"),
                precondition: format!("{POWERED}; available {resource} is below the required amount"),
                steps: vec![
                    format!("Set the available {resource} one unit below the required amount"),
                    "Initiate the operation".to_string(),
                    "Observe the system response and notifications".to_string(),
                ],
                expected_outcome: format!(
                    "The operation is refused, no {resource} is deducted and the user is \
                     notified of insufficient {resource}"
                ),
            },
        }
    }
}

fn boundary_outcome(points: &[crate::synthesis::rules::BoundaryPoint]) -> String {
    let (accepted, rejected): (Vec<_>, Vec<_>) = points.iter().partition(|point| point.accepted);
    let join = |points: Vec<&crate::synthesis::rules::BoundaryPoint>| {
        points
            .into_iter()
            .map(|point| point.value.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    match (accepted.is_empty(), rejected.is_empty()) {
        (false, false) => format!("{} accepted; {} rejected", join(accepted), join(rejected)),
        (false, true) => format!("{} accepted", join(accepted)),
        (true, _) => format!("{} rejected", join(rejected)),
    }
}
