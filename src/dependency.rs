//! Linking of test cases that rely on the outcome of other test cases.
//!
//! Every allocated test case declares the [`Condition`]s it establishes and
//! the conditions it needs. A need is satisfied by every other test case
//! providing the same condition, and each satisfying case becomes a
//! dependency. The resulting graph must be acyclic.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::graphmap::DiGraphMap;
use tracing::instrument;

use crate::domain::{RequirementId, TestCase, TestCaseId, TestLevel};

/// A state of the system under test established by running a test case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Condition {
    /// A requirement has been verified at a level.
    Verified {
        /// The requirement.
        requirement: RequirementId,
        /// The level it was verified at.
        level: TestLevel,
    },
    /// A resource (e.g. an account balance) has been driven below the
    /// required amount.
    Depleted(String),
}

/// A test case with an identifier, together with the conditions used to
/// link it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocated {
    /// The test case, without dependencies.
    pub case: TestCase,
    /// Conditions this test case establishes.
    pub provides: BTreeSet<Condition>,
    /// Conditions this test case requires.
    pub needs: BTreeSet<Condition>,
}

/// The dependency relation contains a cycle.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("dependency cycle: {}", join(chain))]
pub struct DependencyCycleError {
    /// The test cases forming the cycle, starting and ending with the same
    /// identifier.
    pub chain: Vec<TestCaseId>,
}

fn join(chain: &[TestCaseId]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Fills in the dependencies of every test case and checks the result is
/// acyclic.
///
/// The order of the test cases is preserved.
///
/// # Errors
///
/// Returns a [`DependencyCycleError`] if the linked test cases form a cycle.
/// No test cases are returned in that case.
#[instrument(level = "debug", skip_all, fields(cases = allocated.len()))]
pub fn resolve(allocated: Vec<Allocated>) -> Result<Vec<TestCase>, DependencyCycleError> {
    let mut providers: BTreeMap<Condition, Vec<TestCaseId>> = BTreeMap::new();
    for entry in &allocated {
        for condition in &entry.provides {
            providers
                .entry(condition.clone())
                .or_default()
                .push(entry.case.id());
        }
    }

    let mut cases = Vec::with_capacity(allocated.len());
    for Allocated { mut case, needs, .. } in allocated {
        let id = case.id();
        for need in &needs {
            let Some(satisfying) = providers.get(need) else {
                tracing::debug!("No test case provides {need:?} needed by {id}");
                continue;
            };
            case.dependencies_mut()
                .extend(satisfying.iter().copied().filter(|other| *other != id));
        }
        cases.push(case);
    }

    check_acyclic(&cases)?;
    Ok(cases)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// On the current search path.
    Grey,
    /// Fully explored.
    Black,
}

/// Checks that the dependency relation of a set of test cases is a DAG.
///
/// # Errors
///
/// Returns the first cycle found, searching from the test cases in the
/// given order.
pub fn check_acyclic(cases: &[TestCase]) -> Result<(), DependencyCycleError> {
    let mut graph: DiGraphMap<TestCaseId, ()> =
        DiGraphMap::with_capacity(cases.len(), cases.len() * 2);
    for case in cases {
        graph.add_node(case.id());
        for dependency in case.dependencies() {
            graph.add_edge(case.id(), *dependency, ());
        }
    }

    let mut marks = HashMap::with_capacity(graph.node_count());
    for case in cases {
        if !marks.contains_key(&case.id()) {
            visit(&graph, case.id(), &mut marks)?;
        }
    }

    Ok(())
}

/// Depth-first search from `root` with an explicit stack, so that long
/// dependency chains do not exhaust the call stack.
fn visit(
    graph: &DiGraphMap<TestCaseId, ()>,
    root: TestCaseId,
    marks: &mut HashMap<TestCaseId, Mark>,
) -> Result<(), DependencyCycleError> {
    marks.insert(root, Mark::Grey);
    let mut stack = vec![(root, graph.neighbors(root))];

    while let Some((node, neighbors)) = stack.last_mut() {
        let node = *node;
        let Some(next) = neighbors.next() else {
            marks.insert(node, Mark::Black);
            stack.pop();
            continue;
        };

        match marks.get(&next) {
            Some(Mark::Grey) => {
                let start = stack.iter().position(|(id, _)| *id == next).unwrap_or(0);
                let mut chain: Vec<TestCaseId> =
                    stack[start..].iter().map(|(id, _)| *id).collect();
                chain.push(next);
                return Err(DependencyCycleError { chain });
            }
            Some(Mark::Black) => {}
            None => {
                marks.insert(next, Mark::Grey);
                stack.push((next, graph.neighbors(next)));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use petgraph::algo::is_cyclic_directed;

    use super::*;
    use crate::domain::{Methodology, Priority, Prose};

    fn id(id: &str) -> TestCaseId {
        id.parse().unwrap()
    }

    fn case(tc: &str, requirement: &str) -> TestCase {
        TestCase::new(
            id(tc),
            requirement.parse().unwrap(),
            Priority::P2,
            Methodology::BlackBox,
            String::new(),
            Prose::default(),
        )
    }

    fn verified(requirement: &str, level: TestLevel) -> Condition {
        Condition::Verified {
            requirement: requirement.parse().unwrap(),
            level,
        }
    }

    fn allocated(tc: &str, requirement: &str, needs: &[Condition]) -> Allocated {
        let case = case(tc, requirement);
        Allocated {
            provides: BTreeSet::from([verified(requirement, case.level())]),
            needs: needs.iter().cloned().collect(),
            case,
        }
    }

    #[test]
    fn integration_depends_on_unit_of_same_requirement() {
        let cases = resolve(vec![
            allocated("TC_UT_001", "FR1.1", &[]),
            allocated("TC_UT_002", "FR1.2", &[]),
            allocated(
                "TC_IT_001",
                "FR1.1",
                &[verified("FR1.1", TestLevel::Unit)],
            ),
        ])
        .unwrap();

        assert!(cases[0].dependencies().is_empty());
        assert_eq!(
            cases[2].dependencies().iter().collect::<Vec<_>>(),
            [&id("TC_UT_001")]
        );
    }

    #[test]
    fn depleted_resource_links_across_requirements() {
        let mut insufficient = allocated("TC_VD_001", "FR1.1", &[]);
        insufficient
            .provides
            .insert(Condition::Depleted("balance".to_string()));
        let recharge = allocated(
            "TC_VD_002",
            "FR2.1",
            &[Condition::Depleted("balance".to_string())],
        );

        let cases = resolve(vec![insufficient, recharge]).unwrap();
        assert!(cases[1].dependencies().contains(&id("TC_VD_001")));
    }

    #[test]
    fn unsatisfied_need_leaves_dependencies_empty() {
        let cases = resolve(vec![allocated(
            "TC_IT_001",
            "FR1.1",
            &[verified("FR1.1", TestLevel::Unit)],
        )])
        .unwrap();
        assert!(cases[0].dependencies().is_empty());
    }

    #[test]
    fn a_case_never_depends_on_itself() {
        let looped = allocated(
            "TC_UT_001",
            "FR1.1",
            &[verified("FR1.1", TestLevel::Unit)],
        );
        let cases = resolve(vec![looped]).unwrap();
        assert!(cases[0].dependencies().is_empty());
    }

    #[test]
    fn cycle_is_reported_with_its_chain() {
        let cases = [
            case("TC_UT_001", "FR1.1").with_dependencies([id("TC_IT_001")]),
            case("TC_IT_001", "FR1.1").with_dependencies([id("TC_VD_001")]),
            case("TC_VD_001", "FR1.1").with_dependencies([id("TC_UT_001")]),
        ];

        let error = check_acyclic(&cases).unwrap_err();
        assert_eq!(
            error.chain,
            [
                id("TC_UT_001"),
                id("TC_IT_001"),
                id("TC_VD_001"),
                id("TC_UT_001")
            ]
        );
        assert_eq!(
            error.to_string(),
            "dependency cycle: TC_UT_001 -> TC_IT_001 -> TC_VD_001 -> TC_UT_001"
        );
    }

    #[test]
    fn cycle_reached_from_an_acyclic_prefix_omits_the_prefix() {
        let cases = [
            case("TC_VD_001", "FR1.1").with_dependencies([id("TC_UT_001")]),
            case("TC_UT_001", "FR1.1").with_dependencies([id("TC_UT_002")]),
            case("TC_UT_002", "FR1.1").with_dependencies([id("TC_UT_001")]),
        ];

        let error = check_acyclic(&cases).unwrap_err();
        assert_eq!(
            error.chain,
            [id("TC_UT_001"), id("TC_UT_002"), id("TC_UT_001")]
        );
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let cases = [
            case("TC_VD_001", "FR1.1").with_dependencies([id("TC_IT_001"), id("TC_IT_002")]),
            case("TC_IT_001", "FR1.1").with_dependencies([id("TC_UT_001")]),
            case("TC_IT_002", "FR1.1").with_dependencies([id("TC_UT_001")]),
            case("TC_UT_001", "FR1.1"),
        ];
        assert_eq!(check_acyclic(&cases), Ok(()));

        let mut graph = DiGraphMap::<TestCaseId, ()>::new();
        for case in &cases {
            for dependency in case.dependencies() {
                graph.add_edge(case.id(), *dependency, ());
            }
        }
        assert!(!is_cyclic_directed(&graph));
    }

    #[test]
    fn long_chain_is_checked_without_recursion() {
        let length = 200_000;
        let unit = |seq: usize| {
            TestCaseId::new(TestLevel::Unit, std::num::NonZeroUsize::new(seq).unwrap())
        };
        let cases: Vec<TestCase> = (1..=length)
            .map(|seq| {
                let case = TestCase::new(
                    unit(seq),
                    "FR1.1".parse().unwrap(),
                    Priority::P2,
                    Methodology::BlackBox,
                    String::new(),
                    Prose::default(),
                );
                if seq < length {
                    case.with_dependencies([unit(seq + 1)])
                } else {
                    case.with_dependencies([unit(1)])
                }
            })
            .collect();

        let error = check_acyclic(&cases).unwrap_err();
        assert_eq!(error.chain.len(), length + 1);
        assert_eq!(error.chain.first(), error.chain.last());

        assert_eq!(check_acyclic(&cases[1..]), Ok(()));
    }

    #[test]
    fn cyclic_batch_is_rejected_by_resolve() {
        let mut first = allocated("TC_VD_001", "FR1.1", &[Condition::Depleted("funds".into())]);
        first.provides.insert(Condition::Depleted("credit".into()));
        let mut second = allocated("TC_VD_002", "FR1.2", &[Condition::Depleted("credit".into())]);
        second.provides.insert(Condition::Depleted("funds".into()));

        let error = resolve(vec![first, second]).unwrap_err();
        assert_eq!(error.chain.first(), error.chain.last());
        assert_eq!(error.chain.len(), 3);
    }
}
