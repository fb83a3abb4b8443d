//! End-to-end behaviour of the generation pipeline.

use std::collections::HashSet;

use reqtest::{
    Config, Error, Methodology, ParseError, Pipeline, TestLevel, dependency::check_acyclic,
    domain::IdError,
};

const DOCUMENT: &str = "\
# Toll Plaza Controller

## 3 Requirements

### 3.1 Functional Requirements

- **FR1.1:** The system shall detect vehicle presence using IR sensor on GPIO P0.7.
- **FR1.2:** The system shall read the RFID tag of each vehicle and deduct the toll
  from the account balance.
- **FR1.3:** If the balance is insufficient, the barrier shall remain closed and the
  display shall show a recharge message.
- **FR2.1:** The system shall allow government vehicles with zero toll charge.
- **FR2.2:** Users shall be able to recharge their account balance at the counter.
- **FR2.3:** The system shall raise an alarm on barrier collision.

### 3.2 Non-functional Requirements

- **NFR1.1:** The system shall process each transaction within 10 seconds.
- **NFR1.2:** The display shall be user-friendly.

### 3.3 Constraints

- **CR1.1:** Communication with the server shall use at most 3 retries.
";

fn generate(document: &str) -> reqtest::TestSuite {
    Pipeline::new(Config::default()).run(document).unwrap()
}

#[test]
fn functional_requirement_yields_one_case_per_level() {
    let suite = generate(
        "FR1.1: system shall detect vehicle presence using IR sensor on GPIO P0.7\n",
    );

    let ids: HashSet<String> = suite.cases().iter().map(|c| c.id().to_string()).collect();
    assert!(suite.cases().len() >= 3);
    for expected in ["TC_VD_001", "TC_IT_001", "TC_UT_001"] {
        assert!(ids.contains(expected), "missing {expected}");
    }
    assert!(
        suite
            .cases()
            .iter()
            .all(|case| case.requirement().to_string() == "FR1.1")
    );
}

#[test]
fn timing_requirement_yields_boundary_cases() {
    let suite = generate("NFR1.1: system shall process each transaction within 10 seconds\n");

    let inputs: Vec<&str> = suite.cases().iter().map(|case| case.inputs()).collect();
    assert_eq!(inputs, ["9s", "10s", "11s"]);
    assert!(
        suite
            .cases()
            .iter()
            .all(|case| case.methodology() == Methodology::BoundaryValue)
    );
}

#[test]
fn zero_charge_gets_a_dedicated_edge_case() {
    let suite = generate(DOCUMENT);
    let cases: Vec<_> = suite
        .cases()
        .iter()
        .filter(|case| case.requirement().to_string() == "FR2.1")
        .collect();

    let zero: Vec<_> = cases
        .iter()
        .filter(|case| case.expected_outcome().contains("zero charge"))
        .collect();
    assert_eq!(zero.len(), 1);

    let standard = cases
        .iter()
        .find(|case| case.level() == TestLevel::Validation && case.id() != zero[0].id())
        .unwrap();
    assert!(!standard.expected_outcome().contains("zero charge"));
}

#[test]
fn removed_requirement_leaves_no_references() {
    let reduced: String = DOCUMENT
        .lines()
        .filter(|line| !line.contains("FR2.3"))
        .map(|line| format!("{line}\n"))
        .collect();

    let suite = generate(&reduced);

    assert!(
        suite
            .cases()
            .iter()
            .all(|case| case.requirement().to_string() != "FR2.3")
    );
    let known: HashSet<_> = suite.cases().iter().map(|case| case.id()).collect();
    for case in suite.cases() {
        assert!(case.dependencies().iter().all(|id| known.contains(id)));
    }
    assert_eq!(suite.matrix().validate(), Ok(()));
}

#[test]
fn malformed_tag_emits_nothing() {
    let document = "FR1.1: The system shall beep.\nFR1: The system shall flash.\n";
    let result = Pipeline::new(Config::default()).run(document);

    assert!(matches!(
        result,
        Err(Error::Parse(ParseError::MalformedTag { line: 2, .. }))
    ));
}

#[test]
fn every_requirement_is_covered_at_its_required_levels() {
    let suite = generate(DOCUMENT);

    for trace in suite.matrix().traces() {
        for level in trace.required_levels() {
            assert!(
                !trace.cases(*level).is_empty(),
                "{} has no {level} case",
                trace.requirement()
            );
        }
    }
}

#[test]
fn test_case_ids_are_unique() {
    let suite = generate(DOCUMENT);
    let ids: HashSet<_> = suite.cases().iter().map(|case| case.id()).collect();
    assert_eq!(ids.len(), suite.cases().len());
}

#[test]
fn dependencies_form_a_dag() {
    let suite = generate(DOCUMENT);
    assert_eq!(check_acyclic(suite.cases()), Ok(()));

    let linked = suite
        .cases()
        .iter()
        .filter(|case| !case.dependencies().is_empty())
        .count();
    assert!(linked > 0);
}

#[test]
fn recharge_depends_on_insufficient_balance_case() {
    let suite = generate(DOCUMENT);

    let insufficient = suite
        .cases()
        .iter()
        .find(|case| case.requirement().to_string() == "FR1.3" && case.inputs().contains("below"))
        .unwrap();
    let recharge = suite
        .cases()
        .iter()
        .find(|case| {
            case.requirement().to_string() == "FR2.2" && case.level() == TestLevel::Validation
        })
        .unwrap();

    assert!(recharge.dependencies().contains(&insufficient.id()));
}

#[test]
fn generation_is_deterministic() {
    let first = generate(DOCUMENT);
    let second = generate(DOCUMENT);

    assert_eq!(first, second);
    assert_eq!(first.table().to_csv(), second.table().to_csv());
    assert_eq!(first.table().fingerprint(), second.table().fingerprint());
}

#[test]
fn table_has_ten_columns_in_canonical_order() {
    let suite = generate(DOCUMENT);
    let csv = suite.table().to_csv();

    assert_eq!(
        csv.lines().next().unwrap().split(',').count(),
        reqtest::table::HEADER.len()
    );

    let requirements: Vec<&str> = suite
        .table()
        .rows()
        .iter()
        .map(|row| row.requirement.as_str())
        .collect();
    let mut deduplicated = requirements.clone();
    deduplicated.dedup();
    assert_eq!(
        deduplicated,
        ["FR1.1", "FR1.2", "FR1.3", "FR2.1", "FR2.2", "FR2.3", "NFR1.1", "NFR1.2", "CR1.1"]
    );
}

#[test]
fn safety_requirement_is_top_priority() {
    let suite = generate(DOCUMENT);
    for case in suite.cases() {
        let expected = match case.requirement().to_string().as_str() {
            "FR2.3" => "P1",
            "CR1.1" => "P3",
            _ => "P2",
        };
        assert_eq!(case.priority().to_string(), expected, "{}", case.id());
    }
}

#[test]
fn zero_charge_applies_to_any_exempt_subject() {
    let suite = generate("FR1.1: Monthly pass holders shall pay zero toll charge.\n");

    let zero: Vec<_> = suite
        .cases()
        .iter()
        .filter(|case| case.expected_outcome().contains("zero charge"))
        .collect();
    assert_eq!(zero.len(), 1);
    assert_eq!(zero[0].inputs(), "monthly pass holders (exempt category)");
    assert_eq!(suite.cases().len(), 4);
}

#[test]
fn numbered_sub_items_belong_to_their_requirement() {
    let document = "\
3.1 Functional Requirements
FR1.1: The system shall, on vehicle arrival:
  1. Detect the vehicle
  2. Read the RFID tag
FR1.2: The system shall beep.
";
    let suite = generate(document);

    assert!(suite.requirements()[0].text().ends_with("2. Read the RFID tag"));
    assert_eq!(suite.requirements()[1].section(), &[3, 1]);
}

#[test]
fn tag_without_colon_emits_nothing() {
    let document = "FR1.1: The system shall beep.\nFR1.2 The system shall flash the LED.\n";
    let result = Pipeline::new(Config::default()).run(document);

    assert_eq!(
        result.unwrap_err(),
        Error::Parse(ParseError::MalformedTag {
            line: 2,
            tag: "FR1.2".to_string(),
            source: IdError::Separator("FR1.2".to_string()),
        })
    );
}

#[test]
fn strict_limit_is_a_violation_at_the_limit() {
    let suite = generate("NFR1.1: The system shall respond in less than 10 seconds.\n");

    let at_limit = suite
        .cases()
        .iter()
        .find(|case| case.inputs() == "10s")
        .unwrap();
    assert!(at_limit.expected_outcome().starts_with("10s violates the limit"));

    let below = suite
        .cases()
        .iter()
        .find(|case| case.inputs() == "9s")
        .unwrap();
    assert!(below.expected_outcome().starts_with("9s is within the limit"));
}

#[test]
fn configuration_reload_is_not_a_recharge() {
    let suite = generate(
        "FR1.1: If the balance is insufficient, the barrier shall stay closed.\n\
         FR1.2: The controller shall reload its configuration on restart.\n",
    );

    for case in suite.cases() {
        if case.requirement().to_string() == "FR1.2" {
            assert!(!case.inputs().contains("recharge"), "{}", case.id());
            assert!(
                case.dependencies()
                    .iter()
                    .all(|id| id.level() == TestLevel::Unit),
                "{}",
                case.id()
            );
        }
    }
}

#[test]
fn level_tables_partition_the_full_table() {
    let suite = generate(DOCUMENT);
    let table = suite.table();

    let total: usize = TestLevel::ALL
        .into_iter()
        .map(|level| table.for_level(level).len())
        .sum();
    assert_eq!(total, table.len());
    assert!(
        table
            .for_level(TestLevel::Integration)
            .rows()
            .iter()
            .all(|row| row.test_case.starts_with("TC_IT_"))
    );
}
