//! This bench test runs the whole pipeline over a large generated
//! requirements document.

#![allow(missing_docs)]

use std::fmt::Write;

use criterion::{Criterion, criterion_group, criterion_main};
use reqtest::{Config, Pipeline, Synthesizer, parse};

const STATEMENTS: [&str; 4] = [
    "The system shall detect vehicle presence using IR sensor on GPIO P0.{group}.",
    "The barrier shall open within {group} seconds of payment.",
    "If the balance is insufficient, the display shall show a recharge message.",
    "The system shall allow government vehicles with zero toll charge.",
];

/// Generates a document with `groups` groups of functional requirements and
/// one non-functional requirement and constraint per group.
fn document(groups: usize) -> String {
    let mut document = String::from("3.1 Functional Requirements\n");
    for group in 1..=groups {
        for (index, statement) in STATEMENTS.iter().enumerate() {
            let statement = statement.replace("{group}", &group.to_string());
            writeln!(document, "- FR{group}.{}: {statement}", index + 1).unwrap();
        }
    }

    document.push_str("3.2 Non-functional Requirements\n");
    for group in 1..=groups {
        writeln!(
            document,
            "- NFR{group}.1: The system shall process each transaction within {group} seconds."
        )
        .unwrap();
    }

    document.push_str("3.3 Constraints\n");
    for group in 1..=groups {
        writeln!(
            document,
            "- CR{group}.1: The controller shall use at most {group} KB of memory."
        )
        .unwrap();
    }

    document
}

fn synthesize(c: &mut Criterion) {
    let records = parse(&document(250)).unwrap();
    let synthesizer = Synthesizer::new(Config::default());

    c.bench_function("draft 1500 requirements", |b| {
        b.iter(|| synthesizer.draft_all(&records).unwrap());
    });
}

fn pipeline(c: &mut Criterion) {
    let document = document(250);
    let pipeline = Pipeline::new(Config::default());

    c.bench_function("generate 1500 requirements", |b| {
        b.iter(|| pipeline.run(&document).unwrap());
    });
}

criterion_group!(benches, synthesize, pipeline);
criterion_main!(benches);
