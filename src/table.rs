//! The ten-column test case table.
//!
//! Rendering is a pure function of the requirement records, test cases and
//! configuration: rendering the same input twice yields byte-identical
//! output in every encoding.
//!
//! A table can be narrowed to one testing level with [`Table::for_level`].
//! When the configuration carries [`TestingDetails`], the markdown and JSON
//! encodings print them ahead of the rows; CSV and TSV hold rows only.

use std::collections::HashMap;

use borsh::BorshSerialize;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::instrument;

use crate::domain::{
    Config, Labelled, RequirementRecord, TestCase, TestLevel, TestingDetails,
};

/// The column headers, in output order.
pub const HEADER: [&str; 10] = [
    "Requirement ID",
    "Test Case ID",
    "Priority",
    "Objective",
    "Precondition",
    "Steps",
    "Inputs",
    "Test Case Design Methodology",
    "Dependent Test Cases",
    "Expected Outcome",
];

/// One rendered test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, BorshSerialize)]
pub struct Row {
    /// Requirement ID.
    #[serde(rename = "Requirement ID")]
    pub requirement: String,
    /// Test Case ID.
    #[serde(rename = "Test Case ID")]
    pub test_case: String,
    /// Priority.
    #[serde(rename = "Priority")]
    pub priority: String,
    /// Objective.
    #[serde(rename = "Objective")]
    pub objective: String,
    /// Precondition.
    #[serde(rename = "Precondition")]
    pub precondition: String,
    /// Numbered steps, one per line.
    #[serde(rename = "Steps")]
    pub steps: String,
    /// Inputs.
    #[serde(rename = "Inputs")]
    pub inputs: String,
    /// Test case design methodology.
    #[serde(rename = "Test Case Design Methodology")]
    pub methodology: String,
    /// Comma separated dependencies, or the none marker.
    #[serde(rename = "Dependent Test Cases")]
    pub dependencies: String,
    /// Expected outcome.
    #[serde(rename = "Expected Outcome")]
    pub expected_outcome: String,
}

impl Row {
    fn new(case: &TestCase, config: &Config) -> Self {
        let digits = config.digits();

        let steps = case
            .steps()
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {step}", i + 1))
            .collect::<Vec<_>>()
            .join("\n");

        let dependencies = if case.dependencies().is_empty() {
            config.none_marker.clone()
        } else {
            case.dependencies()
                .iter()
                .map(|id| id.display(digits).to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };

        Self {
            requirement: case.requirement().to_string(),
            test_case: case.id().display(digits).to_string(),
            priority: case.priority().to_string(),
            objective: case.objective().to_string(),
            precondition: case.precondition().to_string(),
            steps,
            inputs: case.inputs().to_string(),
            methodology: case.methodology().to_string(),
            dependencies,
            expected_outcome: case.expected_outcome().to_string(),
        }
    }

    /// The cells of the row, in column order.
    #[must_use]
    pub fn cells(&self) -> [&str; 10] {
        [
            self.requirement.as_str(),
            self.test_case.as_str(),
            self.priority.as_str(),
            self.objective.as_str(),
            self.precondition.as_str(),
            self.steps.as_str(),
            self.inputs.as_str(),
            self.methodology.as_str(),
            self.dependencies.as_str(),
            self.expected_outcome.as_str(),
        ]
    }
}

/// An output encoding for a [`Table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Comma separated values, quoted where needed.
    #[default]
    Csv,
    /// Tab separated values; tabs and line breaks inside cells are escaped.
    Tsv,
    /// A markdown pipe table.
    Markdown,
    /// A JSON array of objects keyed by column header, or an object with
    /// `testing_details` and `test_cases` when details are configured.
    Json,
}

/// The rendered test case table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Row>,
    /// The level of each row.
    levels: Vec<TestLevel>,
    details: TestingDetails,
}

impl Table {
    /// Renders the test cases in canonical order: by requirement in document
    /// order, then by level (unit, integration, validation), then by
    /// sequence number.
    #[must_use]
    #[instrument(level = "debug", skip_all, fields(cases = cases.len()))]
    pub fn render(records: &[RequirementRecord], cases: &[TestCase], config: &Config) -> Self {
        let position: HashMap<_, usize> = records
            .iter()
            .enumerate()
            .map(|(i, record)| (record.id(), i))
            .collect();

        let mut ordered: Vec<&TestCase> = cases.iter().collect();
        ordered.sort_by_key(|case| {
            (
                position
                    .get(case.requirement())
                    .copied()
                    .unwrap_or(usize::MAX),
                case.id(),
            )
        });

        Self {
            rows: ordered.iter().map(|case| Row::new(case, config)).collect(),
            levels: ordered.iter().map(|case| case.level()).collect(),
            details: config.testing_details.clone(),
        }
    }

    /// The rows of one testing level, in the same order.
    #[must_use]
    pub fn for_level(&self, level: TestLevel) -> Self {
        let (rows, levels): (Vec<Row>, Vec<TestLevel>) = self
            .rows
            .iter()
            .zip(&self.levels)
            .filter(|(_, row_level)| **row_level == level)
            .map(|(row, row_level)| (row.clone(), *row_level))
            .unzip();

        Self {
            rows,
            levels,
            details: self.details.clone(),
        }
    }

    /// The testing details printed ahead of the rows.
    #[must_use]
    pub const fn details(&self) -> &TestingDetails {
        &self.details
    }

    /// The rows, in output order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Encodes the table.
    #[must_use]
    pub fn encode(&self, format: Format) -> String {
        match format {
            Format::Csv => self.to_csv(),
            Format::Tsv => self.to_tsv(),
            Format::Markdown => self.to_markdown(),
            Format::Json => self.to_json(),
        }
    }

    /// Encodes the table as CSV, header first.
    #[must_use]
    pub fn to_csv(&self) -> String {
        self.delimited(',', csv_escape)
    }

    /// Encodes the table as TSV, header first.
    #[must_use]
    pub fn to_tsv(&self) -> String {
        self.delimited('\t', |value| {
            value
                .replace('\\', "\\\\")
                .replace('\t', "\\t")
                .replace('\n', "\\n")
                .replace('\r', "\\r")
        })
    }

    /// Encodes the table as a markdown pipe table, preceded by a two-column
    /// table of testing details if any are configured.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let line = |cells: [&str; 10]| {
            let cells: Vec<String> = cells
                .iter()
                .map(|cell| cell.replace('|', "\\|").replace('\n', "<br>"))
                .collect();
            format!("| {} |\n", cells.join(" | "))
        };

        let mut out = String::new();
        if !self.details.is_empty() {
            out.push_str("| Testing Details | |\n|---|---|\n");
            for (label, value) in self.details.entries() {
                out.push_str(&format!(
                    "| {label} | {} |\n",
                    value.replace('|', "\\|").replace('\n', "<br>")
                ));
            }
            out.push('\n');
        }

        out.push_str(&line(HEADER));
        out.push_str(&format!("|{}\n", "---|".repeat(HEADER.len())));
        for row in &self.rows {
            out.push_str(&line(row.cells()));
        }
        out
    }

    /// Encodes the table as pretty-printed JSON.
    ///
    /// Without testing details this is an array of rows. With details it is
    /// an object holding `testing_details` and `test_cases`.
    ///
    /// # Panics
    ///
    /// Panics if JSON serialization fails (which should never happen for
    /// rows of strings).
    #[must_use]
    pub fn to_json(&self) -> String {
        let encoded = if self.details.is_empty() {
            serde_json::to_string_pretty(&self.rows)
        } else {
            serde_json::to_string_pretty(&Sheet {
                testing_details: self.details.labelled(),
                test_cases: &self.rows,
            })
        };
        let mut json = encoded.expect("this must never fail");
        json.push('\n');
        json
    }

    /// A SHA256 fingerprint of the table content.
    ///
    /// The fingerprint is a hash of the Borsh-serialized rows, and changes
    /// whenever any cell changes. It does not depend on the output encoding.
    ///
    /// # Panics
    ///
    /// Panics if borsh serialization fails (which should never happen for
    /// this data structure).
    #[must_use]
    pub fn fingerprint(&self) -> String {
        // encode using [borsh](https://borsh.io/)
        let encoded = borsh::to_vec(&self.rows).expect("this should never fail");

        let hash = Sha256::digest(encoded);

        format!("{hash:x}")
    }

    fn delimited(&self, separator: char, escape: impl Fn(&str) -> String) -> String {
        let line = |cells: [&str; 10]| {
            let mut line = cells
                .iter()
                .map(|cell| escape(cell))
                .collect::<Vec<_>>()
                .join(&separator.to_string());
            line.push('\n');
            line
        };

        let mut out = line(HEADER);
        for row in &self.rows {
            out.push_str(&line(row.cells()));
        }
        out
    }
}

/// A table with its testing details, as encoded in JSON.
#[derive(Serialize)]
struct Sheet<'a> {
    testing_details: Labelled<'a>,
    test_cases: &'a [Row],
}

fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}
