use std::path::PathBuf;

use clap::Parser;
use reqtest::{Config, Pipeline, TestLevel, TraceabilityMatrix};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Show which test cases trace to each requirement")]
pub struct Matrix {
    /// The requirements document (plain text or markdown)
    document: PathBuf,

    /// Output format (table, json, yaml)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

impl Matrix {
    #[instrument(level = "debug", skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let document = super::read_document(&self.document)?;
        let suite = Pipeline::new(config.clone()).run(&document)?;
        let matrix = suite.matrix();

        match self.output {
            OutputFormat::Table => Self::output_table(matrix, config.digits()),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(matrix)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(matrix)?),
        }

        Ok(())
    }

    fn output_table(matrix: &TraceabilityMatrix, digits: usize) {
        let headers = ["Requirement", "Unit", "Integration", "Validation"];

        let data: Vec<[String; 4]> = matrix
            .traces()
            .iter()
            .map(|trace| {
                let ids = |level: TestLevel| {
                    let ids = trace.cases(level);
                    if ids.is_empty() {
                        "-".to_string()
                    } else {
                        ids.iter()
                            .map(|id| id.display(digits).to_string())
                            .collect::<Vec<_>>()
                            .join(", ")
                    }
                };
                [
                    trace.requirement().to_string(),
                    ids(TestLevel::Unit),
                    ids(TestLevel::Integration),
                    ids(TestLevel::Validation),
                ]
            })
            .collect();

        if data.is_empty() {
            println!("{}", "No requirements found.".warning());
            return;
        }

        // Determine column widths for alignment.
        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                data.iter()
                    .map(|row| row[idx].len())
                    .max()
                    .unwrap_or(0)
                    .max(header.len())
            })
            .collect();

        for (header, width) in headers.iter().zip(&widths) {
            print!("{header:<width$}  ");
        }
        println!();

        for width in &widths {
            print!("{:-<width$}  ", "");
        }
        println!();

        for row in data {
            for (value, width) in row.iter().zip(&widths) {
                print!("{value:<width$}  ");
            }
            println!();
        }
    }
}
