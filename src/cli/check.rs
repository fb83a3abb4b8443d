use std::{path::PathBuf, process};

use clap::Parser;
use reqtest::{Config, Error, Pipeline, TestSuite};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Check that a requirements document yields complete coverage")]
pub struct Check {
    /// The requirements document (plain text or markdown)
    document: PathBuf,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Check {
    #[instrument(level = "debug", skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let document = super::read_document(&self.document)?;

        match Pipeline::new(config.clone()).run(&document) {
            Ok(suite) => match self.output {
                OutputFormat::Table => Self::output_table(&suite),
                OutputFormat::Json => Self::output_json(&suite)?,
            },
            Err(error) => {
                match self.output {
                    OutputFormat::Table => Self::report_table(&error),
                    OutputFormat::Json => Self::report_json(&error)?,
                }
                process::exit(1);
            }
        }

        Ok(())
    }

    fn output_table(suite: &TestSuite) {
        let summary = suite.matrix().summary();

        println!(
            "{}",
            format!(
                "✅ {} requirements covered by {} test cases",
                summary.requirements,
                summary.cases()
            )
            .success()
        );
        println!("  Unit:        {:>4}", summary.unit);
        println!("  Integration: {:>4}", summary.integration);
        println!("  Validation:  {:>4}", summary.validation);
        println!("  Coverage:    {:>5.1}%", summary.coverage());
        println!();
        println!("{}", format!("fingerprint {}", suite.table().fingerprint()).dim());
    }

    fn output_json(suite: &TestSuite) -> anyhow::Result<()> {
        use serde_json::json;

        let summary = suite.matrix().summary();
        let output = json!({
            "status": "ok",
            "summary": summary,
            "coverage": summary.coverage(),
            "fingerprint": suite.table().fingerprint(),
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn report_table(error: &Error) {
        match error {
            Error::Coverage(coverage) => {
                eprintln!(
                    "{}",
                    format!("❌ {} coverage issue(s) found", coverage.issues.len()).failure()
                );
                for issue in coverage.issues.iter() {
                    eprintln!("  • {issue}");
                }
            }
            error => eprintln!("{}", format!("❌ {error}").failure()),
        }
    }

    fn report_json(error: &Error) -> anyhow::Result<()> {
        use serde_json::json;

        let (stage, issues): (&str, Vec<String>) = match error {
            Error::Parse(error) => ("parse", vec![error.to_string()]),
            Error::Synthesis(error) => ("synthesis", vec![error.to_string()]),
            Error::Cycle(error) => ("dependency", vec![error.to_string()]),
            Error::Coverage(error) => (
                "coverage",
                error.issues.iter().map(ToString::to_string).collect(),
            ),
        };

        let output = json!({
            "status": "failed",
            "stage": stage,
            "issues": issues,
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
