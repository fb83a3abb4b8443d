use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use reqtest::{Config, Pipeline, Table, TestLevel};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Generate the test case table for a requirements document")]
pub struct Generate {
    /// The requirements document (plain text or markdown)
    document: PathBuf,

    /// Output format
    #[arg(long, short, value_name = "FORMAT", default_value = "csv")]
    format: OutputFormat,

    /// Write the table to this file instead of stdout
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Only emit the test cases of one testing level
    #[arg(long, short, value_name = "LEVEL", conflicts_with = "split")]
    level: Option<Level>,

    /// Write one file per testing level, named after --output (e.g.
    /// cases-unit.csv)
    #[arg(long, requires = "output")]
    split: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Level {
    Unit,
    Integration,
    Validation,
}

impl From<Level> for TestLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Unit => Self::Unit,
            Level::Integration => Self::Integration,
            Level::Validation => Self::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Csv,
    Tsv,
    Markdown,
    Json,
}

impl From<OutputFormat> for reqtest::Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => Self::Csv,
            OutputFormat::Tsv => Self::Tsv,
            OutputFormat::Markdown => Self::Markdown,
            OutputFormat::Json => Self::Json,
        }
    }
}

impl Generate {
    #[instrument(level = "debug", skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let document = super::read_document(&self.document)?;
        let suite = Pipeline::new(config.clone()).run(&document)?;
        let table = match self.level {
            Some(level) => suite.table().for_level(level.into()),
            None => suite.table().clone(),
        };

        match &self.output {
            Some(path) if self.split => {
                for level in TestLevel::ALL {
                    self.write(&table.for_level(level), &level_path(path, level))?;
                }
            }
            Some(path) => self.write(&table, path)?,
            None => print!("{}", table.encode(self.format.into())),
        }

        Ok(())
    }

    fn write(&self, table: &Table, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, table.encode(self.format.into()))
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!(
            "{}",
            format!("Wrote {} test cases to {}", table.len(), path.display()).success()
        );
        Ok(())
    }
}

/// `cases.csv` becomes `cases-unit.csv` for the unit level.
fn level_path(path: &Path, level: TestLevel) -> PathBuf {
    let stem = path
        .file_stem()
        .map_or_else(|| "cases".into(), |stem| stem.to_string_lossy());
    let level = level.to_string().to_lowercase();
    let name = match path.extension() {
        Some(extension) => format!("{stem}-{level}.{}", extension.to_string_lossy()),
        None => format!("{stem}-{level}"),
    };
    path.with_file_name(name)
}
