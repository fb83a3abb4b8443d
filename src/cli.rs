use std::path::{Path, PathBuf};

mod check;
mod generate;
mod matrix;
mod terminal;

use check::Check;
use clap::ArgAction;
use generate::Generate;
use matrix::Matrix;
use tracing::instrument;

/// The configuration file used when `--config` is not given.
const DEFAULT_CONFIG: &str = "reqtest.toml";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config_path = self
            .config
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

        self.command.run(&config_path)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Generate the test case table for a requirements document
    Generate(Generate),

    /// Run the whole pipeline and report coverage without writing a table
    ///
    /// Exits with status 1 if the document cannot be turned into a complete,
    /// consistent set of test cases.
    Check(Check),

    /// Show the requirement to test case traceability matrix
    Matrix(Matrix),

    /// Show or modify configuration settings
    Config(Config),
}

impl Command {
    fn run(self, config_path: &Path) -> anyhow::Result<()> {
        match self {
            Self::Generate(command) => command.run(&load_config(config_path)?)?,
            Self::Check(command) => command.run(&load_config(config_path)?)?,
            Self::Matrix(command) => command.run(&load_config(config_path)?)?,
            Self::Config(command) => command.run(config_path)?,
        }
        Ok(())
    }
}

/// Loads the configuration, falling back to the defaults if the file does
/// not exist.
fn load_config(path: &Path) -> anyhow::Result<reqtest::Config> {
    if path.exists() {
        tracing::debug!("Loading configuration from {}", path.display());
        reqtest::Config::load(path).map_err(|e| anyhow::anyhow!("{e}"))
    } else {
        Ok(reqtest::Config::default())
    }
}

/// Reads a requirements document.
fn read_document(path: &Path) -> anyhow::Result<String> {
    use anyhow::Context;

    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read requirements document {}", path.display()))
}

#[derive(Debug, clap::Parser)]
pub struct Config {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Write the default configuration to the configuration file
    Init,

    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,

        /// Value to set
        value: String,
    },
}

impl Config {
    #[instrument]
    fn run(self, config_path: &Path) -> anyhow::Result<()> {
        use terminal::Colorize;

        match self.command {
            ConfigCommand::Show => {
                let config = load_config(config_path)?;

                println!("Configuration:");
                println!("  digits: {}", config.digits());
                println!("  link_levels: {}", config.link_levels);
                println!("  none_marker: {:?}", config.none_marker);
                println!("  safety_keywords: {}", config.safety_keywords().join(", "));

                let mut overrides = config.priority_overrides().peekable();
                if overrides.peek().is_some() {
                    println!("  priority_overrides:");
                    for (requirement, priority) in overrides {
                        println!("    {requirement}: {priority}");
                    }
                }

                let details = config.testing_details.entries();
                if !details.is_empty() {
                    println!("  testing_details:");
                    for (label, value) in details {
                        println!("    {label}: {value}");
                    }
                }

                if !config_path.exists() {
                    println!("{}", "(defaults; no configuration file found)".dim());
                }
            }
            ConfigCommand::Init => {
                if config_path.exists() {
                    anyhow::bail!(
                        "Configuration file {} already exists",
                        config_path.display()
                    );
                }
                reqtest::Config::default()
                    .save(config_path)
                    .map_err(|e| anyhow::anyhow!("{e}"))?;
                println!(
                    "{}",
                    format!("Created {}", config_path.display()).success()
                );
            }
            ConfigCommand::Set { key, value } => {
                let mut config = load_config(config_path)?;

                match key.as_str() {
                    "link_levels" => {
                        config.link_levels = value
                            .parse::<bool>()
                            .map_err(|_| anyhow::anyhow!("Value must be 'true' or 'false'"))?;
                    }
                    "none_marker" => config.none_marker = value,
                    "safety_keyword" => {
                        if !config.add_safety_keyword(&value) {
                            println!("{}", format!("'{value}' is already a safety keyword").dim());
                            return Ok(());
                        }
                    }
                    key if key.starts_with("details.") => {
                        let field = key.trim_start_matches("details.");
                        if !config.testing_details.set(field, value) {
                            anyhow::bail!(
                                "Unknown testing detail: {field}. Supported details: {}",
                                reqtest::TestingDetails::KEYS.join(", ")
                            );
                        }
                    }
                    key => {
                        let Some(requirement) = key.strip_prefix("priority.") else {
                            anyhow::bail!(
                                "Unknown configuration key: {key}. Supported keys: link_levels, \
                                 none_marker, safety_keyword, priority.<REQUIREMENT>, \
                                 details.<FIELD>"
                            );
                        };
                        let requirement: reqtest::RequirementId =
                            requirement.to_uppercase().parse()?;
                        let priority = parse_priority(&value)?;
                        config.set_priority_override(&requirement, priority);
                    }
                }

                config
                    .save(config_path)
                    .map_err(|e| anyhow::anyhow!("{e}"))?;
                println!("{}", format!("Updated {key}").success());
            }
        }

        Ok(())
    }
}

fn parse_priority(value: &str) -> anyhow::Result<reqtest::Priority> {
    match value.to_uppercase().as_str() {
        "P1" => Ok(reqtest::Priority::P1),
        "P2" => Ok(reqtest::Priority::P2),
        "P3" => Ok(reqtest::Priority::P3),
        _ => anyhow::bail!("Priority must be one of P1, P2 or P3"),
    }
}
