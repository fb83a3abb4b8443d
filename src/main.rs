//! `reqtest`: generate test case tables from requirements documents.

mod cli;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
