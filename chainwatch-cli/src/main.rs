//! ## chainwatch-cli
//! **Operational interface for the configuration system**
//!
//! Validates and inspects Chainwatch configuration trees without starting
//! the monitoring runtime.

use std::process::ExitCode;

use clap::Parser;

mod commands;

use commands::{Cli, Commands};

fn main() -> ExitCode {
    commands::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate(args) => commands::run_validate(args),
        Commands::Inspect(args) => commands::run_inspect(args),
    }
}
