//! Command definitions and handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use chainwatch_config::{
    load_tree, load_tree_lenient, validate_references, ConfigError, ConfigLoadResult,
};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging() {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init()
}

#[derive(Parser)]
#[command(name = "chainwatch", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a configuration tree (schema, defaults, cross-references)
    Validate(ValidateArgs),
    /// Summarize the resources a configuration tree defines
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Root configuration file (YAML or JSON)
    pub path: PathBuf,

    /// Emit the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Demote duplicate names, dangling references and missing env vars
    /// to warnings
    #[arg(long)]
    pub lenient: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Root configuration file (YAML or JSON)
    pub path: PathBuf,
}

fn load(path: &PathBuf, lenient: bool) -> Result<ConfigLoadResult, ConfigError> {
    if lenient {
        load_tree_lenient(path)
    } else {
        load_tree(path)
    }
}

pub fn run_validate(args: ValidateArgs) -> ExitCode {
    match load(&args.path, args.lenient) {
        Ok(result) => {
            let report = validate_references(&result.config);
            if args.json {
                let payload = serde_json::json!({
                    "valid": true,
                    "metadata": result.metadata,
                    "cross_references": report,
                });
                println!("{}", serde_json::to_string_pretty(&payload).unwrap());
            } else {
                for warning in &result.metadata.validation_warnings {
                    println!("warning: {warning}");
                }
                println!(
                    "OK: {} files, {} resources ({} channels, {} watchlists, {} agents)",
                    result.metadata.files_loaded.len(),
                    result.metadata.total_resources,
                    result.metadata.resource_counts.notification_channels,
                    result.metadata.resource_counts.watchlists,
                    result.metadata.resource_counts.custom_agents,
                );
            }
            ExitCode::SUCCESS
        }
        Err(ConfigError::Invalid(errors)) => {
            if args.json {
                let payload = serde_json::json!({
                    "valid": false,
                    "errors": errors,
                });
                println!("{}", serde_json::to_string_pretty(&payload).unwrap());
            } else {
                for error in &errors {
                    eprintln!("error: {error}");
                }
                eprintln!("{} error(s) found", errors.len());
            }
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

pub fn run_inspect(args: InspectArgs) -> ExitCode {
    match load(&args.path, true) {
        Ok(result) => {
            let counts = result.metadata.resource_counts;
            println!("files loaded ({}):", result.metadata.files_loaded.len());
            for file in &result.metadata.files_loaded {
                println!("  {}", file.display());
            }
            println!("notification_channels: {}", counts.notification_channels);
            println!("watchlists:            {}", counts.watchlists);
            println!("custom_agents:         {}", counts.custom_agents);
            println!("total:                 {}", result.metadata.total_resources);
            println!("load time:             {} ms", result.metadata.load_time_ms);
            for warning in &result.metadata.validation_warnings {
                println!("warning: {warning}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
