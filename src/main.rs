//! extip: External IP Info Service
//!
//! Entry point for the extip application.

use extip::config::{Cli, ClientConfig, Command, ConfigError, ServiceConfig, write_default_config};
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match &cli.command {
        Command::Init { output } => handle_init(output),
        Command::Client(_) => match ClientConfig::load(&cli) {
            Ok(config) => {
                setup_tracing(config.verbose);
                run_client(&config)
            }
            Err(e) => config_failure(&e),
        },
        Command::Service(_) => match ServiceConfig::load(&cli) {
            Ok(config) => {
                setup_tracing(config.verbose);
                tracing::info!("{config}");
                run_service(config)
            }
            Err(e) => config_failure(&e),
        },
    }
}

/// Handles the `init` subcommand.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

fn config_failure(error: &ConfigError) -> ExitCode {
    eprintln!("Configuration error: {error}");
    print_config_hint(error);
    exit_code::CONFIG_ERROR
}

/// Runs the service until a shutdown signal.
///
/// Excluded from coverage - requires async runtime.
#[cfg(not(tarpaulin_include))]
fn run_service(config: ServiceConfig) -> ExitCode {
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    match runtime.block_on(run::execute(config)) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::error!("Application error: {e}");
            exit_code::runtime_error()
        }
    }
}

/// Reads the state once and prints it.
///
/// Excluded from coverage - requires async runtime.
#[cfg(not(tarpaulin_include))]
fn run_client(config: &ClientConfig) -> ExitCode {
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    match runtime.block_on(run::fetch_rendered(config)) {
        Ok(output) => {
            println!("{output}");
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::runtime_error()
        }
    }
}
