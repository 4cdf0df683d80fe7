//! rootutils CLI
//!
//! Finds the project root from wherever you are and runs commands from it with
//! `PROJECT_ROOT`, the root's `.env` and the search path already in place.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::{
    find::find_cmd,
    run::{RunRequest, run_cmd},
};
use rootutils::load_setup_config;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli
        .config
        .as_deref()
        .map(load_setup_config)
        .transpose()?;

    match cli.command {
        Commands::Find {
            path,
            indicators,
            json,
        } => {
            find_cmd(path, &indicators, json, config.as_ref())?;
        }

        Commands::Run {
            from,
            auto,
            indicators,
            effects,
            command,
        } => {
            let code = run_cmd(
                RunRequest {
                    from,
                    auto,
                    indicators: &indicators,
                    effects: &effects,
                    command: &command,
                },
                config.as_ref(),
            )?;
            std::process::exit(code);
        }
    }

    Ok(())
}
