use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use rootutils::{Indicators, RootOptions, SetupConfig};

#[derive(Parser)]
#[command(
    name = "rootutils",
    version,
    about = "Find a project's root by its marker files and run things from it.",
    long_about = None
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// TOML file with search_from, indicators and the root options
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the project root
    Find {
        /// File or directory to start searching from (default: current dir)
        path: Option<PathBuf>,

        #[command(flatten)]
        indicators: IndicatorArgs,

        /// Print {"root": "..."} instead of the bare path
        #[arg(long)]
        json: bool,
    },
    /// Apply the project root to the environment and run a command in it
    Run {
        /// File or directory to start searching from
        #[arg(long, value_name = "PATH", conflicts_with = "auto")]
        from: Option<PathBuf>,

        /// Infer the starting point from this executable's location
        #[arg(long)]
        auto: bool,

        #[command(flatten)]
        indicators: IndicatorArgs,

        #[command(flatten)]
        effects: EffectArgs,

        /// Command to run, with its arguments
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct IndicatorArgs {
    /// Marker file pattern; repeat for several (default: built-in set)
    #[arg(short = 'i', long = "indicator", value_name = "PATTERN")]
    pub patterns: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub struct EffectArgs {
    /// Don't set PROJECT_ROOT
    #[arg(long)]
    pub no_env_var: bool,

    /// Don't load <root>/.env
    #[arg(long)]
    pub no_dotenv: bool,

    /// Prepend the root to the module search path
    #[arg(long)]
    pub search_path: bool,

    /// Change into the root before running the command
    #[arg(long)]
    pub cwd: bool,
}

/// Command-line patterns win over the config file, which wins over `fallback`.
pub fn resolve_indicators(
    args: &IndicatorArgs,
    config: Option<&SetupConfig>,
    fallback: Indicators,
) -> anyhow::Result<Indicators> {
    if !args.patterns.is_empty() {
        return Ok(Indicators::new(args.patterns.iter().cloned())?);
    }

    if let Some(indicators) = config.map(SetupConfig::indicators).transpose()?.flatten() {
        return Ok(indicators);
    }

    Ok(fallback)
}

/// Flags only ever move options away from their configured value.
pub fn resolve_options(args: &EffectArgs, base: RootOptions) -> RootOptions {
    RootOptions {
        project_root_env_var: base.project_root_env_var && !args.no_env_var,
        dotenv: base.dotenv && !args.no_dotenv,
        search_path: base.search_path || args.search_path,
        cwd: base.cwd || args.cwd,
    }
}

pub fn resolve_search_from(
    cli_path: Option<PathBuf>,
    config: Option<&SetupConfig>,
) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli_path {
        return Ok(path);
    }

    if let Some(path) = config.map(SetupConfig::search_from).transpose()?.flatten() {
        return Ok(path);
    }

    Ok(std::env::current_dir()?)
}
