use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow};
use tracing::info;

use rootutils::{AUTOSETUP_INDICATOR, Indicators, RootOptions, SetupConfig, autosetup, setup_root};

use crate::cli::{
    EffectArgs, IndicatorArgs, resolve_indicators, resolve_options, resolve_search_from,
};

pub struct RunRequest<'a> {
    pub from: Option<PathBuf>,
    pub auto: bool,
    pub indicators: &'a IndicatorArgs,
    pub effects: &'a EffectArgs,
    pub command: &'a [String],
}

/// Applies the root to this process, then runs the command so it inherits the
/// environment and working directory. Returns the command's exit code.
pub fn run_cmd(request: RunRequest<'_>, config: Option<&SetupConfig>) -> Result<i32> {
    let (program, args) = request
        .command
        .split_first()
        .ok_or_else(|| anyhow!("No command given to run"))?;

    let base_options = config.map(|c| c.options).unwrap_or_default();

    let root = if request.auto {
        // Same defaults as the library's autosetup entry point.
        let indicators = resolve_indicators(
            request.indicators,
            config,
            Indicators::single(AUTOSETUP_INDICATOR)?,
        )?;
        let base = match config {
            Some(c) => c.options,
            None => RootOptions {
                search_path: true,
                ..RootOptions::default()
            },
        };
        autosetup(&indicators, resolve_options(request.effects, base))?
    } else {
        let search_from = resolve_search_from(request.from, config)?;
        let indicators = resolve_indicators(request.indicators, config, Indicators::default())?;
        setup_root(
            &search_from,
            &indicators,
            resolve_options(request.effects, base_options),
        )?
    };

    info!("Running `{}` with project root {}", program, root.display());

    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to run command: {}", program))?;

    // Killed by a signal: report as a generic failure.
    Ok(status.code().unwrap_or(1))
}
