use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use rootutils::{Indicators, SetupConfig, find_root};

use crate::cli::{IndicatorArgs, resolve_indicators, resolve_search_from};

#[derive(Serialize)]
struct FindOutput {
    root: String,
}

pub fn find_cmd(
    path: Option<PathBuf>,
    indicator_args: &IndicatorArgs,
    json: bool,
    config: Option<&SetupConfig>,
) -> Result<()> {
    let search_from = resolve_search_from(path, config)?;
    let indicators = resolve_indicators(indicator_args, config, Indicators::default())?;

    let root = find_root(&search_from, &indicators)?;

    println!("{}", render(&root, json)?);
    Ok(())
}

fn render(root: &Path, json: bool) -> Result<String> {
    let root = root.to_string_lossy().to_string();
    if json {
        Ok(serde_json::to_string(&FindOutput { root })?)
    } else {
        Ok(root)
    }
}
