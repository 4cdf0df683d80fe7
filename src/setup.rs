use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::applier::{RootOptions, set_root};
use crate::error::{Result, RootError};
use crate::indicators::Indicators;
use crate::locator::find_root;

/// Marker used by `autosetup` when the caller has no opinion.
pub const AUTOSETUP_INDICATOR: &str = ".project-root";

/// Finds the project root from `search_from` and applies it with `options`.
/// If no root is found nothing is applied.
pub fn setup_root(
    search_from: impl AsRef<Path>,
    indicators: &Indicators,
    options: RootOptions,
) -> Result<PathBuf> {
    let root = find_root(search_from, indicators)?;
    set_root(&root, options)?;
    Ok(root)
}

/// Like `setup_root`, but starts from the running executable's location.
///
/// Falls back to the current working directory when the executable looks
/// like a test harness binary or cannot be located.
pub fn autosetup(indicators: &Indicators, options: RootOptions) -> Result<PathBuf> {
    let search_from = infer_search_from()?;
    debug!("autosetup searching from {}", search_from.display());
    setup_root(search_from, indicators, options)
}

fn infer_search_from() -> Result<PathBuf> {
    let cwd = env::current_dir().map_err(|e| RootError::io(".", e))?;

    let Some(program) = env::args_os().next().map(PathBuf::from) else {
        return Ok(cwd);
    };

    let program = if program.is_absolute() {
        program
    } else if program.components().count() > 1 {
        cwd.join(program)
    } else {
        // Bare program name, resolved through PATH; use the executable itself.
        match env::current_exe() {
            Ok(exe) => exe,
            Err(_) => return Ok(cwd),
        }
    };

    if !program.exists() || is_test_harness(&program) {
        return Ok(cwd);
    }

    Ok(program)
}

/// Test binaries are built into `target/<profile>/deps/`.
fn is_test_harness(program: &Path) -> bool {
    program
        .parent()
        .and_then(Path::file_name)
        .is_some_and(|dir| dir == OsStr::new("deps"))
}
