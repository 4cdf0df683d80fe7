use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::{debug, trace};

use crate::error::{Result, RootError};
use crate::indicators::Indicators;

/// Walks upward from `search_from` and returns the first directory whose
/// contents match at least one indicator. `search_from` may name a file, in
/// which case the walk starts at its parent directory.
pub fn find_root(search_from: impl AsRef<Path>, indicators: &Indicators) -> Result<PathBuf> {
    let search_from = resolve_search_path(search_from.as_ref())?;

    let mut current = if search_from.is_dir() {
        search_from
    } else {
        match search_from.parent() {
            Some(parent) => parent.to_path_buf(),
            None => search_from,
        }
    };

    loop {
        if let Some(pattern) = matching_indicator(&current, indicators) {
            debug!(
                "Found project root at {} (matched '{}')",
                current.display(),
                pattern
            );
            return Ok(current);
        }

        if !current.pop() {
            break;
        }
    }

    Err(RootError::RootNotFound {
        indicators: indicators.clone(),
    })
}

/// Makes `path` absolute and resolves symlinks. Fails if it does not exist.
fn resolve_search_path(path: &Path) -> Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(resolved) => Ok(resolved),
        // `file.txt/child` fails with NotADirectory but is just as absent.
        Err(e)
            if matches!(
                e.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
            ) || matches!(path.try_exists(), Ok(false)) =>
        {
            Err(RootError::SearchPathNotFound(path.to_path_buf()))
        }
        Err(e) => Err(RootError::io(path, e)),
    }
}

fn matching_indicator<'a>(dir: &Path, indicators: &'a Indicators) -> Option<&'a str> {
    trace!("Checking {}", dir.display());
    indicators.iter().find(|pattern| dir_matches(dir, pattern))
}

fn dir_matches(dir: &Path, pattern: &str) -> bool {
    if pattern.contains("**") {
        return recursive_glob_matches(dir, pattern);
    }

    let parts: Vec<&str> = pattern
        .split(std::path::is_separator)
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();

    matches_below(dir, &parts)
}

/// Matches pattern components one directory level at a time, so `dir` never
/// has to be valid UTF-8.
fn matches_below(dir: &Path, parts: &[&str]) -> bool {
    let Some((first, rest)) = parts.split_first() else {
        return true;
    };

    if !has_wildcard(first) {
        let next = dir.join(first);
        return if rest.is_empty() {
            next.exists()
        } else {
            next.is_dir() && matches_below(&next, rest)
        };
    }

    let Ok(component) = Pattern::new(first) else {
        return false;
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Cannot read {}: {}", dir.display(), e);
            return false;
        }
    };

    // Unreadable entries are skipped rather than failing the walk.
    entries.flatten().any(|entry| {
        component.matches_with(&entry.file_name().to_string_lossy(), MatchOptions::new())
            && (rest.is_empty() || matches_below(&entry.path(), rest))
    })
}

fn has_wildcard(component: &str) -> bool {
    component.contains(['*', '?', '['])
}

/// `**` spans directory levels, which only `glob::glob` handles.
fn recursive_glob_matches(dir: &Path, pattern: &str) -> bool {
    let Some(dir_str) = dir.to_str() else {
        debug!(
            "Skipping pattern '{}' in non UTF-8 directory {}",
            pattern,
            dir.display()
        );
        return false;
    };

    let full = Path::new(&Pattern::escape(dir_str)).join(pattern);

    match glob::glob(&full.to_string_lossy()) {
        Ok(mut entries) => entries.any(|entry| entry.is_ok()),
        Err(e) => {
            debug!("Skipping pattern '{}' in {}: {}", pattern, dir.display(), e);
            false
        }
    }
}
