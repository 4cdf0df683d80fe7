use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Result, RootError};

/// Environment variable holding the module search path handed to
/// interpreters launched from this process.
pub const SEARCH_PATH_VAR: &str = "PYTHONPATH";

/// An ordered, separator-delimited list of directories stored in an
/// environment variable. Earlier entries shadow later ones.
#[derive(Debug, Clone)]
pub struct SearchPath {
    var: String,
}

impl SearchPath {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }

    pub fn entries(&self) -> Vec<PathBuf> {
        match env::var_os(&self.var) {
            Some(value) if !value.is_empty() => env::split_paths(&value).collect(),
            _ => Vec::new(),
        }
    }

    /// Puts `dir` at the front of the list. Nothing is removed; if `dir` is
    /// already the first entry the variable is left untouched.
    ///
    /// Mutates the process environment, so callers must not race this with
    /// other threads reading or writing environment variables.
    pub fn prepend(&self, dir: &Path) -> Result<()> {
        let mut entries = self.entries();
        if entries.first().map(PathBuf::as_path) == Some(dir) {
            return Ok(());
        }

        entries.insert(0, dir.to_path_buf());
        let joined: OsString = env::join_paths(&entries).map_err(|e| {
            RootError::InvalidInput(format!(
                "cannot add {} to {}: {}",
                dir.display(),
                self.var,
                e
            ))
        })?;

        // SAFETY: process environment writes are documented as requiring
        // external synchronisation by the caller.
        unsafe { env::set_var(&self.var, &joined) };
        info!("Prepended {} to {}", dir.display(), self.var);
        Ok(())
    }
}

impl Default for SearchPath {
    fn default() -> Self {
        Self::new(SEARCH_PATH_VAR)
    }
}
