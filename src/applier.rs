use std::env;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Result, RootError};
use crate::search_path::SearchPath;

/// Environment variable that receives the project root.
pub const PROJECT_ROOT_VAR: &str = "PROJECT_ROOT";

/// Name of the dotenv file loaded from the project root.
pub const DOTENV_FILE: &str = ".env";

/// Which side effects `set_root` performs. Each flag is independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RootOptions {
    /// Set `PROJECT_ROOT` to the root path
    pub project_root_env_var: bool,

    /// Load `<root>/.env` into the environment
    pub dotenv: bool,

    /// Prepend the root to the module search path
    #[serde(alias = "pythonpath")]
    pub search_path: bool,

    /// Change the working directory to the root
    pub cwd: bool,
}

impl Default for RootOptions {
    fn default() -> Self {
        Self {
            project_root_env_var: true,
            dotenv: true,
            search_path: false,
            cwd: false,
        }
    }
}

impl RootOptions {
    /// Every side effect disabled.
    pub fn none() -> Self {
        Self {
            project_root_env_var: false,
            dotenv: false,
            search_path: false,
            cwd: false,
        }
    }

    /// Every side effect enabled.
    pub fn all() -> Self {
        Self {
            project_root_env_var: true,
            dotenv: true,
            search_path: true,
            cwd: true,
        }
    }
}

/// Applies `path` as the project root to the running process.
///
/// Effects run in a fixed order: `PROJECT_ROOT`, then the `.env` file, then
/// the module search path, then the working directory. The existence of
/// `path` is checked before anything is changed. A missing `.env` file is not
/// an error, and variables already present are never overwritten by it.
///
/// This mutates process-wide state (environment and working directory) with
/// no locking. Callers on multiple threads must synchronise externally.
pub fn set_root(path: impl AsRef<Path>, options: RootOptions) -> Result<()> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RootError::RootPathNotFound(path.to_path_buf()));
    }

    if options.project_root_env_var {
        // SAFETY: see the thread-safety note on this function.
        unsafe { env::set_var(PROJECT_ROOT_VAR, path) };
        info!("Set {}={}", PROJECT_ROOT_VAR, path.display());
    }

    if options.dotenv {
        load_dotenv(path)?;
    }

    if options.search_path {
        SearchPath::default().prepend(path)?;
    }

    if options.cwd {
        env::set_current_dir(path).map_err(|e| RootError::io(path, e))?;
        info!("Changed working directory to {}", path.display());
    }

    Ok(())
}

fn load_dotenv(root: &Path) -> Result<()> {
    let dotenv_path = root.join(DOTENV_FILE);
    if !dotenv_path.is_file() {
        debug!("No {} in {}", DOTENV_FILE, root.display());
        return Ok(());
    }

    dotenvy::from_path(&dotenv_path)?;
    info!("Loaded {}", dotenv_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search_path::SEARCH_PATH_VAR;
    use crate::test_support::EnvGuard;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn root_dir() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        (temp, root)
    }

    fn env_only() -> RootOptions {
        RootOptions {
            project_root_env_var: true,
            ..RootOptions::none()
        }
    }

    #[test]
    fn test_default_options() {
        let options = RootOptions::default();
        assert!(options.project_root_env_var);
        assert!(options.dotenv);
        assert!(!options.search_path);
        assert!(!options.cwd);
    }

    #[test]
    fn test_env_var_only() {
        let _env = EnvGuard::acquire();
        let (_temp, root) = root_dir();
        let cwd_before = env::current_dir().unwrap();
        let search_path_before = env::var_os(SEARCH_PATH_VAR);

        set_root(&root, env_only()).unwrap();

        assert_eq!(env::var(PROJECT_ROOT_VAR).unwrap(), root.to_string_lossy());
        assert_eq!(env::current_dir().unwrap(), cwd_before);
        assert_eq!(env::var_os(SEARCH_PATH_VAR), search_path_before);
    }

    #[test]
    fn test_all_effects() {
        let mut env_guard = EnvGuard::acquire();
        env_guard.track("ROOTUTILS_TEST_ALL_EFFECTS");
        let (_temp, root) = root_dir();
        fs::write(
            root.join(".env"),
            "# comment\nROOTUTILS_TEST_ALL_EFFECTS=loaded\n",
        )
        .unwrap();

        set_root(&root, RootOptions::all()).unwrap();

        assert_eq!(env::current_dir().unwrap(), root);
        assert_eq!(SearchPath::default().entries()[0], root);
        assert_eq!(env::var("ROOTUTILS_TEST_ALL_EFFECTS").unwrap(), "loaded");
        assert_eq!(env::var(PROJECT_ROOT_VAR).unwrap(), root.to_string_lossy());
    }

    #[test]
    fn test_dotenv_does_not_override_existing() {
        let mut env_guard = EnvGuard::acquire();
        env_guard.track("ROOTUTILS_TEST_KEEP");
        let (_temp, root) = root_dir();
        fs::write(root.join(".env"), "ROOTUTILS_TEST_KEEP=from_file\n").unwrap();
        unsafe { env::set_var("ROOTUTILS_TEST_KEEP", "original") };

        set_root(&root, RootOptions { dotenv: true, ..RootOptions::none() }).unwrap();

        assert_eq!(env::var("ROOTUTILS_TEST_KEEP").unwrap(), "original");
    }

    #[test]
    fn test_dotenv_cannot_replace_project_root() {
        let _env = EnvGuard::acquire();
        let (_temp, root) = root_dir();
        fs::write(root.join(".env"), "PROJECT_ROOT=/somewhere/else\n").unwrap();

        set_root(&root, RootOptions::default()).unwrap();

        assert_eq!(env::var(PROJECT_ROOT_VAR).unwrap(), root.to_string_lossy());
    }

    #[test]
    fn test_missing_dotenv_is_tolerated() {
        let _env = EnvGuard::acquire();
        let (_temp, root) = root_dir();

        let result = set_root(&root, RootOptions::default());

        assert!(result.is_ok());
        assert_eq!(env::var(PROJECT_ROOT_VAR).unwrap(), root.to_string_lossy());
    }

    #[test]
    fn test_malformed_dotenv_is_reported() {
        let _env = EnvGuard::acquire();
        let (_temp, root) = root_dir();
        fs::write(root.join(".env"), "NOT A VALID LINE\n").unwrap();

        let err = set_root(&root, RootOptions { dotenv: true, ..RootOptions::none() })
            .unwrap_err();

        assert!(matches!(err, RootError::Dotenv(_)));
    }

    #[test]
    fn test_missing_root_applies_nothing() {
        let _env = EnvGuard::acquire();
        let (_temp, root) = root_dir();
        let missing = root.join("gone");
        unsafe { env::remove_var(PROJECT_ROOT_VAR) };
        let cwd_before = env::current_dir().unwrap();
        let search_path_before = env::var_os(SEARCH_PATH_VAR);

        let err = set_root(&missing, RootOptions::all()).unwrap_err();

        assert!(matches!(err, RootError::RootPathNotFound(ref p) if p == &missing));
        assert!(env::var_os(PROJECT_ROOT_VAR).is_none());
        assert_eq!(env::current_dir().unwrap(), cwd_before);
        assert_eq!(env::var_os(SEARCH_PATH_VAR), search_path_before);
    }

    #[test]
    fn test_cwd_into_file_is_io_error() {
        let _env = EnvGuard::acquire();
        let (_temp, root) = root_dir();
        let file = root.join("marker.txt");
        fs::write(&file, "").unwrap();

        let err = set_root(&file, RootOptions { cwd: true, ..RootOptions::none() }).unwrap_err();

        assert!(matches!(err, RootError::Io { .. }));
    }

    #[test]
    fn test_options_from_toml() {
        let options: RootOptions = toml::from_str("pythonpath = true\ndotenv = false").unwrap();
        assert!(options.search_path);
        assert!(!options.dotenv);
        assert!(options.project_root_env_var);
        assert!(!options.cwd);
    }
}
