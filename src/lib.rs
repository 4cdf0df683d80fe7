//! rootutils
//!
//! Finds a project's root directory by walking up from a starting path until a
//! marker file (`.project-root`, `.git`, `Cargo.toml`, ...) turns up, then
//! applies that root to the running process: `PROJECT_ROOT`, the root's `.env`
//! file, the module search path and the working directory.
//!
//! Applying a root mutates process-wide state. None of it is locked, so
//! callers on multiple threads must synchronise around `set_root`,
//! `setup_root` and `autosetup`.

pub mod applier;
pub mod config;
pub mod error;
pub mod indicators;
pub mod locator;
pub mod search_path;
pub mod setup;

pub use applier::{DOTENV_FILE, PROJECT_ROOT_VAR, RootOptions, set_root};
pub use config::{SetupConfig, load_setup_config};
pub use error::{Result, RootError};
pub use indicators::{DEFAULT_INDICATORS, Indicators};
pub use locator::find_root;
pub use search_path::{SEARCH_PATH_VAR, SearchPath};
pub use setup::{AUTOSETUP_INDICATOR, autosetup, setup_root};

#[cfg(test)]
pub(crate) mod test_support {
    use std::env;
    use std::ffi::OsString;
    use std::path::PathBuf;
    use std::sync::{Mutex, MutexGuard};

    use crate::applier::PROJECT_ROOT_VAR;
    use crate::search_path::SEARCH_PATH_VAR;

    /// Serialises tests that touch the environment or working directory.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Holds the lock and puts `PROJECT_ROOT`, the search path, any tracked
    /// variables and the working directory back the way they were on drop.
    pub struct EnvGuard {
        project_root: Option<OsString>,
        search_path: Option<OsString>,
        tracked: Vec<(String, Option<OsString>)>,
        cwd: PathBuf,
        _lock: MutexGuard<'static, ()>,
    }

    impl EnvGuard {
        pub fn acquire() -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            Self {
                project_root: env::var_os(PROJECT_ROOT_VAR),
                search_path: env::var_os(SEARCH_PATH_VAR),
                tracked: Vec::new(),
                cwd: env::current_dir().unwrap(),
                _lock: lock,
            }
        }

        /// Restore `key` to its current value on drop, even if the test panics.
        pub fn track(&mut self, key: &str) {
            self.tracked.push((key.to_string(), env::var_os(key)));
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            let _ = env::set_current_dir(&self.cwd);
            restore(PROJECT_ROOT_VAR, self.project_root.take());
            restore(SEARCH_PATH_VAR, self.search_path.take());
            for (key, value) in self.tracked.drain(..).rev() {
                restore(&key, value);
            }
        }
    }

    fn restore(key: &str, value: Option<OsString>) {
        unsafe {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}
