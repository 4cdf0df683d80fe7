use std::path::PathBuf;

use thiserror::Error;

use crate::indicators::Indicators;

/// Errors raised while locating or applying a project root.
#[derive(Debug, Error)]
pub enum RootError {
    /// A caller-supplied argument has the wrong shape
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Search path does not exist: {}", .0.display())]
    SearchPathNotFound(PathBuf),

    #[error("Project root directory not found. Indicators: {indicators}")]
    RootNotFound { indicators: Indicators },

    #[error("Project root path does not exist: {}", .0.display())]
    RootPathNotFound(PathBuf),

    #[error("Failed to load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RootError {
    /// The start path, the root path, or any matching ancestor is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RootError::SearchPathNotFound(_)
                | RootError::RootNotFound { .. }
                | RootError::RootPathNotFound(_)
        )
    }

    /// An argument was rejected before touching the filesystem.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, RootError::InvalidInput(_))
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RootError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RootError>;
