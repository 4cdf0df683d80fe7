use std::fmt;
use std::path::Path;

use glob::Pattern;
use toml::Value as TomlValue;

use crate::error::{Result, RootError};

/// Marker files that identify a project root when no indicators are given.
pub const DEFAULT_INDICATORS: &[&str] = &[
    ".project-root",
    "setup.cfg",
    "setup.py",
    ".git",
    "pyproject.toml",
    "Cargo.toml",
];

/// Ordered, non-empty set of glob patterns. Finding at least one of them in a
/// directory marks that directory as the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicators {
    patterns: Vec<String>,
}

impl Indicators {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();

        if patterns.is_empty() {
            return Err(RootError::InvalidInput(
                "indicator set must contain at least one pattern".to_string(),
            ));
        }

        for pattern in &patterns {
            validate_pattern(pattern)?;
        }

        Ok(Self { patterns })
    }

    /// A single pattern, same as a one-element set.
    pub fn single(pattern: impl Into<String>) -> Result<Self> {
        Self::new([pattern.into()])
    }

    /// Accepts a string or an array of strings. Anything else, including an
    /// array with a non-string element, is rejected.
    pub fn from_toml(value: &TomlValue) -> Result<Self> {
        match value {
            TomlValue::String(s) => Self::single(s.as_str()),
            TomlValue::Array(items) => {
                let mut patterns = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        TomlValue::String(s) => patterns.push(s.clone()),
                        other => {
                            return Err(RootError::InvalidInput(format!(
                                "indicator must be a string or list of strings, found {} element",
                                other.type_str()
                            )));
                        }
                    }
                }
                Self::new(patterns)
            }
            other => Err(RootError::InvalidInput(format!(
                "indicator must be a string or list of strings, found {}",
                other.type_str()
            ))),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }
}

impl Default for Indicators {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_INDICATORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl fmt::Display for Indicators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.patterns.join(", "))
    }
}

fn validate_pattern(pattern: &str) -> Result<()> {
    if pattern.trim().is_empty() {
        return Err(RootError::InvalidInput(
            "indicator pattern must not be empty".to_string(),
        ));
    }

    // Patterns are matched inside each candidate directory.
    if Path::new(pattern).is_absolute() {
        return Err(RootError::InvalidInput(format!(
            "indicator pattern must be relative: '{}'",
            pattern
        )));
    }

    Pattern::new(pattern).map_err(|e| {
        RootError::InvalidInput(format!("invalid indicator pattern '{}': {}", pattern, e))
    })?;

    Ok(())
}
