use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use toml::Value as TomlValue;

use crate::applier::RootOptions;
use crate::error::RootError;
use crate::indicators::Indicators;

/// Root setup read from a TOML file.
///
/// ```toml
/// search_from = "services/api"
/// indicators = [".git", "Cargo.toml"]
/// project_root_env_var = true
/// dotenv = true
/// search_path = false
/// cwd = false
/// ```
#[derive(Debug, Deserialize, Default)]
pub struct SetupConfig {
    #[serde(default)]
    search_from: Option<TomlValue>,

    #[serde(default, alias = "indicator")]
    indicators: Option<TomlValue>,

    #[serde(flatten)]
    pub options: RootOptions,

    /// Directory of the file this was loaded from
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl SetupConfig {
    pub fn parse(contents: &str) -> Result<Self> {
        let config: SetupConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Start path. Relative paths resolve against the config file's directory.
    pub fn search_from(&self) -> Result<Option<PathBuf>, RootError> {
        let Some(value) = &self.search_from else {
            return Ok(None);
        };

        let TomlValue::String(raw) = value else {
            return Err(RootError::InvalidInput(format!(
                "search_from must be a path string, found {}",
                value.type_str()
            )));
        };

        let path = PathBuf::from(raw);
        match &self.base_dir {
            Some(base) if path.is_relative() => Ok(Some(base.join(path))),
            _ => Ok(Some(path)),
        }
    }

    pub fn indicators(&self) -> Result<Option<Indicators>, RootError> {
        self.indicators
            .as_ref()
            .map(Indicators::from_toml)
            .transpose()
    }
}

pub fn load_setup_config(path: &Path) -> Result<SetupConfig> {
    let contents = fs::read_to_string(path).with_context(|| {
        format!(
            "🛑 Failed to read config file: {}\n\
             → Check the path passed to --config.",
            path.display()
        )
    })?;

    let mut config = SetupConfig::parse(&contents).with_context(|| {
        format!(
            "🛑 Failed to parse TOML from: {}\n\
             → Expected keys: search_from, indicators, project_root_env_var, dotenv, search_path, cwd.",
            path.display()
        )
    })?;

    config.base_dir = path.parent().map(Path::to_path_buf);

    // Shape errors surface at load time rather than halfway through a run.
    config.search_from()?;
    config.indicators()?;

    Ok(config)
}
