use anyhow::{Context, Result};
use listquery::NormalizeOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "listquery.toml";

/// Configuration stored in listquery.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListQueryConfig {
    #[serde(default)]
    pub normalizer: NormalizeOptions,
}

impl ListQueryConfig {
    /// Load configuration from an explicit path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Use the explicit path when given, otherwise search from the current directory.
    /// Falls back to defaults when no file is found.
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        match Self::find_from(&current_dir) {
            Some(path) => Ok((Self::load(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Find listquery.toml in `start` or any ancestor.
    pub fn find_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }
}
