//! Settings: where the data lives and first-run behaviour
//!
//! The data directory is resolved in this order: explicit override (CLI
//! flag), the `STUDYLOG_DATA_DIR` environment variable, `data_dir` in the
//! default directory's `config.toml`, then the platform default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::storage::{Result, StudyError};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "STUDYLOG_DATA_DIR";

/// Settings file name inside the data directory
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Keep the collections somewhere other than the default directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Write sample sessions when the store is opened for the first time
    #[serde(default = "default_seed_sample_data")]
    pub seed_sample_data: bool,
}

fn default_seed_sample_data() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            seed_sample_data: default_seed_sample_data(),
        }
    }
}

impl Config {
    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("studylog"))
            .ok_or(StudyError::DataDirNotFound)
    }

    /// Load `config.toml` from `dir`; a missing file means defaults
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the data directory and the settings that apply to it
    pub fn resolve(explicit: Option<PathBuf>) -> Result<(PathBuf, Config)> {
        let from_env = std::env::var_os(DATA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::resolve_from(explicit, from_env, Self::default_data_dir())
    }

    fn resolve_from(
        explicit: Option<PathBuf>,
        from_env: Option<PathBuf>,
        default_dir: Result<PathBuf>,
    ) -> Result<(PathBuf, Config)> {
        if let Some(dir) = explicit.or(from_env) {
            let config = Self::load(&dir)?;
            return Ok((dir, config));
        }

        let default_dir = default_dir?;
        let config = Self::load(&default_dir)?;
        match &config.data_dir {
            Some(dir) => {
                log::debug!("Using data directory {:?} from {}", dir, CONFIG_FILE);
                Ok((dir.clone(), config))
            }
            None => Ok((default_dir, config)),
        }
    }
}
