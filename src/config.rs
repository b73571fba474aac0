use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, TaskListError};
use crate::model::{Filter, Preferences, SortBy, Theme};

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Defaults used until preferences have been saved.
#[derive(Debug, Deserialize, Serialize)]
pub struct GeneralConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            filter: default_filter(),
            sort_by: default_sort_by(),
        }
    }
}

fn default_theme() -> String {
    Theme::default().to_string()
}

fn default_filter() -> String {
    Filter::default().to_string()
}

fn default_sort_by() -> String {
    SortBy::default().to_string()
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Storage directory; `~` is expanded. Defaults to `~/.tasklist`.
    #[serde(default)]
    pub path: Option<String>,
}

impl Config {
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| TaskListError::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TaskListError::Config("Could not find config directory".into()))?;
        Ok(config_dir.join("tasklist").join("config.toml"))
    }

    pub fn preferences(&self) -> Result<Preferences> {
        Ok(Preferences {
            filter: self.general.filter.parse()?,
            sort_by: self.general.sort_by.parse()?,
            theme: self.general.theme.parse()?,
        })
    }
}
