//! # Application Configuration
//!
//! Settings are read from a YAML file and then overridden by environment
//! variables; the CLI applies its own flags last.
//!
//! ## File Location
//!
//! ```text
//! <config_dir>/savings-tracker/config.yaml
//! ```
//!
//! ## YAML Format
//!
//! ```yaml
//! api_url: "https://script.google.com/macros/s/.../exec"
//! data_dir: "/home/user/.local/share/savings-tracker"
//! output_dir: "/home/user/Documents/savings-reports"
//! top_persons: 5
//! lines_per_page: 40
//! log_level: "info"
//! ```
//!
//! A missing file means defaults. Any field left out of the file keeps its
//! default.

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::domain::aggregator::DEFAULT_TOP_PERSONS;
use crate::backend::domain::export_service::ExportConfig;
use crate::backend::BackendOptions;

pub const APP_DIR_NAME: &str = "savings-tracker";
pub const CONFIG_FILE_NAME: &str = "config.yaml";

pub const ENV_API_URL: &str = "SAVINGS_TRACKER_API_URL";
pub const ENV_DATA_DIR: &str = "SAVINGS_TRACKER_DATA_DIR";
pub const ENV_OUTPUT_DIR: &str = "SAVINGS_TRACKER_OUTPUT_DIR";
pub const ENV_LOG_LEVEL: &str = "SAVINGS_TRACKER_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Endpoint of the sheets API
    pub api_url: String,
    /// Where the local cache mirror lives
    pub data_dir: PathBuf,
    /// Where charts and exported reports are written
    pub output_dir: PathBuf,
    pub top_persons: usize,
    pub lines_per_page: usize,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR_NAME);
        let output_dir = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR_NAME);

        Self {
            api_url: String::new(),
            data_dir,
            output_dir,
            top_persons: DEFAULT_TOP_PERSONS,
            lines_per_page: ExportConfig::default().lines_per_page,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// `<config_dir>/savings-tracker/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from `path`, or from the default location when `path` is `None`.
    /// Environment overrides are applied on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Read a YAML file; a file that does not exist yields the defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: AppConfig = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Write the config as YAML, creating the parent directory
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let yaml_content = serde_yaml::to_string(self)?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, path)?;

        debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Apply environment-style overrides; `lookup` returns a variable's value
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            bail!(
                "api_url is not configured; set it in {} or via {}",
                CONFIG_FILE_NAME,
                ENV_API_URL
            );
        }
        if self.lines_per_page == 0 {
            bail!("lines_per_page must be at least 1");
        }
        Ok(())
    }

    pub fn backend_options(&self) -> BackendOptions {
        BackendOptions {
            top_persons: self.top_persons,
            export: ExportConfig {
                lines_per_page: self.lines_per_page,
                ..ExportConfig::default()
            },
            output_dir: self.output_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = AppConfig::from_file(&temp_dir.path().join("config.yaml")).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.top_persons, 5);
        assert_eq!(config.lines_per_page, 40);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "api_url: \"https://example.test/exec\"\ntop_persons: 3\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.api_url, "https://example.test/exec");
        assert_eq!(config.top_persons, 3);
        assert_eq!(config.lines_per_page, 40);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested").join("config.yaml");

        let config = AppConfig {
            api_url: "https://example.test/exec".to_string(),
            lines_per_page: 25,
            ..AppConfig::default()
        };
        config.save(&path).unwrap();

        assert_eq!(AppConfig::from_file(&path).unwrap(), config);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "top_persons: [not a number\n").unwrap();

        assert!(AppConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_URL, "https://override.test/exec"),
            (ENV_OUTPUT_DIR, "/tmp/reports"),
            (ENV_LOG_LEVEL, "debug"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        let data_dir = config.data_dir.clone();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.api_url, "https://override.test/exec");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.data_dir, data_dir);
    }

    #[test]
    fn test_validate() {
        assert!(AppConfig::default().validate().is_err());

        let config = AppConfig {
            api_url: "https://example.test/exec".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.backend_options().export.lines_per_page, 40);
    }
}
