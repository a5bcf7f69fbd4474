//! Configuration handling for Roadmapper
//!
//! Configuration is stored in `roadmapper.toml` (project, found by walking up
//! from the current directory) and `config.toml` in the user config
//! directory (global). `ROADMAPPER_CONFIG_DIR` overrides the global location.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{is_absolute, DateFormat, DEFAULT_LAYOUT};

/// Name of the project configuration file
pub const PROJECT_CONFIG_FILE: &str = "roadmapper.toml";

/// Environment variable overriding the global config directory
pub const CONFIG_DIR_ENV: &str = "ROADMAPPER_CONFIG_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Reference layout for dates, e.g. `2006-01-02`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,

    /// Base URL relative links are resolved against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let project_root = std::env::current_dir()
            .ok()
            .and_then(|dir| Self::find_project_root(&dir));

        let project = match &project_root {
            Some(root) => Self::load_project_config(root)?,
            None => ProjectConfig::default(),
        };

        Ok(Self {
            project,
            global,
            project_root,
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Some(PathBuf::from(dir));
        }

        ProjectDirs::from("app", "rdmp", "roadmapper").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(PROJECT_CONFIG_FILE);

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")
    }

    /// Finds the project root by looking for `roadmapper.toml` in `start` or a parent
    pub fn find_project_root(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(PROJECT_CONFIG_FILE).is_file() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Returns the effective date format: override, project, global, default
    pub fn date_format(&self, override_layout: Option<&str>) -> DateFormat {
        let layout = override_layout
            .or(self.project.date_format.as_deref())
            .or(self.global.date_format.as_deref())
            .unwrap_or(DEFAULT_LAYOUT);

        DateFormat::new(layout)
    }

    /// Returns the effective base URL: override, project, global, empty
    pub fn base_url(&self, override_url: Option<&str>) -> String {
        override_url
            .or(self.project.base_url.as_deref())
            .or(self.global.base_url.as_deref())
            .unwrap_or_default()
            .to_string()
    }

    /// Sets a project configuration key
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "date_format" => {
                if value.is_empty() {
                    return Err(ConfigError::Invalid("date_format can not be empty".to_string()));
                }
                self.project.date_format = Some(value.to_string());
            }
            "base_url" => {
                if !value.is_empty() && !is_absolute(value) {
                    return Err(ConfigError::Invalid(format!(
                        "base_url must be an absolute URL, got '{}'",
                        value
                    )));
                }
                self.project.base_url = Some(value.to_string());
            }
            _ => return Err(ConfigError::Invalid(format!("Unknown configuration key: {}", key))),
        }

        Ok(())
    }

    /// Saves the project configuration, creating `roadmapper.toml` in `root`
    pub fn save_project(&self, root: &Path) -> Result<()> {
        let config_path = root.join(PROJECT_CONFIG_FILE);

        let content =
            toml::to_string_pretty(&self.project).context("Failed to serialize project config")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write project config: {}", config_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config::default();

        assert_eq!(config.date_format(None).layout(), "2006-01-02");
        assert_eq!(config.base_url(None), "");
        assert_eq!(config.global.default_format, OutputFormat::Text);
    }

    #[test]
    fn parse_project_config() {
        let toml = r#"
date_format = "02/01/2006"
base_url = "https://example.com"
"#;

        let config: ProjectConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.date_format.as_deref(), Some("02/01/2006"));
        assert_eq!(config.base_url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn parse_global_config() {
        let toml = r#"
default_format = "json"
date_format = "Jan 2, 2006"
"#;

        let config: GlobalConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.default_format, OutputFormat::Json);
        assert_eq!(config.date_format.as_deref(), Some("Jan 2, 2006"));
        assert_eq!(config.base_url, None);
    }

    #[test]
    fn precedence_is_override_project_global() {
        let config = Config {
            project: ProjectConfig {
                date_format: Some("02/01/2006".to_string()),
                base_url: None,
            },
            global: GlobalConfig {
                default_format: OutputFormat::Text,
                date_format: Some("Jan 2, 2006".to_string()),
                base_url: Some("https://global.example.com".to_string()),
            },
            project_root: None,
        };

        assert_eq!(config.date_format(None).layout(), "02/01/2006");
        assert_eq!(config.date_format(Some("2006")).layout(), "2006");
        assert_eq!(config.base_url(None), "https://global.example.com");
        assert_eq!(config.base_url(Some("https://cli.example.com")), "https://cli.example.com");
    }

    #[test]
    fn find_project_root_walks_up() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PROJECT_CONFIG_FILE), "").unwrap();

        let sub_dir = dir.path().join("sub").join("dir");
        fs::create_dir_all(&sub_dir).unwrap();

        let root = Config::find_project_root(&sub_dir);
        assert_eq!(root.as_deref(), Some(dir.path()));
    }

    #[test]
    fn find_project_root_without_config() {
        let dir = TempDir::new().unwrap();

        // a config file in a real parent of the temp dir would be found, so only
        // check that the temp dir itself is not reported
        let root = Config::find_project_root(dir.path());
        assert_ne!(root.as_deref(), Some(dir.path()));
    }

    #[test]
    fn set_validates_keys_and_values() {
        let mut config = Config::default();

        assert!(config.set("date_format", "02/01/2006").is_ok());
        assert!(config.set("base_url", "https://example.com").is_ok());
        assert!(config.set("base_url", "").is_ok());
        assert!(matches!(config.set("base_url", "docs"), Err(ConfigError::Invalid(_))));
        assert!(matches!(config.set("date_format", ""), Err(ConfigError::Invalid(_))));
        assert!(matches!(config.set("colour", "red"), Err(ConfigError::Invalid(_))));

        assert_eq!(config.project.date_format.as_deref(), Some("02/01/2006"));
        assert_eq!(config.project.base_url.as_deref(), Some(""));
    }

    #[test]
    fn save_and_reload_project_config() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.set("date_format", "2006.01.02").unwrap();
        config.save_project(dir.path()).unwrap();

        let loaded = Config::load_project_config(dir.path()).unwrap();
        assert_eq!(loaded, config.project);
    }

    #[test]
    fn invalid_project_config_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PROJECT_CONFIG_FILE), "date_format = [").unwrap();

        assert!(Config::load_project_config(dir.path()).is_err());
    }
}
