//! Configuration CLI commands

use anyhow::{Context, Result};
use clap::Subcommand;

use super::output::Output;
use crate::storage::{Config, PROJECT_CONFIG_FILE};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Set a project configuration value
    ///
    /// Keys: date_format, base_url
    ///
    /// Writes roadmapper.toml in the project root, or in the current
    /// directory when no project config exists yet.
    Set {
        /// Configuration key
        key: String,

        /// New value
        value: String,
    },
}

pub fn run(cmd: ConfigCommands, output: &Output, config: &mut Config) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(output, config),
        ConfigCommands::Set { key, value } => set(output, config, &key, &value),
    }
}

fn show(output: &Output, config: &Config) -> Result<()> {
    let date_format = config.date_format(None);
    let base_url = config.base_url(None);
    let project_file = config
        .project_root
        .as_ref()
        .map(|root| root.join(PROJECT_CONFIG_FILE).display().to_string());
    let global_dir = Config::global_config_dir().map(|dir| dir.display().to_string());

    if output.is_json() {
        output.data(&serde_json::json!({
            "date_format": date_format.layout(),
            "base_url": base_url,
            "default_format": config.global.default_format,
            "project_config": project_file,
            "global_config_dir": global_dir,
        }));
        return Ok(());
    }

    output.row(&["date_format", date_format.layout()]);
    output.row(&["base_url", base_url.as_str()]);
    output.row(&["default_format", config.global.default_format.as_str()]);
    output.blank();
    output.row(&["project config", project_file.as_deref().unwrap_or("(none)")]);
    output.row(&["global config dir", global_dir.as_deref().unwrap_or("(none)")]);

    Ok(())
}

fn set(output: &Output, config: &mut Config, key: &str, value: &str) -> Result<()> {
    let root = match &config.project_root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    output.verbose_ctx("config", &format!("Project root: {}", root.display()));

    config.set(key, value)?;
    config.save_project(&root)?;
    config.project_root = Some(root.clone());

    if output.is_json() {
        output.data(&serde_json::json!({
            "key": key,
            "value": value,
            "path": root.join(PROJECT_CONFIG_FILE),
        }));
    } else {
        output.success(&format!("Set {} = {} in {}", key, value, root.join(PROJECT_CONFIG_FILE).display()));
    }

    Ok(())
}
