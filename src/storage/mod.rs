//! # Storage Layer
//!
//! Configuration and file handling for Roadmapper.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Roadmap | Indented plain text | any file, or stdin/stdout |
//! | Project config | TOML | `roadmapper.toml` (current dir or a parent) |
//! | Global config | TOML | `config.toml` in the user config directory |
//!
//! ## Write Safety
//!
//! Roadmap files are written atomically (temp file + rename), so a failed
//! `fmt -o` never leaves a half-written roadmap behind.
//!
//! ## Key Types
//!
//! - [`Config`] - Project and global configuration, with precedence rules
//! - [`read_content`] / [`write_output`] - Roadmap text I/O

mod config;
mod io;

pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig, CONFIG_DIR_ENV, PROJECT_CONFIG_FILE};
pub use io::{read_content, write_output};
