//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Roadmap | Read, rewrite and compile roadmaps | `fmt`, `parse`, `compile`, `validate` |
//! | Code | Short roadmap identifiers | `code encode`, `code decode`, `code new` |
//! | Config | Project and global settings | `config show`, `config set` |
//!
//! Roadmap commands read a file or stdin. `--json` switches the input from
//! indented text to a JSON roadmap document.
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! The default can be changed with `default_format` in the global config.
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! roadmapper --verbose compile plan.txt
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod code_cmd;
mod config_cmd;
mod output;
mod roadmap_cmd;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
