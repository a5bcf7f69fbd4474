//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::roadmap_cmd::{self, RoadmapArgs};
use super::{code_cmd, config_cmd};
use crate::storage::Config;

#[derive(Parser)]
#[command(name = "roadmapper")]
#[command(author, version, about = "Roadmaps written as plain indented text")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured default_format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite a roadmap as canonical text
    ///
    /// Examples:
    ///   roadmapper fmt plan.txt               # Print the formatted roadmap
    ///   roadmapper fmt plan.txt -o plan.txt   # Format in place
    ///   roadmapper fmt --json plan.json       # Convert a JSON document to text
    Fmt {
        #[command(flatten)]
        args: RoadmapArgs,

        /// Output file (writes to stdout when omitted or `-`)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Print a roadmap as a JSON document with a short-code id
    Parse {
        #[command(flatten)]
        args: RoadmapArgs,
    },

    /// Infer missing dates, colors and progress, and print the result
    Compile {
        #[command(flatten)]
        args: RoadmapArgs,
    },

    /// Check that a roadmap has a title, a date format and valid projects
    Validate {
        #[command(flatten)]
        args: RoadmapArgs,
    },

    /// Encode, decode and generate short codes
    #[command(subcommand)]
    Code(code_cmd::CodeCommands),

    /// Show or change configuration
    #[command(subcommand)]
    Config(config_cmd::ConfigCommands),
}

/// Main entry point for the CLI
///
/// Failures are reported through [`Output::error`] before being returned,
/// so JSON mode gets a JSON error on stderr.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load();

    let format = cli
        .format
        .or_else(|| config.as_ref().ok().map(|c| c.global.default_format))
        .unwrap_or_default();
    let output = Output::new(format, cli.verbose);

    let result = config.and_then(|mut config| execute(cli.command, &output, &mut config));
    if let Err(e) = &result {
        output.error(&format!("{:#}", e));
    }

    result
}

fn execute(command: Commands, output: &Output, config: &mut Config) -> Result<()> {
    output.verbose("Roadmapper starting");
    match &config.project_root {
        Some(root) => output.verbose_ctx("config", &format!("Project root: {}", root.display())),
        None => output.verbose_ctx("config", "No project config found"),
    }

    match command {
        Commands::Fmt { args, output: target } => {
            output.verbose_ctx("fmt", &format!("Formatting, output: {:?}", target));
            roadmap_cmd::fmt(output, config, &args, target.as_deref())?
        }
        Commands::Parse { args } => roadmap_cmd::parse(output, config, &args)?,
        Commands::Compile { args } => roadmap_cmd::compile(output, config, &args)?,
        Commands::Validate { args } => roadmap_cmd::validate(output, config, &args)?,
        Commands::Code(cmd) => code_cmd::run(cmd, output)?,
        Commands::Config(cmd) => config_cmd::run(cmd, output, config)?,
    }

    Ok(())
}
