//! Short-code CLI commands

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Subcommand;

use super::output::Output;
use crate::domain::Code;

#[derive(Subcommand)]
pub enum CodeCommands {
    /// Encode a numeric roadmap id as a short code
    Encode {
        /// Numeric id
        id: u64,
    },

    /// Decode a short code into its numeric roadmap id
    Decode {
        /// Short code, e.g. "aB3"
        code: String,
    },

    /// Generate a new pseudo-random short code
    New {
        /// Seed mixed with the current time
        #[arg(long, default_value = "")]
        seed: String,
    },
}

pub fn run(cmd: CodeCommands, output: &Output) -> Result<()> {
    match cmd {
        CodeCommands::Encode { id } => encode(output, id),
        CodeCommands::Decode { code } => decode(output, &code),
        CodeCommands::New { seed } => generate(output, &seed),
    }
}

/// Prints both forms in JSON mode, or just `text` otherwise
fn print_code(output: &Output, code: Code, text: &str) {
    if output.is_json() {
        output.data(&serde_json::json!({
            "id": code.id(),
            "code": code.to_string(),
        }));
    } else {
        output.success(text);
    }
}

fn encode(output: &Output, id: u64) -> Result<()> {
    let code = Code::from_id(id).with_context(|| format!("Can not encode id {}", id))?;
    output.verbose_ctx("code", &format!("Encoded {} as {}", id, code));

    print_code(output, code, &code.to_string());

    Ok(())
}

fn decode(output: &Output, s: &str) -> Result<()> {
    let code: Code = s.parse().with_context(|| format!("Can not decode '{}'", s))?;
    output.verbose_ctx("code", &format!("Decoded {} as {}", s, code.id()));

    print_code(output, code, &code.id().to_string());

    Ok(())
}

fn generate(output: &Output, seed: &str) -> Result<()> {
    let code = Code::generate(seed, Utc::now());
    output.verbose_ctx("code", &format!("Generated {} from seed '{}'", code, seed));

    print_code(output, code, &code.to_string());

    Ok(())
}
