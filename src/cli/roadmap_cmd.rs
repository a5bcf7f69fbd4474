//! Roadmap CLI commands: fmt, parse, compile and validate

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;

use super::output::Output;
use crate::domain::{Code, DateFormat, Dates, Roadmap, RoadmapExchange, VisualRoadmap};
use crate::storage::{read_content, write_output, Config};

// Shared by every command that reads a roadmap
#[derive(Args, Debug, Clone, Default)]
pub struct RoadmapArgs {
    /// Roadmap file (reads stdin when omitted or `-`)
    pub input: Option<PathBuf>,

    /// Roadmap title (defaults to the input file name)
    #[arg(long)]
    pub title: Option<String>,

    /// Date layout, written with the reference date, e.g. "02/01/2006"
    #[arg(long)]
    pub date_format: Option<String>,

    /// Base URL that relative links are resolved against
    #[arg(long)]
    pub base_url: Option<String>,

    /// Read the input as a JSON roadmap document instead of text
    #[arg(long)]
    pub json: bool,
}

fn describe_input(input: Option<&Path>) -> String {
    match input {
        Some(path) if path.as_os_str() != "-" => path.display().to_string(),
        _ => "stdin".to_string(),
    }
}

fn default_title(input: Option<&Path>) -> String {
    input
        .filter(|p| p.as_os_str() != "-")
        .and_then(Path::file_stem)
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Reads and parses the roadmap named by `args`
///
/// Command-line flags take precedence over configuration, and over the
/// fields of a JSON document.
fn load_roadmap(args: &RoadmapArgs, config: &Config, output: &Output) -> Result<Roadmap> {
    let date_format = config.date_format(args.date_format.as_deref());
    let base_url = config.base_url(args.base_url.as_deref());
    output.verbose_ctx(
        "config",
        &format!("Date format: '{}', base URL: '{}'", date_format.layout(), base_url),
    );

    let content = read_content(args.input.as_deref())?;
    output.verbose_ctx(
        "input",
        &format!("Read {} bytes from {}", content.as_str().len(), describe_input(args.input.as_deref())),
    );

    let now = Utc::now();
    let roadmap = if args.json {
        let exchange: RoadmapExchange =
            serde_json::from_str(content.as_str()).context("Failed to parse roadmap JSON")?;
        let mut roadmap = exchange.into_roadmap(now);

        if let Some(title) = &args.title {
            roadmap.title = title.clone();
        }
        if args.date_format.is_some() {
            roadmap.date_format = date_format;
        }
        if args.base_url.is_some() {
            roadmap.base_url = base_url;
        }

        roadmap
    } else {
        let title = args
            .title
            .clone()
            .unwrap_or_else(|| default_title(args.input.as_deref()));

        content.to_roadmap(0, None, &title, date_format, &base_url, now)
    };

    output.verbose_ctx(
        "parse",
        &format!(
            "Parsed {} projects and {} milestones",
            roadmap.projects.len(),
            roadmap.milestones.len()
        ),
    );

    Ok(roadmap)
}

/// Rewrites a roadmap as canonical text
pub fn fmt(output: &Output, config: &Config, args: &RoadmapArgs, target: Option<&Path>) -> Result<()> {
    let roadmap = load_roadmap(args, config, output)?;
    let text = roadmap.to_string();

    match target.filter(|p| p.as_os_str() != "-") {
        Some(path) => {
            output.verbose_ctx("fmt", &format!("Writing {} bytes to {}", text.len(), path.display()));
            write_output(Some(path), &text)?;
            output.success(&format!("Formatted roadmap written to {}", path.display()));
        }
        None => write_output(None, &text)?,
    }

    Ok(())
}

/// Prints a roadmap as its JSON document
pub fn parse(output: &Output, config: &Config, args: &RoadmapArgs) -> Result<()> {
    let mut roadmap = load_roadmap(args, config, output)?;

    if roadmap.id == 0 {
        let code = Code::generate(&roadmap.title, Utc::now());
        output.verbose_ctx("parse", &format!("Generated id: {}", code));
        roadmap.id = code.id();
    }

    let exchange = roadmap.to_exchange()?;
    output.data(&exchange);

    Ok(())
}

/// Compiles a roadmap into its visual form
pub fn compile(output: &Output, config: &Config, args: &RoadmapArgs) -> Result<()> {
    let roadmap = load_roadmap(args, config, output)?;
    let visual = roadmap.to_visual();

    if output.is_json() {
        output.data(&visual);
    } else {
        print_visual(output, &visual);
    }

    Ok(())
}

fn format_span(date_format: &DateFormat, dates: Option<&Dates>) -> String {
    match dates {
        Some(dates) => format!(
            "{} - {}",
            date_format.format(&dates.start_at),
            date_format.format(&dates.end_at)
        ),
        None => "undated".to_string(),
    }
}

fn print_visual(output: &Output, visual: &VisualRoadmap) {
    let title = if visual.title.is_empty() { "(untitled)" } else { visual.title.as_str() };
    let span = format_span(&visual.date_format, visual.dates.as_ref());
    output.row(&[title, span.as_str()]);

    if !visual.projects.is_empty() {
        output.blank();
    }

    for project in &visual.projects {
        let name = format!("{}{}", "  ".repeat(usize::from(project.indentation)), project.title);
        let span = format_span(&visual.date_format, project.dates.as_ref());
        let percentage = format!("{}%", project.percentage);
        let color = project.color.map(|c| c.to_string()).unwrap_or_default();

        output.row(&[name.as_str(), span.as_str(), percentage.as_str(), color.as_str()]);
    }

    if !visual.milestones.is_empty() {
        output.blank();
    }

    for milestone in &visual.milestones {
        let name = format!("|{}", milestone.title);
        let deadline = milestone
            .deadline_at
            .map(|at| visual.date_format.format(&at))
            .unwrap_or_else(|| "undated".to_string());
        let color = milestone.color.map(|c| c.to_string()).unwrap_or_default();

        output.row(&[name.as_str(), deadline.as_str(), color.as_str()]);
    }
}

/// Checks that a roadmap has everything it needs to be stored
pub fn validate(output: &Output, config: &Config, args: &RoadmapArgs) -> Result<()> {
    let roadmap = load_roadmap(args, config, output)?;

    roadmap
        .validate()
        .with_context(|| format!("Invalid roadmap: {}", describe_input(args.input.as_deref())))?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "valid": true,
            "title": roadmap.title,
            "projects": roadmap.projects.len(),
            "milestones": roadmap.milestones.len(),
        }));
    } else {
        output.success(&format!(
            "Roadmap '{}' is valid: {} projects, {} milestones",
            roadmap.title,
            roadmap.projects.len(),
            roadmap.milestones.len()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Content;

    #[test]
    fn default_title_uses_file_stem() {
        assert_eq!(default_title(Some(Path::new("plans/q3-roadmap.txt"))), "q3-roadmap");
        assert_eq!(default_title(Some(Path::new("-"))), "");
        assert_eq!(default_title(None), "");
    }

    #[test]
    fn input_description() {
        assert_eq!(describe_input(None), "stdin");
        assert_eq!(describe_input(Some(Path::new("-"))), "stdin");
        assert_eq!(describe_input(Some(Path::new("plan.txt"))), "plan.txt");
    }

    #[test]
    fn span_formatting() {
        let format = DateFormat::default();
        assert_eq!(format_span(&format, None), "undated");

        let dates = Content::from("A [2020-01-01, 2020-02-01]")
            .to_roadmap(0, None, "", DateFormat::default(), "", Utc::now())
            .to_dates();
        assert_eq!(format_span(&format, dates.as_ref()), "2020-01-01 - 2020-02-01");
    }
}
