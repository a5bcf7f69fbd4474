//! Reading and writing roadmap text
//!
//! A missing path, or `-`, means stdin for input and stdout for output.
//! File writes are atomic (temp file + rename).

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::Content;

/// Returns the file to use, or None for stdio
fn file_path(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| p.as_os_str() != "-")
}

/// Reads roadmap content from a file or stdin
pub fn read_content(path: Option<&Path>) -> Result<Content> {
    match file_path(path) {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read roadmap: {}", path.display()))?;
            Ok(Content::new(text))
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read roadmap from stdin")?;
            Ok(Content::new(text))
        }
    }
}

/// Writes text to a file or stdout, ending it with a newline
pub fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match file_path(path) {
        Some(path) => write_atomic(path, text),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", text).context("Failed to write to stdout")?;
            stdout.flush().context("Failed to flush stdout")
        }
    }
}

/// Replaces the file at `path` in one step
fn write_atomic(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let temp_path = path.with_extension("roadmap.tmp");
    let result = write_temp(&temp_path, text).and_then(|()| {
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to rename {} to {}", temp_path.display(), path.display()))
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn write_temp(temp_path: &Path, text: &str) -> Result<()> {
    let mut file = File::create(temp_path)
        .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

    writeln!(file, "{}", text).with_context(|| format!("Failed to write: {}", temp_path.display()))?;

    file.flush()
        .with_context(|| format!("Failed to flush: {}", temp_path.display()))
}
