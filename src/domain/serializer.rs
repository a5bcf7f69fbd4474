//! Roadmap content serializer
//!
//! Writes a roadmap back into the text form read by the parser. Extra blocks
//! list their tokens in a fixed order so that parsing and serializing again
//! reproduces the same text:
//!
//! - projects: start, end, percentage, color, URLs, milestone reference
//! - milestones: deadline, color, URLs

use std::fmt;

use super::date_format::DateFormat;
use super::roadmap::{Content, Milestone, Project, Roadmap};

/// Indentation written for each level of nesting
pub const INDENTATION: &str = "\t";

fn with_extra(head: String, extra: &[String]) -> String {
    if extra.is_empty() {
        return head;
    }

    format!("{} [{}]", head, extra.join(", "))
}

impl Project {
    /// Formats the project as a single content line
    pub fn to_line(&self, date_format: &DateFormat) -> String {
        let mut extra = Vec::new();

        if let Some(dates) = &self.dates {
            extra.push(date_format.format(&dates.start_at));
            extra.push(date_format.format(&dates.end_at));
        }

        if self.percentage > 0 {
            extra.push(format!("{}%", self.percentage));
        }

        if let Some(color) = &self.color {
            extra.push(color.to_string());
        }

        extra.extend(self.urls.iter().cloned());

        if self.milestone > 0 {
            extra.push(format!("|{}", self.milestone));
        }

        let head = format!("{}{}", INDENTATION.repeat(usize::from(self.indentation)), self.title);

        with_extra(head, &extra)
    }
}

impl Milestone {
    /// Formats the milestone as a single content line
    pub fn to_line(&self, date_format: &DateFormat) -> String {
        let mut extra = Vec::new();

        if let Some(deadline_at) = &self.deadline_at {
            extra.push(date_format.format(deadline_at));
        }

        if let Some(color) = &self.color {
            extra.push(color.to_string());
        }

        extra.extend(self.urls.iter().cloned());

        with_extra(format!("|{}", self.title), &extra)
    }
}

impl fmt::Display for Roadmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines: Vec<String> = self
            .projects
            .iter()
            .map(|p| p.to_line(&self.date_format))
            .collect();

        if !self.projects.is_empty() && !self.milestones.is_empty() {
            lines.push(String::new());
        }

        lines.extend(self.milestones.iter().map(|m| m.to_line(&self.date_format)));

        f.write_str(&lines.join("\n"))
    }
}

impl Roadmap {
    /// Converts the roadmap back into content
    pub fn to_content(&self) -> Content {
        Content::new(self.to_string())
    }
}
