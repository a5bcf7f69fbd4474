//! Roadmap domain model
//!
//! A roadmap is a flat, ordered list of projects plus a list of milestones.
//! The project tree is implicit: each project carries its indentation depth,
//! and a project's descendants are the projects that follow it with a
//! strictly greater depth. Depth 0 projects are epics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::color::Rgb;
use super::date_format::DateFormat;
use super::parser;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Title, date format and at least one project are mandatory")]
    MissingFields,

    #[error("Project '{title}' ends before it starts: start at {start_at}, end at {end_at}")]
    EndBeforeStart {
        title: String,
        start_at: String,
        end_at: String,
    },
}

/// A start and end date pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dates {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

impl Dates {
    /// Creates a date pair, or `None` unless `start_at` is before `end_at`
    pub fn try_new(start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Option<Self> {
        (start_at < end_at).then_some(Self { start_at, end_at })
    }

    /// Returns the smallest span covering both spans
    pub fn union(self, other: Dates) -> Dates {
        Dates {
            start_at: self.start_at.min(other.start_at),
            end_at: self.end_at.max(other.end_at),
        }
    }

    /// Widens the span so that it covers the given instant
    pub fn extend_to(self, at: DateTime<Utc>) -> Dates {
        Dates {
            start_at: self.start_at.min(at),
            end_at: self.end_at.max(at),
        }
    }
}

fn is_zero(n: &u8) -> bool {
    *n == 0
}

/// A project line of a roadmap
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub indentation: u8,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<Dates>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,

    /// Completion, 0-100. Zero means unknown and is rolled up from children.
    #[serde(default)]
    pub percentage: u8,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<String>,

    /// 1-based index into the roadmap's milestones, 0 for none
    #[serde(default, skip_serializing_if = "is_zero")]
    pub milestone: u8,
}

impl Project {
    pub fn new(indentation: u8, title: impl Into<String>) -> Self {
        Self {
            indentation,
            title: title.into(),
            ..Default::default()
        }
    }

    /// Returns true for top-level projects
    pub fn is_epic(&self) -> bool {
        self.indentation == 0
    }
}

/// A milestone line of a roadmap
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<String>,
}

impl Milestone {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// A roadmap, as parsed from content or loaded from storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roadmap {
    pub id: u64,
    pub prev_id: Option<u64>,
    pub title: String,
    pub date_format: DateFormat,
    pub base_url: String,
    pub projects: Vec<Project>,
    pub milestones: Vec<Milestone>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub accessed_at: DateTime<Utc>,
}

impl Roadmap {
    /// Creates an empty roadmap with all timestamps set to `now`
    pub fn new(title: impl Into<String>, date_format: DateFormat, base_url: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            prev_id: None,
            title: title.into(),
            date_format,
            base_url: base_url.into(),
            projects: Vec::new(),
            milestones: Vec::new(),
            created_at: now,
            updated_at: now,
            accessed_at: now,
        }
    }

    /// Returns the span covering every dated project
    ///
    /// Milestone deadlines widen the span but never start one: a roadmap
    /// without dated projects has no span.
    pub fn to_dates(&self) -> Option<Dates> {
        let span = self
            .projects
            .iter()
            .filter_map(|p| p.dates)
            .reduce(Dates::union)?;

        Some(
            self.milestones
                .iter()
                .filter_map(|m| m.deadline_at)
                .fold(span, Dates::extend_to),
        )
    }

    /// Checks the fields a roadmap needs before it can be stored
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() || self.date_format.is_empty() || self.projects.is_empty() {
            return Err(ValidationError::MissingFields);
        }

        for project in &self.projects {
            if let Some(dates) = &project.dates {
                if dates.end_at < dates.start_at {
                    return Err(ValidationError::EndBeforeStart {
                        title: project.title.clone(),
                        start_at: self.date_format.format(&dates.start_at),
                        end_at: self.date_format.format(&dates.end_at),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Raw roadmap text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content(String);

impl Content {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the content into lines, dropping carriage returns
    ///
    /// Empty content has no lines at all.
    pub fn to_lines(&self) -> Vec<&str> {
        if self.0.is_empty() {
            return Vec::new();
        }

        self.0
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect()
    }

    /// Parses the content into a roadmap
    pub fn to_roadmap(
        &self,
        id: u64,
        prev_id: Option<u64>,
        title: &str,
        date_format: DateFormat,
        base_url: &str,
        now: DateTime<Utc>,
    ) -> Roadmap {
        let lines = self.to_lines();
        let unit = parser::find_indentation(&lines);

        let mut roadmap = Roadmap::new(title, date_format, base_url, now);
        roadmap.id = id;
        roadmap.prev_id = prev_id;
        roadmap.projects = parser::parse_projects(&lines, unit, &roadmap.date_format, base_url);
        roadmap.milestones = parser::parse_milestones(&lines, &roadmap.date_format, base_url);

        roadmap
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}
