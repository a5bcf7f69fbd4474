//! Roadmapper - roadmaps as plain text
//!
//! A roadmap is written as indentation-structured text: one project per
//! line, nested by indentation, with optional dates, progress, colors and
//! links in a trailing `[...]` block, followed by `|`-prefixed milestones.
//! Roadmapper parses that text into a [`Roadmap`], writes it back
//! unchanged, and compiles it into a [`VisualRoadmap`] with every missing
//! date, percentage and color inferred, ready for a renderer.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Code, Content, DateFormat, Milestone, Project, Roadmap, RoadmapExchange, VisualRoadmap};
