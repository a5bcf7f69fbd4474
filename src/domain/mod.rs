//! Domain models for Roadmapper
//!
//! Contains the text-to-model compiler without any I/O concerns: the content
//! parser and serializer, the visual compiler, the color palette and the
//! short-code codec.

mod code;
mod color;
mod date_format;
mod exchange;
mod link;
mod parser;
mod roadmap;
mod serializer;
mod visual;

pub use code::{decode, encode, Code, CodeError, ALPHABET, MAX_CODE};
pub use color::{pick_background, pick_foreground, ColorError, Rgb, FAMILIES, NEUTRAL, SHADES};
pub use date_format::{DateFormat, DEFAULT_LAYOUT};
pub use exchange::RoadmapExchange;
pub use link::{is_absolute, resolve};
pub use roadmap::{Content, Dates, Milestone, Project, Roadmap, ValidationError};
pub use serializer::INDENTATION;
pub use visual::VisualRoadmap;
