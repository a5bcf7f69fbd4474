//! Date layouts for roadmap content
//!
//! Roadmaps store their date format as a reference layout, the way the date
//! `Mon Jan 2 15:04:05 -0700 2006` would be written (e.g. `2006-01-02` or
//! `Jan 2, 2006`). The layout is translated once into a chrono pattern and
//! used for both parsing and formatting.

use chrono::format::{Fixed, Item, Numeric, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout used when none is configured
pub const DEFAULT_LAYOUT: &str = "2006-01-02";

/// Reference tokens and their chrono equivalents, longest match first
const TOKENS: &[(&str, &str)] = &[
    ("January", "%B"),
    ("Monday", "%A"),
    ("-07:00", "%:z"),
    ("-0700", "%z"),
    ("2006", "%Y"),
    ("Jan", "%b"),
    ("Mon", "%a"),
    ("_2", "%e"),
    ("01", "%m"),
    ("02", "%d"),
    ("03", "%I"),
    ("04", "%M"),
    ("05", "%S"),
    ("06", "%y"),
    ("15", "%H"),
    ("PM", "%p"),
    ("pm", "%P"),
    ("1", "%-m"),
    ("2", "%-d"),
    ("3", "%-I"),
    ("4", "%-M"),
    ("5", "%-S"),
];

/// Translates a reference layout into a chrono pattern
fn to_pattern(layout: &str) -> String {
    let mut pattern = String::with_capacity(layout.len() * 2);
    let mut rest = layout;

    'outer: while let Some(c) = rest.chars().next() {
        for (token, replacement) in TOKENS {
            if !rest.starts_with(token) {
                continue;
            }

            // "Mon" in "Monthly" or "Jan" in "Janitor" is literal text
            let after = &rest[token.len()..];
            if (*token == "Jan" || *token == "Mon") && after.starts_with(|c: char| c.is_ascii_lowercase()) {
                continue;
            }

            pattern.push_str(replacement);
            rest = after;
            continue 'outer;
        }

        if c == '%' {
            pattern.push_str("%%");
        } else {
            pattern.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }

    pattern
}

/// Returns the pattern and input suffix that supply a missing month and day
///
/// Layouts such as `2006-01` or `January 2006` name no day, and `2006` names
/// neither; those dates fall on the first of the month and of the year.
fn missing_fields(pattern: &str) -> (String, &'static str) {
    let mut has_month = false;
    let mut has_day = false;

    for item in StrftimeItems::new(pattern) {
        match item {
            Item::Numeric(Numeric::Month, _)
            | Item::Fixed(Fixed::ShortMonthName)
            | Item::Fixed(Fixed::LongMonthName) => has_month = true,
            Item::Numeric(Numeric::Day, _) => has_day = true,
            _ => {}
        }
    }

    match (has_month, has_day) {
        (true, true) => (String::new(), ""),
        (true, false) => (format!("{} %d", pattern), " 01"),
        (false, true) => (format!("{} %m", pattern), " 01"),
        (false, false) => (format!("{} %m %d", pattern), " 01 01"),
    }
}

/// A date format given as a reference layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct DateFormat {
    layout: String,
    pattern: String,
    fill_pattern: String,
    fill_input: &'static str,
}

impl DateFormat {
    pub fn new(layout: impl Into<String>) -> Self {
        let layout = layout.into();
        let pattern = to_pattern(&layout);
        let (fill_pattern, fill_input) = missing_fields(&pattern);

        Self {
            layout,
            pattern,
            fill_pattern,
            fill_input,
        }
    }

    /// Returns the reference layout, e.g. `2006-01-02`
    pub fn layout(&self) -> &str {
        &self.layout
    }

    /// Returns the translated chrono pattern, e.g. `%Y-%m-%d`
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// Returns how many `", "`-separated pieces one formatted date spans
    ///
    /// `Jan 2, 2006` writes dates as two pieces of an extra block.
    pub fn pieces(&self) -> usize {
        self.layout.matches(", ").count() + 1
    }

    /// Parses a date, returning `None` if it doesn't match the layout
    ///
    /// Layouts without a time of day parse to midnight, layouts without an
    /// offset are read as UTC. A missing day or month defaults to the first.
    pub fn parse(&self, s: &str) -> Option<DateTime<Utc>> {
        if self.layout.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_str(s, &self.pattern) {
            return Some(dt.with_timezone(&Utc));
        }

        if let Ok(naive) = NaiveDateTime::parse_from_str(s, &self.pattern) {
            return Some(Utc.from_utc_datetime(&naive));
        }

        let date = if self.fill_pattern.is_empty() {
            NaiveDate::parse_from_str(s, &self.pattern).ok()?
        } else {
            let filled = format!("{}{}", s, self.fill_input);
            NaiveDate::parse_from_str(&filled, &self.fill_pattern).ok()?
        };

        date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive))
    }

    /// Formats a date using the layout
    pub fn format(&self, dt: &DateTime<Utc>) -> String {
        dt.format(&self.pattern).to_string()
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self::new(DEFAULT_LAYOUT)
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.layout)
    }
}

impl<'de> Deserialize<'de> for DateFormat {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

impl From<String> for DateFormat {
    fn from(layout: String) -> Self {
        Self::new(layout)
    }
}

impl From<&str> for DateFormat {
    fn from(layout: &str) -> Self {
        Self::new(layout)
    }
}

impl From<DateFormat> for String {
    fn from(format: DateFormat) -> Self {
        format.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn translates_common_layouts() {
        assert_eq!(DateFormat::new("2006-01-02").pattern(), "%Y-%m-%d");
        assert_eq!(DateFormat::new("02/01/2006").pattern(), "%d/%m/%Y");
        assert_eq!(DateFormat::new("Jan 2, 2006").pattern(), "%b %-d, %Y");
        assert_eq!(DateFormat::new("2006-01-02 15:04").pattern(), "%Y-%m-%d %H:%M");
        assert_eq!(DateFormat::new("January 2006").pattern(), "%B %Y");
    }

    #[test]
    fn escapes_percent_and_keeps_literals() {
        assert_eq!(DateFormat::new("2006%01").pattern(), "%Y%%%m");
        assert_eq!(DateFormat::new("Monthly 2006").pattern(), "Monthly %Y");
    }

    #[test]
    fn parses_date_only_layouts_at_midnight() {
        let format = DateFormat::default();

        assert_eq!(format.parse("2020-02-01"), Some(utc(2020, 2, 1, 0, 0)));
    }

    #[test]
    fn parses_layouts_with_time() {
        let format = DateFormat::new("2006-01-02 15:04");

        assert_eq!(format.parse("2020-02-01 13:45"), Some(utc(2020, 2, 1, 13, 45)));
    }

    #[test]
    fn parses_layouts_with_offsets_as_utc() {
        let format = DateFormat::new("2006-01-02 15:04 -0700");

        assert_eq!(format.parse("2020-02-01 13:45 +0200"), Some(utc(2020, 2, 1, 11, 45)));
    }

    #[test]
    fn rejects_non_dates() {
        let format = DateFormat::default();

        assert_eq!(format.parse("50%"), None);
        assert_eq!(format.parse("#abc"), None);
        assert_eq!(format.parse("|1"), None);
        assert_eq!(format.parse("https://example.com/"), None);
        assert_eq!(format.parse("2020-13-01"), None);
        assert_eq!(format.parse("2020-02-01 trailing"), None);
    }

    #[test]
    fn month_only_layouts_default_to_the_first() {
        assert_eq!(DateFormat::new("2006-01").parse("2020-02"), Some(utc(2020, 2, 1, 0, 0)));
        assert_eq!(DateFormat::new("January 2006").parse("February 2020"), Some(utc(2020, 2, 1, 0, 0)));
        assert_eq!(DateFormat::new("Jan 2006").parse("Feb 2020"), Some(utc(2020, 2, 1, 0, 0)));
        assert_eq!(DateFormat::new("2006").parse("2021"), Some(utc(2021, 1, 1, 0, 0)));
    }

    #[test]
    fn month_only_layouts_still_reject_garbage() {
        let format = DateFormat::new("2006-01");

        assert_eq!(format.parse("2020-13"), None);
        assert_eq!(format.parse("2020-02-01"), None);
        assert_eq!(format.parse("50%"), None);
    }

    #[test]
    fn month_only_format_inverts_parse() {
        let format = DateFormat::new("Jan 2006");
        let date = format.parse("Mar 2021").unwrap();

        assert_eq!(format.format(&date), "Mar 2021");
    }

    #[test]
    fn pieces_counts_list_separators() {
        assert_eq!(DateFormat::default().pieces(), 1);
        assert_eq!(DateFormat::new("Jan 2, 2006").pieces(), 2);
        assert_eq!(DateFormat::new("Monday, Jan 2, 2006").pieces(), 3);
        assert_eq!(DateFormat::new("2.1.2006").pieces(), 1);
    }

    #[test]
    fn empty_layout_parses_nothing() {
        assert_eq!(DateFormat::new("").parse("2020-02-01"), None);
    }

    #[test]
    fn format_inverts_parse() {
        let format = DateFormat::new("Jan 2, 2006");
        let date = format.parse("Feb 1, 2020").unwrap();

        assert_eq!(date, utc(2020, 2, 1, 0, 0));
        assert_eq!(format.format(&date), "Feb 1, 2020");
    }

    #[test]
    fn serde_uses_the_layout() {
        let json = serde_json::to_string(&DateFormat::default()).unwrap();
        assert_eq!(json, "\"2006-01-02\"");

        let parsed: DateFormat = serde_json::from_str("\"02/01/2006\"").unwrap();
        assert_eq!(parsed.pattern(), "%d/%m/%Y");
    }
}
