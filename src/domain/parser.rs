//! Roadmap content parser
//!
//! Each non-blank line is either a project or, when it starts with `|`, a
//! milestone. Projects are indented with a unit detected from the first
//! indented line. A line may end in an extra block: `[token, token, ...]`.
//!
//! ```text
//! Epic [2020-01-01, 2020-03-01, #ff0072]
//!     Task [40%, https://example.com/task, |1]
//!
//! |Release [2020-03-01]
//! ```
//!
//! Parsing is lenient: tokens that mean nothing are ignored and no line can
//! fail the whole document.

use chrono::{DateTime, Utc};

use super::color::Rgb;
use super::date_format::DateFormat;
use super::link;
use super::roadmap::{Dates, Milestone, Project};

const DEFAULT_INDENTATION: &str = "\t";
const TRIM: &[char] = &['\t', '\r', ' '];

/// Returns the leading whitespace of the first indented line
pub(crate) fn find_indentation<'a>(lines: &[&'a str]) -> &'a str {
    for line in lines {
        if line.trim_matches(|c| c == ' ' || c == '\t').is_empty() {
            continue;
        }

        if !line.starts_with([' ', '\t']) {
            continue;
        }

        let width = line.len() - line.trim_start_matches([' ', '\t']).len();
        return &line[..width];
    }

    DEFAULT_INDENTATION
}

fn is_milestone_line(line: &str) -> bool {
    line.trim_start_matches(TRIM).starts_with('|')
}

fn is_blank(line: &str) -> bool {
    line.trim_matches(TRIM).is_empty()
}

/// Splits a line into its depth, title and extra block
///
/// The extra block is delimited by the last `[` and the last `]` on the line,
/// so titles may contain brackets of their own.
fn split_line<'a>(line: &'a str, unit: &str) -> (u8, &'a str, &'a str) {
    let mut depth: u8 = 0;
    let mut rest = line;

    if !unit.is_empty() {
        while let Some(stripped) = rest.strip_prefix(unit) {
            rest = stripped;
            depth = depth.saturating_add(1);
        }
    }

    let rest = rest.strip_prefix('|').unwrap_or(rest);

    match (rest.rfind('['), rest.rfind(']')) {
        (Some(open), Some(close)) if open < close => (
            depth,
            rest[..open].trim_matches(TRIM),
            rest[open + 1..close].trim_matches(TRIM),
        ),
        _ => (depth, rest, ""),
    }
}

/// A token of an extra block, classified
#[derive(Debug, Clone, PartialEq)]
enum ExtraToken {
    Date(DateTime<Utc>),
    Percentage(u8),
    MilestoneRef(u8),
    Color(Rgb),
    Url(String),
}

/// Settings shared by the token matchers
struct TokenContext<'a> {
    date_format: &'a DateFormat,
    base_url: &'a str,
}

type Matcher = fn(&str, &TokenContext<'_>) -> Option<ExtraToken>;

/// Matchers in order of precedence, the first match wins
const MATCHERS: &[Matcher] = &[
    match_date,
    match_percentage,
    match_milestone_ref,
    match_color,
    match_absolute_url,
    match_relative_url,
];

fn match_date(token: &str, ctx: &TokenContext<'_>) -> Option<ExtraToken> {
    ctx.date_format.parse(token).map(ExtraToken::Date)
}

/// Parses a number made of ASCII digits only
fn parse_digits(s: &str) -> Option<u8> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    s.parse().ok()
}

fn match_percentage(token: &str, _: &TokenContext<'_>) -> Option<ExtraToken> {
    token
        .strip_suffix('%')
        .and_then(parse_digits)
        .filter(|n| *n <= 100)
        .map(ExtraToken::Percentage)
}

fn match_milestone_ref(token: &str, _: &TokenContext<'_>) -> Option<ExtraToken> {
    token
        .strip_prefix('|')
        .and_then(parse_digits)
        .map(ExtraToken::MilestoneRef)
}

fn match_color(token: &str, _: &TokenContext<'_>) -> Option<ExtraToken> {
    token.parse().ok().map(ExtraToken::Color)
}

fn match_absolute_url(token: &str, _: &TokenContext<'_>) -> Option<ExtraToken> {
    link::is_absolute(token).then(|| ExtraToken::Url(token.to_string()))
}

/// Accepts a path that forms a valid URL under the base URL
///
/// The path is kept as written; the visual compiler resolves it later.
fn match_relative_url(token: &str, ctx: &TokenContext<'_>) -> Option<ExtraToken> {
    if ctx.base_url.is_empty() {
        return None;
    }

    link::is_valid(&link::join(ctx.base_url, token)).then(|| ExtraToken::Url(token.to_string()))
}

fn classify(token: &str, ctx: &TokenContext<'_>) -> Option<ExtraToken> {
    MATCHERS.iter().find_map(|matcher| matcher(token, ctx))
}

/// Everything an extra block can carry
#[derive(Debug, Default)]
struct Extra {
    start_at: Option<DateTime<Utc>>,
    end_at: Option<DateTime<Utc>>,
    percentage: u8,
    milestone: u8,
    color: Option<Rgb>,
    urls: Vec<String>,
}

/// Classifies the token at `index`, returning it with the number of tokens used
///
/// A layout like `Jan 2, 2006` writes a date as several tokens; those are
/// tried together before the first one is classified on its own.
fn classify_at(tokens: &[&str], index: usize, ctx: &TokenContext<'_>) -> (Option<ExtraToken>, usize) {
    let pieces = ctx.date_format.pieces();

    if pieces > 1 {
        if let Some(group) = tokens.get(index..index + pieces) {
            if let Some(date) = match_date(&group.join(", "), ctx) {
                return (Some(date), pieces);
            }
        }
    }

    (classify(tokens[index], ctx), 1)
}

fn parse_extra(extra: &str, ctx: &TokenContext<'_>) -> Extra {
    let mut parsed = Extra::default();

    let tokens: Vec<&str> = extra.split(", ").take_while(|t| !t.is_empty()).collect();
    let mut index = 0;

    while index < tokens.len() {
        let (token, used) = classify_at(&tokens, index, ctx);
        index += used;

        match token {
            Some(ExtraToken::Date(at)) if parsed.start_at.is_none() => parsed.start_at = Some(at),
            Some(ExtraToken::Date(at)) => parsed.end_at = Some(at),
            Some(ExtraToken::Percentage(n)) => parsed.percentage = n,
            Some(ExtraToken::MilestoneRef(n)) => parsed.milestone = n,
            Some(ExtraToken::Color(color)) => parsed.color = Some(color),
            Some(ExtraToken::Url(url)) => parsed.urls.push(url),
            None => {}
        }
    }

    parsed
}

/// Parses the project lines, in order
pub(crate) fn parse_projects(lines: &[&str], unit: &str, date_format: &DateFormat, base_url: &str) -> Vec<Project> {
    let ctx = TokenContext { date_format, base_url };

    lines
        .iter()
        .filter(|line| !is_blank(line) && !is_milestone_line(line))
        .map(|line| {
            let (indentation, title, extra) = split_line(line, unit);
            let extra = parse_extra(extra, &ctx);

            let dates = match (extra.start_at, extra.end_at) {
                (Some(start_at), Some(end_at)) => Dates::try_new(start_at, end_at),
                _ => None,
            };

            Project {
                indentation,
                title: title.to_string(),
                dates,
                color: extra.color,
                percentage: extra.percentage,
                urls: extra.urls,
                milestone: extra.milestone,
            }
        })
        .collect()
}

/// Parses the milestone lines, in order
///
/// A milestone line with two dates is a project prefixed with `|` by mistake
/// and is dropped.
pub(crate) fn parse_milestones(lines: &[&str], date_format: &DateFormat, base_url: &str) -> Vec<Milestone> {
    let ctx = TokenContext { date_format, base_url };

    lines
        .iter()
        .filter(|line| is_milestone_line(line))
        .filter_map(|line| {
            let (_, title, extra) = split_line(line.trim_start_matches(TRIM), "");
            let extra = parse_extra(extra, &ctx);

            if extra.end_at.is_some() {
                return None;
            }

            Some(Milestone {
                title: title.to_string(),
                deadline_at: extra.start_at,
                color: extra.color,
                urls: extra.urls,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::roadmap::Content;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn parse_with(text: &str, base_url: &str) -> (Vec<Project>, Vec<Milestone>) {
        let roadmap = Content::from(text).to_roadmap(0, None, "", DateFormat::default(), base_url, day(2020, 1, 1));
        (roadmap.projects, roadmap.milestones)
    }

    fn parse(text: &str) -> (Vec<Project>, Vec<Milestone>) {
        parse_with(text, "")
    }

    #[test]
    fn indentation_defaults_to_tab() {
        assert_eq!(find_indentation(&["A", "B"]), "\t");
        assert_eq!(find_indentation(&[]), "\t");
    }

    #[test]
    fn indentation_comes_from_first_indented_line() {
        assert_eq!(find_indentation(&["A", "  B", "\tC"]), "  ");
        assert_eq!(find_indentation(&["A", "   ", "\t\tB", "  C"]), "\t\t");
    }

    #[test]
    fn split_line_counts_indentation() {
        assert_eq!(split_line("\t\tTask", "\t"), (2, "Task", ""));
        assert_eq!(split_line("    Task [50%]", "  "), (2, "Task", "50%"));
        assert_eq!(split_line(" Task", "  "), (0, " Task", ""));
    }

    #[test]
    fn split_line_uses_last_brackets() {
        assert_eq!(split_line("Fix [core] bug [50%]", "\t"), (0, "Fix [core] bug", "50%"));
        assert_eq!(split_line("Odd ] title [", "\t"), (0, "Odd ] title [", ""));
        assert_eq!(split_line("|Release [2020-03-01]", ""), (0, "Release", "2020-03-01"));
    }

    #[test]
    fn parses_dates_and_percentage() {
        let (projects, _) = parse("Task A [2020-02-01, 2020-02-10, 50%]");

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].title, "Task A");
        assert_eq!(
            projects[0].dates,
            Some(Dates {
                start_at: day(2020, 2, 1),
                end_at: day(2020, 2, 10)
            })
        );
        assert_eq!(projects[0].percentage, 50);
    }

    #[test]
    fn parses_all_token_kinds() {
        let (projects, _) = parse("Task [#a4f, https://example.com/a, |2, 100%, http://example.org]");

        assert_eq!(projects[0].color, Some(Rgb::new(170, 68, 255)));
        assert_eq!(projects[0].urls, vec!["https://example.com/a", "http://example.org"]);
        assert_eq!(projects[0].milestone, 2);
        assert_eq!(projects[0].percentage, 100);
    }

    #[test]
    fn reversed_or_single_dates_are_dropped() {
        let (projects, _) = parse("A [2020-02-10, 2020-02-01]\nB [2020-02-01]\nC [2020-02-01, 2020-02-01]");

        assert!(projects.iter().all(|p| p.dates.is_none()));
    }

    #[test]
    fn later_dates_replace_the_end() {
        let (projects, _) = parse("A [2020-01-01, 2020-01-05, 2020-01-09]");

        assert_eq!(projects[0].dates.map(|d| d.end_at), Some(day(2020, 1, 9)));
    }

    #[test]
    fn unknown_tokens_are_ignored() {
        let (projects, _) = parse("A [nonsense, 101%, #ggg, +5%, 50%]");

        assert_eq!(projects[0].percentage, 50);
        assert!(projects[0].urls.is_empty());
        assert!(projects[0].color.is_none());
    }

    #[test]
    fn parsing_stops_at_empty_token() {
        let (projects, _) = parse("A [50%, , #fff]");

        assert_eq!(projects[0].percentage, 50);
        assert!(projects[0].color.is_none());
    }

    #[test]
    fn dates_containing_list_separators() {
        let roadmap = Content::from("A [Feb 1, 2020, Feb 10, 2020, 50%]\n|M [Mar 1, 2020]").to_roadmap(
            0,
            None,
            "",
            DateFormat::new("Jan 2, 2006"),
            "https://example.com",
            day(2020, 1, 1),
        );

        let project = &roadmap.projects[0];
        assert_eq!(project.dates.map(|d| (d.start_at, d.end_at)), Some((day(2020, 2, 1), day(2020, 2, 10))));
        assert_eq!(project.percentage, 50);
        assert!(project.urls.is_empty());
        assert_eq!(roadmap.milestones[0].deadline_at, Some(day(2020, 3, 1)));
        assert!(roadmap.milestones[0].urls.is_empty());
    }

    #[test]
    fn relative_urls_need_a_base_url() {
        let (without, _) = parse("A [docs/a]");
        assert!(without[0].urls.is_empty());

        let (with, _) = parse_with("A [docs/a, /docs/b]", "https://example.com/");
        assert_eq!(with[0].urls, vec!["docs/a", "/docs/b"]);
    }

    #[test]
    fn parses_nested_projects() {
        let (projects, _) = parse("Epic\n\tTask\n\t\tSubtask\n\n\tOther");

        let depths: Vec<u8> = projects.iter().map(|p| p.indentation).collect();
        assert_eq!(depths, vec![0, 1, 2, 1]);
    }

    #[test]
    fn parses_space_indented_projects() {
        let (projects, _) = parse("Epic\n  Task\n    Subtask");

        let depths: Vec<u8> = projects.iter().map(|p| p.indentation).collect();
        assert_eq!(depths, vec![0, 1, 2]);
    }

    #[test]
    fn parses_milestones() {
        let (projects, milestones) = parse("|Release [2020-03-01]");

        assert!(projects.is_empty());
        assert_eq!(
            milestones,
            vec![Milestone {
                title: "Release".to_string(),
                deadline_at: Some(day(2020, 3, 1)),
                color: None,
                urls: vec![],
            }]
        );
    }

    #[test]
    fn milestones_ignore_indentation_and_percentages() {
        let (projects, milestones) = parse("A\n  |Beta [#fff, 50%, |3]");

        assert_eq!(projects.len(), 1);
        assert_eq!(milestones[0].title, "Beta");
        assert_eq!(milestones[0].color, Some(Rgb::new(255, 255, 255)));
    }

    #[test]
    fn milestones_with_two_dates_are_dropped() {
        let (projects, milestones) = parse("|Oops [2020-01-01, 2020-02-01]\n|Fine");

        assert!(projects.is_empty());
        assert_eq!(milestones.len(), 1);
        assert_eq!(milestones[0].title, "Fine");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let (projects, milestones) = parse("\n  \nA\n\t\n");

        assert_eq!(projects.len(), 1);
        assert!(milestones.is_empty());
    }
}
