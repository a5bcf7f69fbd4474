//! Visual roadmap compiler
//!
//! Turns a parsed roadmap into one ready to be drawn. Gaps are filled by
//! structural inference over the flat project list, in this order:
//!
//! 1. dates from descendants (min start, max end of the whole subtree)
//! 2. dates from the nearest dated ancestor
//! 3. palette colors for projects without one
//! 4. percentages rolled up from direct children
//! 5. relative links resolved against the base URL
//! 6. milestone colors and deadlines defaulted from referencing projects
//!
//! The input roadmap is never modified.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::color::{self, Rgb};
use super::date_format::DateFormat;
use super::link;
use super::roadmap::{Dates, Milestone, Project, Roadmap};

/// A roadmap with every inferable gap filled, ready for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualRoadmap {
    pub title: String,
    pub date_format: DateFormat,
    pub projects: Vec<Project>,
    pub milestones: Vec<Milestone>,
    pub dates: Option<Dates>,
}

impl Roadmap {
    /// Compiles the roadmap into its visual form
    pub fn to_visual(&self) -> VisualRoadmap {
        let mut projects = self.projects.clone();
        let mut milestones = self.milestones.clone();

        infer_dates(&mut projects);
        assign_colors(&mut projects);
        roll_up_percentages(&mut projects);
        resolve_links(&self.base_url, &mut projects, &mut milestones);
        apply_milestone_defaults(&projects, &mut milestones);

        VisualRoadmap {
            title: self.title.clone(),
            date_format: self.date_format.clone(),
            projects,
            milestones,
            dates: self.to_dates(),
        }
    }
}

/// Fills missing dates bottom-up first, then top-down
fn infer_dates(projects: &mut [Project]) {
    for i in 0..projects.len() {
        if projects[i].dates.is_none() {
            projects[i].dates = dates_from_descendants(projects, i);
        }
    }

    for i in 0..projects.len() {
        if projects[i].dates.is_none() {
            projects[i].dates = dates_from_ancestors(projects, i);
        }
    }
}

/// Returns the span of all dated projects in the subtree below `index`
fn dates_from_descendants(projects: &[Project], index: usize) -> Option<Dates> {
    let depth = projects[index].indentation;

    projects[index + 1..]
        .iter()
        .take_while(|p| p.indentation > depth)
        .filter_map(|p| p.dates)
        .reduce(Dates::union)
}

/// Returns the dates of the closest dated ancestor of `index`
fn dates_from_ancestors(projects: &[Project], index: usize) -> Option<Dates> {
    let mut depth = projects[index].indentation;

    for project in projects[..index].iter().rev() {
        if project.indentation >= depth {
            continue;
        }

        if project.dates.is_some() {
            return project.dates;
        }

        depth = project.indentation;
    }

    None
}

/// Gives every uncolored project a palette color based on its position
fn assign_colors(projects: &mut [Project]) {
    // projects before the first epic count as part of epic 0
    let mut epic: i64 = -1;
    let mut task: i64 = -1;

    for project in projects.iter_mut() {
        if project.is_epic() {
            epic += 1;
            task = -1;
        }
        task += 1;

        if project.color.is_none() {
            project.color = Some(color::pick_foreground(
                epic.max(0) as usize,
                task as usize,
                project.indentation,
            ));
        }
    }
}

/// Replaces unknown (zero) percentages with the average of direct children
pub(crate) fn roll_up_percentages(projects: &mut [Project]) {
    for i in 0..projects.len() {
        if projects[i].percentage == 0 {
            projects[i].percentage = percentage_from_children(projects, i);
        }
    }
}

fn percentage_from_children(projects: &mut [Project], index: usize) -> u8 {
    if projects[index].percentage != 0 {
        return projects[index].percentage;
    }

    let depth = projects[index].indentation;
    let child_depth = depth.saturating_add(1);

    let mut sum: u32 = 0;
    let mut count: u32 = 0;

    let mut i = index + 1;
    while i < projects.len() && projects[i].indentation > depth {
        if projects[i].indentation == child_depth {
            if projects[i].percentage == 0 {
                projects[i].percentage = percentage_from_children(projects, i);
            }

            sum += u32::from(projects[i].percentage);
            count += 1;
        }

        i += 1;
    }

    if count == 0 {
        return 0;
    }

    // an average of values <= 100 always fits
    (sum / count) as u8
}

/// Rewrites relative links as absolute links under the base URL
fn resolve_links(base_url: &str, projects: &mut [Project], milestones: &mut [Milestone]) {
    if base_url.is_empty() {
        return;
    }

    let urls = projects
        .iter_mut()
        .flat_map(|p| p.urls.iter_mut())
        .chain(milestones.iter_mut().flat_map(|m| m.urls.iter_mut()));

    for url in urls {
        *url = link::resolve(base_url, url);
    }
}

/// Defaults a milestone can take from the projects referencing it
#[derive(Debug, Default)]
struct MilestoneDefaults {
    color: Option<Rgb>,
    deadline_at: Option<DateTime<Utc>>,
}

/// Collects defaults per 0-based milestone index
///
/// The first referencing project with a color lends it; the deadline is the
/// latest end date among referencing projects.
fn collect_milestone_defaults(projects: &[Project]) -> BTreeMap<usize, MilestoneDefaults> {
    let mut found: BTreeMap<usize, MilestoneDefaults> = BTreeMap::new();

    for project in projects {
        if project.milestone == 0 {
            continue;
        }

        if project.color.is_none() && project.dates.is_none() {
            continue;
        }

        let defaults = found.entry(usize::from(project.milestone) - 1).or_default();

        if defaults.color.is_none() {
            defaults.color = project.color;
        }

        if let Some(dates) = &project.dates {
            defaults.deadline_at = Some(match defaults.deadline_at {
                Some(deadline_at) => deadline_at.max(dates.end_at),
                None => dates.end_at,
            });
        }
    }

    found
}

fn apply_milestone_defaults(projects: &[Project], milestones: &mut [Milestone]) {
    for (index, defaults) in collect_milestone_defaults(projects) {
        // references past the last milestone point at nothing
        let Some(milestone) = milestones.get_mut(index) else {
            continue;
        };

        if milestone.color.is_none() {
            milestone.color = defaults.color;
        }

        if milestone.deadline_at.is_none() {
            milestone.deadline_at = defaults.deadline_at;
        }
    }

    for milestone in milestones.iter_mut() {
        if milestone.color.is_none() {
            milestone.color = Some(color::NEUTRAL);
        }
    }
}
