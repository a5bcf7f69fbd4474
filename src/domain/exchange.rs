//! Public JSON document for roadmaps
//!
//! The exchange form is what an API consumer sends and receives: the roadmap
//! without bookkeeping timestamps, with identifiers written as short codes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::code::{Code, CodeError};
use super::date_format::DateFormat;
use super::roadmap::{Milestone, Project, Roadmap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapExchange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Code>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_id: Option<Code>,

    pub title: String,

    pub date_format: DateFormat,

    #[serde(default)]
    pub base_url: String,

    #[serde(default)]
    pub projects: Vec<Project>,

    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

impl RoadmapExchange {
    /// Converts the document into a roadmap created at `now`
    ///
    /// A missing id becomes 0, leaving id assignment to storage.
    pub fn into_roadmap(self, now: DateTime<Utc>) -> Roadmap {
        let mut roadmap = Roadmap::new(self.title, self.date_format, self.base_url, now);
        roadmap.id = self.id.map(|c| c.id()).unwrap_or(0);
        roadmap.prev_id = self.prev_id.map(|c| c.id());
        roadmap.projects = self.projects;
        roadmap.milestones = self.milestones;

        roadmap
    }
}

impl Roadmap {
    /// Converts the roadmap into its public document
    ///
    /// Fails if an id is too large to be written as a code.
    pub fn to_exchange(&self) -> Result<RoadmapExchange, CodeError> {
        let id = match self.id {
            0 => None,
            id => Some(Code::from_id(id)?),
        };
        let prev_id = self.prev_id.map(Code::from_id).transpose()?;

        Ok(RoadmapExchange {
            id,
            prev_id,
            title: self.title.clone(),
            date_format: self.date_format.clone(),
            base_url: self.base_url.clone(),
            projects: self.projects.clone(),
            milestones: self.milestones.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::code::MAX_CODE;
    use crate::domain::roadmap::Content;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn exchange_roundtrip() {
        let roadmap = Content::from("Epic [2020-01-01, 2020-02-01]\n\tTask [50%, |1]\n\n|Release")
            .to_roadmap(64, Some(1), "Plan", DateFormat::default(), "", now());

        let exchange = roadmap.to_exchange().unwrap();
        assert_eq!(exchange.id.map(|c| c.to_string()), Some("10".to_string()));
        assert_eq!(exchange.prev_id.map(|c| c.to_string()), Some("1".to_string()));

        assert_eq!(exchange.into_roadmap(now()), roadmap);
    }

    #[test]
    fn unassigned_id_is_omitted() {
        let roadmap = Content::from("Epic").to_roadmap(0, None, "Plan", DateFormat::default(), "", now());
        let json = serde_json::to_value(roadmap.to_exchange().unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "title": "Plan",
                "date_format": "2006-01-02",
                "base_url": "",
                "projects": [{"indentation": 0, "title": "Epic", "percentage": 0}],
                "milestones": [],
            })
        );
    }

    #[test]
    fn oversized_ids_cannot_be_exchanged() {
        let mut roadmap = Roadmap::new("Plan", DateFormat::default(), "", now());
        roadmap.id = MAX_CODE + 1;

        assert!(matches!(roadmap.to_exchange(), Err(CodeError::OutOfBounds(_))));
    }

    #[test]
    fn parses_public_json() {
        let json = r##"{
            "id": "aB3",
            "title": "Plan",
            "date_format": "2006-01-02",
            "projects": [
                {
                    "indentation": 0,
                    "title": "Epic",
                    "dates": {"start_at": "2020-01-01T00:00:00Z", "end_at": "2020-02-01T00:00:00Z"},
                    "color": "#a4f",
                    "percentage": 20,
                    "urls": ["https://example.com"],
                    "milestone": 1
                }
            ],
            "milestones": [{"title": "Release", "deadline_at": "2020-03-01T00:00:00Z"}]
        }"##;

        let exchange: RoadmapExchange = serde_json::from_str(json).unwrap();
        let roadmap = exchange.into_roadmap(now());

        assert_eq!(roadmap.id, 10 * 64 * 64 + 37 * 64 + 3);
        assert_eq!(roadmap.base_url, "");
        assert_eq!(
            roadmap.to_string(),
            "Epic [2020-01-01, 2020-02-01, 20%, #aa44ff, https://example.com, |1]\n\n|Release [2020-03-01]"
        );
    }

    #[test]
    fn rejects_invalid_codes() {
        let json = r#"{"id": "a-b", "title": "Plan", "date_format": "2006-01-02"}"#;

        assert!(serde_json::from_str::<RoadmapExchange>(json).is_err());
    }
}
