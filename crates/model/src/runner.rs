use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{
    course::Course,
    pace::{Pace, RecordTime},
    ExampleData,
};

/// One participant's current race state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunnerStatus {
    Registered,
    Ready,
    Running,
    Finish,
    Dns,
    Dnf,
}

impl RunnerStatus {
    /// True for runners that never started; the broadcast map leaves them out.
    pub fn is_non_starter(&self) -> bool {
        matches!(self, RunnerStatus::Dns)
    }
}

impl fmt::Display for RunnerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RunnerStatus::Registered => "REGISTERED",
            RunnerStatus::Ready => "READY",
            RunnerStatus::Running => "RUNNING",
            RunnerStatus::Finish => "FINISH",
            RunnerStatus::Dns => "DNS",
            RunnerStatus::Dnf => "DNF",
        };
        write!(f, "{}", text)
    }
}

/// A tracked runner within a race, as reported by the live roster endpoint.
///
/// `expected_distance` is the estimated cumulative distance covered in
/// kilometers. It is only meaningful while the runner is `RUNNING` and is not
/// validated against the course length.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RaceMember {
    pub race_member_id: Id<RaceMember>,
    pub member_id: i64,
    pub member_name: String,
    pub bib: String,
    pub status: RunnerStatus,
    pub course: Course,
    pub expected_distance: f64,
    pub avg_pace: Option<Pace>,
    pub record: Option<RecordTime>,
    pub target_record: Option<RecordTime>,
    pub thumbnail_img_url: Option<String>,
    pub img_url: Option<String>,
    pub passing_alert: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl HasId for RaceMember {
    type IdType = i64;
}

impl ExampleData for RaceMember {
    fn example_data() -> Self {
        Self {
            race_member_id: Id::new(2029),
            member_id: 1,
            member_name: "장신석".to_owned(),
            bib: "21919".to_owned(),
            status: RunnerStatus::Running,
            course: Course::Half,
            expected_distance: 12.4,
            avg_pace: Some("04:52".parse().unwrap()),
            record: None,
            target_record: Some("01:45:00".parse().unwrap()),
            thumbnail_img_url: Some(
                "https://example.com/image/race/139/thumbnail/2029.jpg".to_owned(),
            ),
            img_url: None,
            passing_alert: false,
            created_at: None,
        }
    }
}

/// A row of the runner search used when a supporter looks up who to cheer.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunnerSearchResult {
    pub race_member_id: Id<RaceMember>,
    pub member_name: String,
    pub bib: String,
    pub course: Course,
    pub thumbnail_img_url: Option<String>,
    pub unique_code: Option<String>,
    pub status: Option<RunnerStatus>,
    pub avg_pace: Option<Pace>,
}

/// Field the runner search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum SearchKind {
    Name,
    Bib,
    Code,
}
