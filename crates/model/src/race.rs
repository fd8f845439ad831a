use chrono::{NaiveDate, NaiveTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{
    broadcast::GroupInfo,
    course::Course,
    pace::RecordTime,
    runner::RaceMember,
    ExampleData,
};

/// A race as listed on the discovery screen.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RaceSummary {
    pub race_id: Id<RaceSummary>,
    pub race_title: String,
    pub race_date: NaiveDate,
    pub race_time: Option<NaiveTime>,
    pub race_img_url: Option<String>,
    pub race_courses: Vec<Course>,
    pub race_place: Option<String>,
    pub page_url: Option<String>,
}

impl HasId for RaceSummary {
    type IdType = i64;
}

impl ExampleData for RaceSummary {
    fn example_data() -> Self {
        Self {
            race_id: Id::new(1),
            race_title: "2025 서울 마라톤".to_owned(),
            race_date: NaiveDate::from_ymd_opt(2025, 3, 16).unwrap(),
            race_time: NaiveTime::from_hms_opt(8, 0, 0),
            race_img_url: Some("https://example.com/image/race/1.jpg".to_owned()),
            race_courses: vec![Course::Full, Course::Half, Course::Ten],
            race_place: Some("서울 광화문".to_owned()),
            page_url: Some("https://example.com/races/1".to_owned()),
        }
    }
}

/// Detail screen payload: the race itself, the viewer's own registration if
/// any, and the cheer groups broadcasting it.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RaceDetail {
    pub race_info: RaceSummary,
    pub race_member_info: Option<RaceMember>,
    pub group_info: Vec<GroupInfo>,
}

impl ExampleData for RaceDetail {
    fn example_data() -> Self {
        Self {
            race_info: RaceSummary::example_data(),
            race_member_info: Some(RaceMember::example_data()),
            group_info: vec![GroupInfo::example_data()],
        }
    }
}

/// Personal best for one course type.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BestRecord {
    pub race_id: Id<RaceSummary>,
    pub best_record: RecordTime,
    pub course_type: Course,
}

/// A finished race in the member's history.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PastRecord {
    pub race_id: Id<RaceSummary>,
    pub race_title: String,
    pub race_date: NaiveDate,
    pub race_img_url: Option<String>,
    pub course: Course,
    pub record: RecordTime,
    pub record_img: Option<String>,
    pub race_place: Option<String>,
}

/// Bib registration request body.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BibRegistration {
    pub bib: String,
    pub course: Course,
    pub target_record: Option<RecordTime>,
    pub outfit_img_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn race_summary_wire_fields() {
        let json = serde_json::to_value(RaceSummary::example_data()).unwrap();
        assert_eq!(json["raceId"], 1);
        assert_eq!(json["raceDate"], "2025-03-16");
        assert_eq!(json["raceCourses"][0], "FULL");
    }

    #[test]
    fn registration_without_target_skips_the_field() {
        let registration = BibRegistration {
            bib: "21919".to_owned(),
            course: Course::Half,
            target_record: None,
            outfit_img_url: None,
        };
        let json = serde_json::to_value(&registration).unwrap();
        assert_eq!(json["bib"], "21919");
        assert!(json.get("targetRecord").is_none());
    }
}
