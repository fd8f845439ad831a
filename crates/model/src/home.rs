use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{
    race::{BestRecord, PastRecord, RaceSummary},
    ExampleData,
};

/// The authenticated member.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub member_id: Id<Member>,
    pub member_name: String,
}

impl HasId for Member {
    type IdType = i64;
}

impl ExampleData for Member {
    fn example_data() -> Self {
        Self {
            member_id: Id::new(1),
            member_name: "테스트 유저".to_owned(),
        }
    }
}

/// Home screen payload: who is logged in, their personal bests, upcoming
/// races and their race history.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HomeData {
    pub member_id: Id<Member>,
    pub member_name: String,
    pub best_full_record: Option<BestRecord>,
    pub best_half_record: Option<BestRecord>,
    pub best_ten_record: Option<BestRecord>,
    pub race_infos: Vec<RaceSummary>,
    pub record_infos: Vec<PastRecord>,
}

impl ExampleData for HomeData {
    fn example_data() -> Self {
        use chrono::NaiveDate;

        use crate::course::Course;

        let member = Member::example_data();
        Self {
            member_id: member.member_id,
            member_name: member.member_name,
            best_full_record: Some(BestRecord {
                race_id: Id::new(1),
                best_record: "03:45:30".parse().unwrap(),
                course_type: Course::Full,
            }),
            best_half_record: Some(BestRecord {
                race_id: Id::new(2),
                best_record: "01:45:20".parse().unwrap(),
                course_type: Course::Half,
            }),
            best_ten_record: None,
            race_infos: vec![RaceSummary::example_data()],
            record_infos: vec![PastRecord {
                race_id: Id::new(4),
                race_title: "2024 춘천 마라톤".to_owned(),
                race_date: NaiveDate::from_ymd_opt(2024, 10, 27).unwrap(),
                race_img_url: None,
                course: Course::Half,
                record: "01:45:20".parse().unwrap(),
                record_img: None,
                race_place: Some("춘천".to_owned()),
            }],
        }
    }
}
