use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{course::Course, runner::RaceMember, ExampleData};

/// A cheer group broadcasting one race. The broadcast key is the opaque
/// identifier a live-tracking session is scoped to.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    // historical field spelling, kept for wire compatibility
    #[serde(rename = "broadCastKey")]
    pub broadcast_key: Id<GroupInfo>,
    pub group_title: String,
    pub group_admin_name: Option<String>,
}

impl HasId for GroupInfo {
    type IdType = String;
}

impl ExampleData for GroupInfo {
    fn example_data() -> Self {
        Self {
            broadcast_key: Id::new("bk-2025-seoul-half".to_owned()),
            group_title: "여의도 러닝크루".to_owned(),
            group_admin_name: Some("김관리".to_owned()),
        }
    }
}

/// Header data of a broadcast session: which group, which race, which courses
/// can be filtered, and where the route payload lives.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RaceGroupInfo {
    pub group_title: String,
    pub race_title: String,
    pub race_course: Vec<Course>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastInfo {
    pub race_group_info: RaceGroupInfo,
    pub map_url: String,
}

impl ExampleData for BroadcastInfo {
    fn example_data() -> Self {
        Self {
            race_group_info: RaceGroupInfo {
                group_title: "여의도 러닝크루".to_owned(),
                race_title: "2025 서울 마라톤".to_owned(),
                race_course: vec![Course::Full, Course::Half, Course::Ten],
            },
            map_url: "/api/v1/broadcasts/bk-2025-seoul-half/map".to_owned(),
        }
    }
}

/// One checkpoint section of the live list view, with the runners currently
/// attributed to it.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointReport {
    pub zone_id: String,
    pub course_title: String,
    /// Checkpoint position in kilometers from the start.
    pub point: f64,
    pub pass_status: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub has_notification: bool,
    pub is_first_net_time: bool,
    pub is_cheer_zone: bool,
    pub race_members: Vec<RaceMember>,
}

/// A full roster snapshot. Each refresh replaces the previous snapshot
/// wholesale; reports arrive ordered along the course.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LiveSnapshot {
    pub race_reports: Vec<CheckpointReport>,
}

impl LiveSnapshot {
    /// All runners across every checkpoint, in report order.
    pub fn members(&self) -> impl Iterator<Item = &RaceMember> {
        self.race_reports
            .iter()
            .flat_map(|report| report.race_members.iter())
    }
}

impl ExampleData for LiveSnapshot {
    fn example_data() -> Self {
        let member = RaceMember::example_data();
        Self {
            race_reports: vec![CheckpointReport {
                zone_id: "zone-10k".to_owned(),
                course_title: "10km 지점".to_owned(),
                point: 10.0,
                pass_status: "3명 통과".to_owned(),
                latitude: Some(37.5395),
                longitude: Some(126.9920),
                has_notification: false,
                is_first_net_time: false,
                is_cheer_zone: true,
                race_members: vec![member],
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_info_keeps_the_historical_key_spelling() {
        let json = serde_json::to_value(GroupInfo::example_data()).unwrap();
        assert_eq!(json["broadCastKey"], "bk-2025-seoul-half");
        assert!(json.get("broadcastKey").is_none());
    }

    #[test]
    fn snapshot_members_flattens_reports() {
        let snapshot = LiveSnapshot::example_data();
        assert_eq!(snapshot.members().count(), 1);
    }
}
