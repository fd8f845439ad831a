//! Fixed dataset served by the mock backend.
//!
//! Stands in for the real API while it is not available; the values extend
//! the canonical `ExampleData` samples with enough variety (courses,
//! statuses, several broadcasts) to drive the client screens.

use std::collections::HashMap;

use chrono::NaiveDate;
use itertools::Itertools;
use model::{
    broadcast::{BroadcastInfo, CheckpointReport, GroupInfo, LiveSnapshot},
    course::Course,
    home::HomeData,
    race::{BibRegistration, RaceDetail, RaceSummary},
    route::{MapData, MarkerLabel},
    runner::{RaceMember, RunnerSearchResult, RunnerStatus},
    ExampleData,
};
use utility::id::Id;

pub struct MockBroadcast {
    pub info: BroadcastInfo,
    pub map: MapData,
    pub roster: Vec<RaceMember>,
}

pub struct MockDataset {
    pub home: HomeData,
    pub races: Vec<RaceSummary>,
    pub details: HashMap<i64, RaceDetail>,
    pub broadcasts: HashMap<String, MockBroadcast>,
}

impl MockDataset {
    pub fn generate() -> Self {
        let seoul = RaceSummary::example_data();
        let daegu = RaceSummary {
            race_id: Id::new(2),
            race_title: "2025 대구 마라톤".to_owned(),
            race_date: NaiveDate::from_ymd_opt(2025, 4, 6).unwrap(),
            race_courses: vec![Course::Full, Course::Half],
            race_place: Some("대구 스타디움".to_owned()),
            ..RaceSummary::example_data()
        };

        let mut home = HomeData::example_data();
        home.race_infos = vec![seoul.clone(), daegu.clone()];

        let group = GroupInfo::example_data();
        let detail = RaceDetail {
            race_info: seoul.clone(),
            race_member_info: Some(RaceMember::example_data()),
            group_info: vec![
                group.clone(),
                GroupInfo {
                    broadcast_key: Id::new("bk-2025-seoul-full".to_owned()),
                    group_title: "한강 러너스".to_owned(),
                    group_admin_name: None,
                },
            ],
        };
        let daegu_detail = RaceDetail {
            race_info: daegu.clone(),
            race_member_info: None,
            group_info: Vec::new(),
        };

        let key = group.broadcast_key.raw();
        let broadcast = MockBroadcast {
            info: BroadcastInfo::example_data(),
            map: MapData::example_data(),
            roster: mock_roster(),
        };

        Self {
            home,
            races: vec![seoul, daegu],
            details: HashMap::from([(1, detail), (2, daegu_detail)]),
            broadcasts: HashMap::from([(key, broadcast)]),
        }
    }

    pub fn race_detail(&self, race_id: i64) -> Option<&RaceDetail> {
        self.details.get(&race_id)
    }

    pub fn broadcast(&self, key: &str) -> Option<&MockBroadcast> {
        self.broadcasts.get(key)
    }

    /// Register a bib in a race; returns the created member record. The
    /// dataset itself stays fixed, mirroring how the stand-in backend never
    /// persisted anything.
    pub fn registered_member(
        &self,
        race_id: i64,
        registration: &BibRegistration,
    ) -> Option<RaceMember> {
        self.race_detail(race_id)?;
        let member = self.home.member_id.raw();
        Some(RaceMember {
            race_member_id: Id::new(member * 1000 + race_id),
            member_id: member,
            member_name: self.home.member_name.clone(),
            bib: registration.bib.clone(),
            status: RunnerStatus::Registered,
            course: registration.course,
            expected_distance: 0.0,
            avg_pace: None,
            record: None,
            target_record: registration.target_record,
            thumbnail_img_url: None,
            img_url: registration.outfit_img_url.clone(),
            passing_alert: false,
            created_at: None,
        })
    }

    pub fn search_runners(
        &self,
        race_id: i64,
        predicate: impl Fn(&RaceMember) -> bool,
    ) -> Vec<RunnerSearchResult> {
        let _ = race_id; // single-race roster in the mock
        self.broadcasts
            .values()
            .flat_map(|broadcast| broadcast.roster.iter())
            .filter(|member| predicate(member))
            .map(|member| RunnerSearchResult {
                race_member_id: member.race_member_id.clone(),
                member_name: member.member_name.clone(),
                bib: member.bib.clone(),
                course: member.course,
                thumbnail_img_url: member.thumbnail_img_url.clone(),
                unique_code: Some(unique_code(member.race_member_id.raw())),
                status: Some(member.status),
                avg_pace: member.avg_pace,
            })
            .collect()
    }
}

impl MockBroadcast {
    /// Build the list-view snapshot: runners grouped under the last
    /// checkpoint at or before their expected distance, sections ordered
    /// along the course.
    pub fn live_snapshot(&self, course: Option<Course>) -> LiveSnapshot {
        let checkpoints = self.checkpoints();

        let grouped: HashMap<usize, Vec<&RaceMember>> = self
            .roster
            .iter()
            .filter(|member| {
                course
                    .map(|course| member.course == course)
                    .unwrap_or(true)
            })
            .into_group_map_by(|member| self.section_of(member, &checkpoints));

        let race_reports = checkpoints
            .iter()
            .enumerate()
            .map(|(index, checkpoint)| {
                let members = grouped
                    .get(&index)
                    .map(|members| {
                        members.iter().map(|member| (*member).clone()).collect_vec()
                    })
                    .unwrap_or_default();
                CheckpointReport {
                    zone_id: format!("zone-{}", checkpoint.label),
                    course_title: checkpoint.title.clone(),
                    point: checkpoint.km,
                    pass_status: format!("{}명 통과", members.len()),
                    latitude: Some(checkpoint.latitude),
                    longitude: Some(checkpoint.longitude),
                    has_notification: false,
                    is_first_net_time: index == 0,
                    is_cheer_zone: checkpoint.cheer_zone,
                    race_members: members,
                }
            })
            .collect();

        LiveSnapshot { race_reports }
    }

    fn checkpoints(&self) -> Vec<Checkpoint> {
        let total = self.map.polylines.total_distance_km();
        let markers = self.map.markers.as_deref().unwrap_or(&[]);
        markers
            .iter()
            .map(|marker| {
                let (km, title, cheer_zone) = match marker.label {
                    MarkerLabel::Start => (0.0, "출발".to_owned(), false),
                    MarkerLabel::Finish => (total, "피니시".to_owned(), false),
                    MarkerLabel::Checkpoint(km) => {
                        (km as f64, format!("{}km 지점", km), true)
                    }
                };
                Checkpoint {
                    label: marker.label.to_string(),
                    title,
                    km,
                    latitude: marker.point[0],
                    longitude: marker.point[1],
                    cheer_zone,
                }
            })
            .sorted_by(|a, b| a.km.total_cmp(&b.km))
            .collect()
    }

    fn section_of(&self, member: &RaceMember, checkpoints: &[Checkpoint]) -> usize {
        if member.status == RunnerStatus::Finish {
            return checkpoints.len().saturating_sub(1);
        }
        checkpoints
            .iter()
            .rposition(|checkpoint| checkpoint.km <= member.expected_distance)
            .unwrap_or(0)
    }
}

struct Checkpoint {
    label: String,
    title: String,
    km: f64,
    latitude: f64,
    longitude: f64,
    cheer_zone: bool,
}

fn unique_code(race_member_id: i64) -> String {
    // stable 4-character cheer code derived from the id
    const ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
    let mut value = race_member_id as u64 ^ 0xA5A5;
    let mut code = String::new();
    for _ in 0..4 {
        code.push(ALPHABET[(value % ALPHABET.len() as u64) as usize] as char);
        value /= ALPHABET.len() as u64;
    }
    code
}

fn mock_roster() -> Vec<RaceMember> {
    let template = RaceMember::example_data();
    let member = |id: i64,
                  name: &str,
                  bib: &str,
                  status: RunnerStatus,
                  course: Course,
                  expected_distance: f64,
                  pace: &str| RaceMember {
        race_member_id: Id::new(id),
        member_id: id,
        member_name: name.to_owned(),
        bib: bib.to_owned(),
        status,
        course,
        expected_distance,
        avg_pace: pace.parse().ok(),
        thumbnail_img_url: Some(format!(
            "https://example.com/image/race/139/thumbnail/{}.jpg",
            id
        )),
        ..template.clone()
    };

    vec![
        member(2029, "장신석", "21919", RunnerStatus::Finish, Course::Half, 21.0975, "03:52"),
        member(2052, "윤호정", "21857", RunnerStatus::Running, Course::Half, 12.4, "04:05"),
        member(2049, "이승민", "21986", RunnerStatus::Running, Course::Half, 7.8, "04:08"),
        member(2025, "문영조", "21346", RunnerStatus::Running, Course::Full, 4.1, "04:19"),
        member(2071, "박도윤", "22104", RunnerStatus::Ready, Course::Ten, 0.0, "05:10"),
        member(2088, "최하늘", "22310", RunnerStatus::Dns, Course::Half, 0.0, "04:45"),
        member(2090, "정우람", "22415", RunnerStatus::Dnf, Course::Full, 2.3, "04:58"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_is_internally_consistent() {
        let dataset = MockDataset::generate();
        assert_eq!(dataset.races.len(), 2);
        for race in &dataset.races {
            assert!(dataset.race_detail(race.race_id.raw()).is_some());
        }
        // every group on the seoul detail page with a broadcast can be opened
        let detail = dataset.race_detail(1).unwrap();
        let first_key = detail.group_info[0].broadcast_key.raw();
        assert!(dataset.broadcast(&first_key).is_some());
    }

    #[test]
    fn snapshot_sections_are_ordered_along_the_course() {
        let dataset = MockDataset::generate();
        let broadcast = dataset.broadcast("bk-2025-seoul-half").unwrap();
        let snapshot = broadcast.live_snapshot(None);

        let points: Vec<f64> = snapshot
            .race_reports
            .iter()
            .map(|report| report.point)
            .collect();
        let mut sorted = points.clone();
        sorted.sort_by(f64::total_cmp);
        assert_eq!(points, sorted);
        assert!(points.len() >= 3);
    }

    #[test]
    fn finished_runners_land_in_the_last_section() {
        let dataset = MockDataset::generate();
        let broadcast = dataset.broadcast("bk-2025-seoul-half").unwrap();
        let snapshot = broadcast.live_snapshot(None);

        let last = snapshot.race_reports.last().unwrap();
        assert!(last
            .race_members
            .iter()
            .any(|member| member.status == RunnerStatus::Finish));
    }

    #[test]
    fn course_filter_narrows_the_snapshot() {
        let dataset = MockDataset::generate();
        let broadcast = dataset.broadcast("bk-2025-seoul-half").unwrap();

        let all = broadcast.live_snapshot(None);
        let half = broadcast.live_snapshot(Some(Course::Half));
        assert!(half.members().count() < all.members().count());
        assert!(half.members().all(|member| member.course == Course::Half));
    }

    #[test]
    fn search_matches_by_bib() {
        let dataset = MockDataset::generate();
        let results = dataset.search_runners(1, |member| member.bib == "21857");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].member_name, "윤호정");
        assert_eq!(results[0].unique_code.as_ref().unwrap().len(), 4);
    }

    #[test]
    fn registration_echoes_the_request() {
        let dataset = MockDataset::generate();
        let member = dataset
            .registered_member(
                1,
                &BibRegistration {
                    bib: "30001".to_owned(),
                    course: Course::Ten,
                    target_record: Some("00:55:00".parse().unwrap()),
                    outfit_img_url: None,
                },
            )
            .unwrap();
        assert_eq!(member.status, RunnerStatus::Registered);
        assert_eq!(member.bib, "30001");
        assert_eq!(member.course, Course::Ten);
    }
}
