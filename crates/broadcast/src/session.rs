//! State of one live-tracking session.
//!
//! The route payload is fetched once per broadcast session and cached here
//! for its duration; roster snapshots are replaced wholesale on every
//! refresh, never diffed.

use indexmap::IndexMap;
use model::{
    broadcast::{BroadcastInfo, CheckpointReport, LiveSnapshot},
    course::Course,
    route::{Coordinate, MapData},
    runner::{RaceMember, RunnerStatus},
};
use utility::id::Id;

use crate::{resolver::RouteIndex, SessionError};

/// A runner with their resolved display position, ready for the map surface.
#[derive(Debug, Clone)]
pub struct RunnerPosition {
    pub member: RaceMember,
    pub coordinate: Coordinate,
}

pub struct LiveSession {
    info: BroadcastInfo,
    map: MapData,
    index: RouteIndex,
    snapshot: Option<LiveSnapshot>,
    course_filter: Option<Course>,
}

impl LiveSession {
    pub fn new(info: BroadcastInfo, map: MapData) -> Result<Self, SessionError> {
        let index = RouteIndex::build(&map.polylines)?;
        Ok(Self {
            info,
            map,
            index,
            snapshot: None,
            course_filter: None,
        })
    }

    pub fn info(&self) -> &BroadcastInfo {
        &self.info
    }

    pub fn map(&self) -> &MapData {
        &self.map
    }

    pub fn course_filter(&self) -> Option<Course> {
        self.course_filter
    }

    /// Select a course filter offered by this broadcast, or clear it.
    pub fn set_course_filter(
        &mut self,
        course: Option<Course>,
    ) -> Result<(), SessionError> {
        if let Some(course) = course {
            if !self.info.race_group_info.race_course.contains(&course) {
                return Err(SessionError::CourseNotOffered(course));
            }
        }
        self.course_filter = course;
        Ok(())
    }

    /// Replace the previous roster snapshot wholesale.
    pub fn replace_snapshot(&mut self, snapshot: LiveSnapshot) {
        log::debug!(
            "replacing roster snapshot: {} reports, {} runners",
            snapshot.race_reports.len(),
            snapshot.members().count()
        );
        self.snapshot = Some(snapshot);
    }

    /// Checkpoint sections for the list view, in course order, with the
    /// course filter applied to each section's members.
    pub fn list_view(&self) -> Vec<CheckpointReport> {
        let Some(snapshot) = &self.snapshot else {
            return Vec::new();
        };
        snapshot
            .race_reports
            .iter()
            .map(|report| CheckpointReport {
                race_members: report
                    .race_members
                    .iter()
                    .filter(|member| self.passes_filter(member))
                    .cloned()
                    .collect(),
                ..report.clone()
            })
            .collect()
    }

    /// Resolved positions for the map view. Non-starters are excluded here,
    /// upstream of the resolver; every other status is resolved, `DNF`
    /// included.
    pub fn map_view(&self) -> Vec<RunnerPosition> {
        let Some(snapshot) = &self.snapshot else {
            return Vec::new();
        };

        // A runner can appear under several checkpoint sections; the map
        // shows each one once, at their first-reported record. IndexMap keeps
        // the report order stable across refreshes.
        let mut members: IndexMap<Id<RaceMember>, &RaceMember> = IndexMap::new();
        for member in snapshot.members() {
            if member.status.is_non_starter() || !self.passes_filter(member) {
                continue;
            }
            members.entry(member.race_member_id.clone()).or_insert(member);
        }

        let markers = self.map.markers.as_deref().unwrap_or(&[]);
        members
            .into_values()
            .map(|member| RunnerPosition {
                coordinate: self.index.resolve(markers, member),
                member: member.clone(),
            })
            .collect()
    }

    /// Find a runner in the current snapshot, e.g. for the detail sheet.
    pub fn find_member(&self, id: &Id<RaceMember>) -> Option<&RaceMember> {
        self.snapshot
            .as_ref()
            .and_then(|snapshot| snapshot.members().find(|m| m.race_member_id == *id))
    }

    fn passes_filter(&self, member: &RaceMember) -> bool {
        self.course_filter
            .map(|course| member.course == course)
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use model::{
        broadcast::{GroupInfo, RaceGroupInfo},
        route::MarkerLabel,
        ExampleData,
    };

    use super::*;

    fn session() -> LiveSession {
        LiveSession::new(BroadcastInfo::example_data(), MapData::example_data()).unwrap()
    }

    fn member(id: i64, status: RunnerStatus, course: Course) -> RaceMember {
        RaceMember {
            race_member_id: Id::new(id),
            status,
            course,
            ..RaceMember::example_data()
        }
    }

    fn snapshot_of(members: Vec<RaceMember>) -> LiveSnapshot {
        let mut snapshot = LiveSnapshot::example_data();
        snapshot.race_reports[0].race_members = members;
        snapshot
    }

    #[test]
    fn empty_route_fails_session_construction() {
        let mut map = MapData::example_data();
        map.polylines.points.clear();
        let result = LiveSession::new(BroadcastInfo::example_data(), map);
        assert!(matches!(result, Err(SessionError::Route(_))));
    }

    #[test]
    fn views_are_empty_before_the_first_snapshot() {
        let session = session();
        assert!(session.list_view().is_empty());
        assert!(session.map_view().is_empty());
    }

    #[test]
    fn map_view_excludes_non_starters_only() {
        let mut session = session();
        session.replace_snapshot(snapshot_of(vec![
            member(1, RunnerStatus::Running, Course::Half),
            member(2, RunnerStatus::Dns, Course::Half),
            member(3, RunnerStatus::Dnf, Course::Half),
        ]));

        let positions = session.map_view();
        let ids: Vec<i64> = positions
            .iter()
            .map(|p| p.member.race_member_id.raw())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn map_view_lists_each_runner_once() {
        let mut session = session();
        let mut snapshot = snapshot_of(vec![member(7, RunnerStatus::Running, Course::Half)]);
        let mut second_report = snapshot.race_reports[0].clone();
        second_report.zone_id = "zone-finish".to_owned();
        second_report.race_members = vec![member(7, RunnerStatus::Finish, Course::Half)];
        snapshot.race_reports.push(second_report);
        session.replace_snapshot(snapshot);

        let positions = session.map_view();
        assert_eq!(positions.len(), 1);
        // first-reported record wins
        assert_eq!(positions[0].member.status, RunnerStatus::Running);
    }

    #[test]
    fn finished_runner_resolves_to_the_finish_marker() {
        let mut session = session();
        session.replace_snapshot(snapshot_of(vec![member(
            1,
            RunnerStatus::Finish,
            Course::Half,
        )]));

        let finish = session
            .map()
            .find_marker(MarkerLabel::Finish)
            .unwrap()
            .coordinate();
        let positions = session.map_view();
        assert_eq!(positions[0].coordinate, finish);
    }

    #[test]
    fn course_filter_applies_to_both_views() {
        let mut session = session();
        session.replace_snapshot(snapshot_of(vec![
            member(1, RunnerStatus::Running, Course::Half),
            member(2, RunnerStatus::Running, Course::Full),
        ]));
        session.set_course_filter(Some(Course::Half)).unwrap();

        assert_eq!(session.list_view()[0].race_members.len(), 1);
        assert_eq!(session.map_view().len(), 1);

        session.set_course_filter(None).unwrap();
        assert_eq!(session.map_view().len(), 2);
    }

    #[test]
    fn course_filter_must_be_offered_by_the_broadcast() {
        let info = BroadcastInfo {
            race_group_info: RaceGroupInfo {
                group_title: GroupInfo::example_data().group_title,
                race_title: "race".to_owned(),
                race_course: vec![Course::Ten],
            },
            map_url: "/map".to_owned(),
        };
        let mut session = LiveSession::new(info, MapData::example_data()).unwrap();
        assert_eq!(
            session.set_course_filter(Some(Course::Full)),
            Err(SessionError::CourseNotOffered(Course::Full))
        );
        assert!(session.set_course_filter(Some(Course::Ten)).is_ok());
    }

    #[test]
    fn snapshot_replacement_is_wholesale() {
        let mut session = session();
        session.replace_snapshot(snapshot_of(vec![
            member(1, RunnerStatus::Running, Course::Half),
            member(2, RunnerStatus::Running, Course::Half),
        ]));
        assert_eq!(session.map_view().len(), 2);

        session.replace_snapshot(snapshot_of(vec![member(
            3,
            RunnerStatus::Running,
            Course::Half,
        )]));
        let positions = session.map_view();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].member.race_member_id.raw(), 3);
    }

    #[test]
    fn find_member_searches_the_snapshot() {
        let mut session = session();
        session.replace_snapshot(snapshot_of(vec![member(
            42,
            RunnerStatus::Running,
            Course::Half,
        )]));
        assert!(session.find_member(&Id::new(42)).is_some());
        assert!(session.find_member(&Id::new(43)).is_none());
    }
}
