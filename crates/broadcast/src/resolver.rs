//! Places a runner on the course for the broadcast map.
//!
//! The resolver is a pure function over the fetched route payload and one
//! runner record. Distances use the flat-earth `*111 km/degree` approximation
//! so that positions stay comparable with the upstream map service.

use model::{
    route::{Coordinate, MapData, MarkerLabel, RouteMarker, RoutePolyline},
    runner::{RaceMember, RunnerStatus},
};
use utility::geo;

use crate::RouteError;

/// Compute the display coordinate for one runner.
///
/// - `FINISH` runners sit on the `FINISH` marker, falling back to the last
///   route point when the marker is missing.
/// - `REGISTERED` and `READY` runners sit on the `START` marker, falling back
///   to the first route point.
/// - Everything else is treated as in progress and placed at
///   `expected_distance` kilometers along the polyline. This includes `DNF`,
///   which the roster feed reports with its last known expected distance.
///
/// The only failure is an empty polyline. A single-point route resolves every
/// runner to that point.
pub fn resolve_position(
    route: &RoutePolyline,
    markers: &[RouteMarker],
    runner: &RaceMember,
) -> Result<Coordinate, RouteError> {
    let first = route.first().ok_or(RouteError::EmptyRoute)?;
    // non-empty, so a last point exists
    let last = route.last().unwrap_or(first);

    let marker_coordinate = |label: MarkerLabel| {
        markers
            .iter()
            .find(|marker| marker.label == label)
            .map(RouteMarker::coordinate)
    };

    match runner.status {
        RunnerStatus::Finish => Ok(marker_coordinate(MarkerLabel::Finish)
            .unwrap_or_else(|| last.coordinate())),
        RunnerStatus::Registered | RunnerStatus::Ready => Ok(marker_coordinate(
            MarkerLabel::Start,
        )
        .unwrap_or_else(|| first.coordinate())),
        _ => Ok(coordinate_at_distance(route, runner.expected_distance)),
    }
}

/// Convenience wrapper over a whole map payload.
pub fn resolve_on_map(
    map: &MapData,
    runner: &RaceMember,
) -> Result<Coordinate, RouteError> {
    resolve_position(
        &map.polylines,
        map.markers.as_deref().unwrap_or(&[]),
        runner,
    )
}

/// Walk the polyline and interpolate the coordinate at `target_km` cumulative
/// kilometers. Overshoot past the course end returns the final point; a
/// negative target resolves to the start of the first segment.
fn coordinate_at_distance(route: &RoutePolyline, target_km: f64) -> Coordinate {
    let mut accumulated = 0.0;

    for (point_1, point_2) in route.segments() {
        let segment_km = point_1.distance_to(point_2);
        if segment_km <= 0.0 {
            // duplicate samples contribute no distance
            continue;
        }
        if accumulated + segment_km >= target_km {
            let ratio = ((target_km - accumulated) / segment_km).max(0.0);
            return Coordinate::new(
                geo::lerp(point_1.latitude, point_2.latitude, ratio),
                geo::lerp(point_1.longitude, point_2.longitude, ratio),
            );
        }
        accumulated += segment_km;
    }

    // walk exhausted all segments without reaching the target
    route
        .last()
        .map(|point| point.coordinate())
        .unwrap_or(Coordinate::new(0.0, 0.0))
}

/// Precomputed cumulative-distance table over a route, for resolving whole
/// rosters without re-walking the polyline per runner. Produces exactly the
/// same coordinates as [`resolve_position`].
#[derive(Debug, Clone)]
pub struct RouteIndex {
    points: Vec<(f64, f64)>,
    /// cumulative kilometers at each point, strictly increasing
    cumulative_km: Vec<f64>,
}

impl RouteIndex {
    pub fn build(route: &RoutePolyline) -> Result<Self, RouteError> {
        if route.is_empty() {
            return Err(RouteError::EmptyRoute);
        }

        let mut points = Vec::with_capacity(route.len());
        let mut cumulative_km = Vec::with_capacity(route.len());
        let mut accumulated = 0.0;
        let mut previous = None;

        for point in &route.points {
            if let Some(previous) = previous {
                let segment_km = point.distance_to(previous);
                if segment_km <= 0.0 {
                    continue;
                }
                accumulated += segment_km;
            }
            points.push((point.latitude, point.longitude));
            cumulative_km.push(accumulated);
            previous = Some(point);
        }

        Ok(Self {
            points,
            cumulative_km,
        })
    }

    pub fn total_km(&self) -> f64 {
        *self.cumulative_km.last().unwrap_or(&0.0)
    }

    /// Binary-search equivalent of the linear distance walk.
    pub fn coordinate_at(&self, target_km: f64) -> Coordinate {
        let last = self.points.len() - 1;
        // first point whose cumulative distance reaches the target
        let upper = self
            .cumulative_km
            .partition_point(|&km| km < target_km)
            .min(last);
        if upper == 0 {
            let (latitude, longitude) = self.points[0];
            return Coordinate::new(latitude, longitude);
        }
        if self.cumulative_km[last] < target_km {
            let (latitude, longitude) = self.points[last];
            return Coordinate::new(latitude, longitude);
        }

        let lower = upper - 1;
        let segment_km = self.cumulative_km[upper] - self.cumulative_km[lower];
        let ratio = ((target_km - self.cumulative_km[lower]) / segment_km).max(0.0);
        let (lat_1, lon_1) = self.points[lower];
        let (lat_2, lon_2) = self.points[upper];
        Coordinate::new(
            geo::lerp(lat_1, lat_2, ratio),
            geo::lerp(lon_1, lon_2, ratio),
        )
    }

    pub fn resolve(
        &self,
        markers: &[RouteMarker],
        runner: &RaceMember,
    ) -> Coordinate {
        let marker_coordinate = |label: MarkerLabel| {
            markers
                .iter()
                .find(|marker| marker.label == label)
                .map(RouteMarker::coordinate)
        };

        match runner.status {
            RunnerStatus::Finish => {
                marker_coordinate(MarkerLabel::Finish).unwrap_or_else(|| {
                    let (latitude, longitude) = self.points[self.points.len() - 1];
                    Coordinate::new(latitude, longitude)
                })
            }
            RunnerStatus::Registered | RunnerStatus::Ready => {
                marker_coordinate(MarkerLabel::Start).unwrap_or_else(|| {
                    let (latitude, longitude) = self.points[0];
                    Coordinate::new(latitude, longitude)
                })
            }
            _ => self.coordinate_at(runner.expected_distance),
        }
    }
}

#[cfg(test)]
mod tests {
    use model::{route::RoutePoint, ExampleData};

    use super::*;

    fn runner(status: RunnerStatus, expected_distance: f64) -> RaceMember {
        RaceMember {
            status,
            expected_distance,
            ..RaceMember::example_data()
        }
    }

    fn two_point_route() -> RoutePolyline {
        RoutePolyline::new(vec![RoutePoint::new(0.0, 0.0), RoutePoint::new(0.0, 1.0)])
    }

    fn markers() -> Vec<RouteMarker> {
        vec![
            RouteMarker::new(10.0, 20.0, MarkerLabel::Start),
            RouteMarker::new(30.0, 40.0, MarkerLabel::Finish),
        ]
    }

    #[test]
    fn finished_runner_sits_on_the_finish_marker() {
        let position = resolve_position(
            &two_point_route(),
            &markers(),
            &runner(RunnerStatus::Finish, 3.0),
        )
        .unwrap();
        assert_eq!(position, Coordinate::new(30.0, 40.0));
    }

    #[test]
    fn finished_runner_falls_back_to_the_last_point() {
        let position =
            resolve_position(&two_point_route(), &[], &runner(RunnerStatus::Finish, 3.0))
                .unwrap();
        assert_eq!(position, Coordinate::new(0.0, 1.0));
    }

    #[test]
    fn waiting_runners_sit_on_the_start_marker() {
        for status in [RunnerStatus::Registered, RunnerStatus::Ready] {
            let position =
                resolve_position(&two_point_route(), &markers(), &runner(status, 0.0))
                    .unwrap();
            assert_eq!(position, Coordinate::new(10.0, 20.0));
        }
    }

    #[test]
    fn waiting_runner_falls_back_to_the_first_point() {
        let position =
            resolve_position(&two_point_route(), &[], &runner(RunnerStatus::Ready, 0.0))
                .unwrap();
        assert_eq!(position, Coordinate::new(0.0, 0.0));
    }

    #[test]
    fn running_runner_interpolates_along_the_segment() {
        // the two points are ~111 km apart under the approximation
        let position = resolve_position(
            &two_point_route(),
            &markers(),
            &runner(RunnerStatus::Running, 55.5),
        )
        .unwrap();
        assert!((position.latitude - 0.0).abs() < 1e-9);
        assert!((position.longitude - 0.5).abs() < 1e-9);
    }

    #[test]
    fn midpoint_of_the_second_of_two_colinear_segments() {
        // cumulative distances 0, 10, 20 km along a meridian
        let route = RoutePolyline::new(vec![
            RoutePoint::new(0.0, 0.0),
            RoutePoint::new(10.0 / 111.0, 0.0),
            RoutePoint::new(20.0 / 111.0, 0.0),
        ]);
        let position =
            resolve_position(&route, &[], &runner(RunnerStatus::Running, 15.0)).unwrap();
        assert!((position.latitude - 15.0 / 111.0).abs() < 1e-9);
        assert!((position.longitude - 0.0).abs() < 1e-9);
    }

    #[test]
    fn overshoot_returns_the_last_point() {
        let position = resolve_position(
            &two_point_route(),
            &[],
            &runner(RunnerStatus::Running, 500.0),
        )
        .unwrap();
        assert_eq!(position, Coordinate::new(0.0, 1.0));
    }

    #[test]
    fn negative_distance_resolves_to_the_segment_start() {
        let position = resolve_position(
            &two_point_route(),
            &[],
            &runner(RunnerStatus::Running, -3.0),
        )
        .unwrap();
        assert_eq!(position, Coordinate::new(0.0, 0.0));
    }

    #[test]
    fn dnf_takes_the_in_progress_branch() {
        let position =
            resolve_position(&two_point_route(), &[], &runner(RunnerStatus::Dnf, 55.5))
                .unwrap();
        assert!((position.longitude - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_route_is_an_error() {
        let route = RoutePolyline::new(vec![]);
        assert_eq!(
            resolve_position(&route, &[], &runner(RunnerStatus::Running, 1.0)),
            Err(RouteError::EmptyRoute)
        );
    }

    #[test]
    fn single_point_route_resolves_everything_to_that_point() {
        let route = RoutePolyline::new(vec![RoutePoint::new(1.0, 2.0)]);
        for status in [
            RunnerStatus::Registered,
            RunnerStatus::Running,
            RunnerStatus::Finish,
        ] {
            let position = resolve_position(&route, &[], &runner(status, 5.0)).unwrap();
            assert_eq!(position, Coordinate::new(1.0, 2.0));
        }
    }

    #[test]
    fn duplicate_samples_do_not_break_interpolation() {
        let route = RoutePolyline::new(vec![
            RoutePoint::new(0.0, 0.0),
            RoutePoint::new(0.0, 0.0),
            RoutePoint::new(0.0, 1.0),
        ]);
        let position =
            resolve_position(&route, &[], &runner(RunnerStatus::Running, 55.5)).unwrap();
        assert!((position.longitude - 0.5).abs() < 1e-9);
    }

    #[test]
    fn resolver_is_idempotent() {
        let map = MapData::example_data();
        let member = runner(RunnerStatus::Running, 4.2);
        let first = resolve_on_map(&map, &member).unwrap();
        let second = resolve_on_map(&map, &member).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn index_matches_the_linear_walk() {
        let map = MapData::example_data();
        let index = RouteIndex::build(&map.polylines).unwrap();
        let total = map.polylines.total_distance_km();

        let mut target = -1.0;
        while target < total + 2.0 {
            let walked = coordinate_at_distance(&map.polylines, target);
            let indexed = index.coordinate_at(target);
            assert!(
                (walked.latitude - indexed.latitude).abs() < 1e-9
                    && (walked.longitude - indexed.longitude).abs() < 1e-9,
                "diverged at {} km: {:?} vs {:?}",
                target,
                walked,
                indexed
            );
            target += 0.25;
        }
    }

    #[test]
    fn index_resolves_statuses_like_the_resolver() {
        let map = MapData::example_data();
        let markers = map.markers.clone().unwrap();
        let index = RouteIndex::build(&map.polylines).unwrap();

        for status in [
            RunnerStatus::Registered,
            RunnerStatus::Ready,
            RunnerStatus::Running,
            RunnerStatus::Finish,
            RunnerStatus::Dnf,
        ] {
            let member = runner(status, 6.5);
            let expected = resolve_on_map(&map, &member).unwrap();
            let actual = index.resolve(&markers, &member);
            assert_eq!(expected, actual, "status {:?}", status);
        }
    }

    #[test]
    fn index_rejects_an_empty_route() {
        assert_eq!(
            RouteIndex::build(&RoutePolyline::new(vec![])).err(),
            Some(RouteError::EmptyRoute)
        );
    }
}
