use std::{borrow::Cow, fmt};

use schemars::{
    gen::SchemaGenerator,
    schema::{ArrayValidation, InstanceType, Schema, SchemaObject},
    JsonSchema,
};
use serde::{de, ser::SerializeSeq, Deserialize, Serialize};
use utility::geo;

use crate::ExampleData;

/// A resolved display position, as handed to the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One sample of the course, `[latitude, longitude, elevation?]` on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutePoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
}

impl RoutePoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: None,
        }
    }

    pub fn with_elevation(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: Some(elevation),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Flat-earth distance to the next sample in kilometers.
    pub fn distance_to(&self, other: &RoutePoint) -> f64 {
        geo::flat_distance_km(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

impl Serialize for RoutePoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let len = if self.elevation.is_some() { 3 } else { 2 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.latitude)?;
        seq.serialize_element(&self.longitude)?;
        if let Some(elevation) = self.elevation {
            seq.serialize_element(&elevation)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for RoutePoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let values = Vec::<f64>::deserialize(deserializer)?;
        match values.as_slice() {
            [latitude, longitude] => Ok(RoutePoint::new(*latitude, *longitude)),
            [latitude, longitude, elevation] => Ok(RoutePoint::with_elevation(
                *latitude, *longitude, *elevation,
            )),
            other => Err(de::Error::invalid_length(
                other.len(),
                &"an array of 2 or 3 numbers",
            )),
        }
    }
}

impl JsonSchema for RoutePoint {
    fn schema_name() -> String {
        "RoutePoint".to_owned()
    }

    fn schema_id() -> Cow<'static, str> {
        Cow::Borrowed(concat!(module_path!(), "::RoutePoint"))
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(InstanceType::Array.into()),
            array: Some(Box::new(ArrayValidation {
                items: Some(gen.subschema_for::<f64>().into()),
                min_items: Some(2),
                max_items: Some(3),
                ..Default::default()
            })),
            ..Default::default()
        }
        .into()
    }
}

/// The race course from start to finish. Ordering is significant: it defines
/// cumulative distance along the course. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RoutePolyline {
    pub points: Vec<RoutePoint>,
}

impl RoutePolyline {
    pub fn new(points: Vec<RoutePoint>) -> Self {
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn first(&self) -> Option<&RoutePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&RoutePoint> {
        self.points.last()
    }

    /// Consecutive point pairs, in course order.
    pub fn segments(&self) -> impl Iterator<Item = (&RoutePoint, &RoutePoint)> {
        self.points.iter().zip(self.points.iter().skip(1))
    }

    /// Total course length in kilometers under the flat-earth approximation.
    pub fn total_distance_km(&self) -> f64 {
        self.segments()
            .map(|(from, to)| from.distance_to(to))
            .sum()
    }
}

/// Label of a named point of interest along the course. `"START"`, `"FINISH"`
/// or a numeric kilometer label on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerLabel {
    Start,
    Finish,
    Checkpoint(u32),
}

impl fmt::Display for MarkerLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerLabel::Start => write!(f, "START"),
            MarkerLabel::Finish => write!(f, "FINISH"),
            MarkerLabel::Checkpoint(km) => write!(f, "{}", km),
        }
    }
}

impl Serialize for MarkerLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            MarkerLabel::Start => serializer.serialize_str("START"),
            MarkerLabel::Finish => serializer.serialize_str("FINISH"),
            MarkerLabel::Checkpoint(km) => serializer.serialize_u32(*km),
        }
    }
}

impl<'de> Deserialize<'de> for MarkerLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Text(String),
            Number(u32),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Text(text) => match text.as_str() {
                "START" => Ok(MarkerLabel::Start),
                "FINISH" => Ok(MarkerLabel::Finish),
                other => Err(de::Error::unknown_variant(
                    other,
                    &["START", "FINISH", "a kilometer number"],
                )),
            },
            Wire::Number(km) => Ok(MarkerLabel::Checkpoint(km)),
        }
    }
}

impl JsonSchema for MarkerLabel {
    fn schema_name() -> String {
        "MarkerLabel".to_owned()
    }

    fn schema_id() -> Cow<'static, str> {
        Cow::Borrowed(concat!(module_path!(), "::MarkerLabel"))
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(
                vec![InstanceType::String, InstanceType::Integer].into(),
            ),
            ..Default::default()
        }
        .into()
    }
}

/// A named fixed point along the route (start, finish, distance marker).
/// Unordered on the wire, looked up by label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteMarker {
    pub point: [f64; 2],
    pub label: MarkerLabel,
}

impl RouteMarker {
    pub fn new(latitude: f64, longitude: f64, label: MarkerLabel) -> Self {
        Self {
            point: [latitude, longitude],
            label,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.point[0], self.point[1])
    }
}

/// Route payload of a broadcast session, fetched once and cached for the
/// session's duration.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapData {
    pub polylines: RoutePolyline,
    pub markers: Option<Vec<RouteMarker>>,
}

impl MapData {
    pub fn find_marker(&self, label: MarkerLabel) -> Option<&RouteMarker> {
        self.markers
            .as_deref()
            .and_then(|markers| markers.iter().find(|marker| marker.label == label))
    }
}

impl ExampleData for MapData {
    fn example_data() -> Self {
        // Short out-and-back course along a river, roughly 10 km under the
        // flat-earth approximation.
        let points = vec![
            RoutePoint::with_elevation(37.5283, 126.9294, 12.0),
            RoutePoint::with_elevation(37.5300, 126.9450, 11.0),
            RoutePoint::with_elevation(37.5330, 126.9600, 14.0),
            RoutePoint::with_elevation(37.5370, 126.9760, 13.0),
            RoutePoint::with_elevation(37.5395, 126.9920, 15.0),
            RoutePoint::with_elevation(37.5410, 127.0080, 16.0),
            RoutePoint::with_elevation(37.5390, 127.0240, 13.0),
        ];
        let markers = vec![
            RouteMarker::new(37.5283, 126.9294, MarkerLabel::Start),
            RouteMarker::new(37.5330, 126.9600, MarkerLabel::Checkpoint(3)),
            RouteMarker::new(37.5395, 126.9920, MarkerLabel::Checkpoint(7)),
            RouteMarker::new(37.5390, 127.0240, MarkerLabel::Finish),
        ];
        Self {
            polylines: RoutePolyline::new(points),
            markers: Some(markers),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_point_wire_format() {
        let point: RoutePoint = serde_json::from_str("[37.53, 126.96]").unwrap();
        assert_eq!(point, RoutePoint::new(37.53, 126.96));
        assert_eq!(serde_json::to_string(&point).unwrap(), "[37.53,126.96]");

        let with_elevation: RoutePoint =
            serde_json::from_str("[37.53, 126.96, 14.0]").unwrap();
        assert_eq!(with_elevation.elevation, Some(14.0));

        assert!(serde_json::from_str::<RoutePoint>("[37.53]").is_err());
    }

    #[test]
    fn marker_label_wire_format() {
        let start: MarkerLabel = serde_json::from_str("\"START\"").unwrap();
        assert_eq!(start, MarkerLabel::Start);
        let checkpoint: MarkerLabel = serde_json::from_str("7").unwrap();
        assert_eq!(checkpoint, MarkerLabel::Checkpoint(7));
        assert_eq!(serde_json::to_string(&checkpoint).unwrap(), "7");
        assert!(serde_json::from_str::<MarkerLabel>("\"MIDDLE\"").is_err());
    }

    #[test]
    fn total_distance_of_a_degree_of_longitude() {
        let route = RoutePolyline::new(vec![
            RoutePoint::new(0.0, 0.0),
            RoutePoint::new(0.0, 0.5),
            RoutePoint::new(0.0, 1.0),
        ]);
        assert!((route.total_distance_km() - 111.0).abs() < 1e-9);
    }

    #[test]
    fn find_marker_by_label() {
        let map = MapData::example_data();
        assert!(map.find_marker(MarkerLabel::Start).is_some());
        assert!(map.find_marker(MarkerLabel::Checkpoint(3)).is_some());
        assert!(map.find_marker(MarkerLabel::Checkpoint(99)).is_none());
    }
}
