use std::{borrow::Cow, fmt, num::ParseIntError, str::FromStr};

use schemars::{
    gen::SchemaGenerator,
    schema::{InstanceType, Schema, SchemaObject},
    JsonSchema,
};
use serde::{de, Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseTimeError {
    WrongNumberOfParts { expected: usize, found: usize },
    InvalidNumber(ParseIntError),
}

impl std::error::Error for ParseTimeError {}

impl fmt::Display for ParseTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseTimeError::WrongNumberOfParts { expected, found } => {
                write!(f, "expected {} colon-separated parts, found {}", expected, found)
            }
            ParseTimeError::InvalidNumber(why) => write!(f, "invalid number: {}", why),
        }
    }
}

impl From<ParseIntError> for ParseTimeError {
    fn from(why: ParseIntError) -> Self {
        ParseTimeError::InvalidNumber(why)
    }
}

fn parse_parts(value: &str, expected: usize) -> Result<Vec<u32>, ParseTimeError> {
    let parts = value
        .split(':')
        .map(|part| part.parse::<u32>())
        .collect::<Result<Vec<_>, _>>()?;
    if parts.len() != expected {
        return Err(ParseTimeError::WrongNumberOfParts {
            expected,
            found: parts.len(),
        });
    }
    Ok(parts)
}

/// Average pace in minutes and seconds per kilometer, `MM:SS` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pace {
    seconds_per_km: u32,
}

impl Pace {
    pub fn from_seconds_per_km(seconds_per_km: u32) -> Self {
        Self { seconds_per_km }
    }

    pub fn seconds_per_km(&self) -> u32 {
        self.seconds_per_km
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.seconds_per_km / 60, self.seconds_per_km % 60)
    }
}

impl FromStr for Pace {
    type Err = ParseTimeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts = parse_parts(value, 2)?;
        Ok(Self::from_seconds_per_km(parts[0] * 60 + parts[1]))
    }
}

/// A race record or target, `HH:MM:SS` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordTime {
    total_seconds: u32,
}

impl RecordTime {
    pub fn from_seconds(total_seconds: u32) -> Self {
        Self { total_seconds }
    }

    pub fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self::from_seconds(hours * 3600 + minutes * 60 + seconds)
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    /// Average pace over the given distance, rounded to whole seconds.
    pub fn average_pace(&self, distance_km: f64) -> Option<Pace> {
        if distance_km <= 0.0 {
            return None;
        }
        let seconds_per_km = (self.total_seconds as f64 / distance_km).round();
        Some(Pace::from_seconds_per_km(seconds_per_km as u32))
    }
}

impl fmt::Display for RecordTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.total_seconds / 3600,
            self.total_seconds % 3600 / 60,
            self.total_seconds % 60
        )
    }
}

impl FromStr for RecordTime {
    type Err = ParseTimeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts = parse_parts(value, 3)?;
        Ok(Self::from_hms(parts[0], parts[1], parts[2]))
    }
}

macro_rules! string_serde {
    ($type:ty, $format:literal) => {
        impl Serialize for $type {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $type {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let value = String::deserialize(deserializer)?;
                value.parse().map_err(de::Error::custom)
            }
        }

        impl JsonSchema for $type {
            fn schema_name() -> String {
                stringify!($type).to_owned()
            }

            fn schema_id() -> Cow<'static, str> {
                Cow::Borrowed(concat!(module_path!(), "::", stringify!($type)))
            }

            fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
                SchemaObject {
                    instance_type: Some(InstanceType::String.into()),
                    format: Some($format.to_owned()),
                    ..Default::default()
                }
                .into()
            }
        }
    };
}

string_serde!(Pace, "mm:ss");
string_serde!(RecordTime, "hh:mm:ss");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pace_parses_and_formats() {
        let pace: Pace = "04:05".parse().unwrap();
        assert_eq!(pace.seconds_per_km(), 245);
        assert_eq!(pace.to_string(), "04:05");
    }

    #[test]
    fn record_parses_and_formats() {
        let record: RecordTime = "03:45:30".parse().unwrap();
        assert_eq!(record.total_seconds(), 3 * 3600 + 45 * 60 + 30);
        assert_eq!(record.to_string(), "03:45:30");
    }

    #[test]
    fn record_rejects_pace_format() {
        assert!(matches!(
            "45:30".parse::<RecordTime>(),
            Err(ParseTimeError::WrongNumberOfParts { expected: 3, found: 2 })
        ));
    }

    #[test]
    fn average_pace_over_half_course() {
        let record = RecordTime::from_hms(1, 45, 20);
        let pace = record.average_pace(21.0975).unwrap();
        // 6320 s / 21.0975 km ≈ 299.6 s/km
        assert_eq!(pace.seconds_per_km(), 300);
        assert!(record.average_pace(0.0).is_none());
    }

    #[test]
    fn serde_uses_display_strings() {
        let pace: Pace = serde_json::from_str("\"05:30\"").unwrap();
        assert_eq!(serde_json::to_string(&pace).unwrap(), "\"05:30\"");
    }
}
