use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Course variants offered by the races this client knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Course {
    Five,
    Ten,
    Eleven,
    Half,
    ThirtyTwoK,
    Full,
}

/// Official course lengths in kilometers, keyed by the wire label.
pub static COURSE_DISTANCES_KM: phf::Map<&'static str, f64> = phf::phf_map! {
    "FIVE" => 5.0,
    "TEN" => 10.0,
    "ELEVEN" => 11.0,
    "HALF" => 21.0975,
    "THIRTY_TWO_K" => 32.0,
    "FULL" => 42.195,
};

impl Course {
    pub fn label(&self) -> &'static str {
        match self {
            Course::Five => "FIVE",
            Course::Ten => "TEN",
            Course::Eleven => "ELEVEN",
            Course::Half => "HALF",
            Course::ThirtyTwoK => "THIRTY_TWO_K",
            Course::Full => "FULL",
        }
    }

    /// Short display name as shown in course filters ("10K", "HALF", ...).
    pub fn display_name(&self) -> &'static str {
        match self {
            Course::Five => "5K",
            Course::Ten => "10K",
            Course::Eleven => "11K",
            Course::Half => "HALF",
            Course::ThirtyTwoK => "32K",
            Course::Full => "FULL",
        }
    }

    pub fn distance_km(&self) -> f64 {
        COURSE_DISTANCES_KM[self.label()]
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn official_distances() {
        assert_eq!(Course::Full.distance_km(), 42.195);
        assert_eq!(Course::Half.distance_km(), 21.0975);
        assert_eq!(Course::Ten.distance_km(), 10.0);
    }

    #[test]
    fn wire_labels_round_trip() {
        for course in [
            Course::Five,
            Course::Ten,
            Course::Eleven,
            Course::Half,
            Course::ThirtyTwoK,
            Course::Full,
        ] {
            let json = serde_json::to_string(&course).unwrap();
            assert_eq!(json, format!("\"{}\"", course.label()));
            let back: Course = serde_json::from_str(&json).unwrap();
            assert_eq!(back, course);
        }
    }

    #[test]
    fn distance_table_covers_every_course() {
        assert_eq!(COURSE_DISTANCES_KM.len(), 6);
    }
}
