//! Clock events and the shifts derived from them.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// What a clock event records.
///
/// The canonical string forms are `clock_in` and `clock_out`. Spreadsheet
/// labels (e.g. "Pointer entrée") are mapped to these by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClockAction {
    ClockIn,
    ClockOut,
}

impl ClockAction {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ClockIn => "clock_in",
            Self::ClockOut => "clock_out",
        }
    }
}

impl fmt::Display for ClockAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClockAction {
    type Err = UnknownClockAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clock_in" | "in" => Ok(Self::ClockIn),
            "clock_out" | "out" => Ok(Self::ClockOut),
            _ => Err(UnknownClockAction(s.to_string())),
        }
    }
}

impl Serialize for ClockAction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ClockAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown clock action strings.
#[derive(Debug, Clone)]
pub struct UnknownClockAction(String);

impl fmt::Display for UnknownClockAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown clock action: {}", self.0)
    }
}

impl std::error::Error for UnknownClockAction {}

/// A dated record attributed to one person.
///
/// This lets filtering and counting work with different record
/// representations (clock events, raw spreadsheet rows, test fixtures).
pub trait PersonRecord {
    /// Returns the person the record belongs to.
    fn person(&self) -> &str;

    /// Returns when the record happened.
    fn timestamp(&self) -> NaiveDateTime;
}

/// A single time-clock record for one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockEvent {
    pub person: String,
    /// Local wall-clock time; exports carry no timezone.
    pub timestamp: NaiveDateTime,
    pub action: ClockAction,
}

impl ClockEvent {
    pub fn new(person: impl Into<String>, timestamp: NaiveDateTime, action: ClockAction) -> Self {
        Self {
            person: person.into(),
            timestamp,
            action,
        }
    }
}

impl PersonRecord for ClockEvent {
    fn person(&self) -> &str {
        &self.person
    }

    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

/// A matched entry/exit pair.
///
/// `exit - entry` never exceeds the pairing cap, and `duration_hours` is
/// rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub person: String,
    pub entry: NaiveDateTime,
    pub exit: NaiveDateTime,
    pub duration_hours: f64,
}

impl Shift {
    /// True when the shift ends on a later calendar day than it starts.
    pub fn crosses_midnight(&self) -> bool {
        self.exit.date() > self.entry.date()
    }
}

/// Rounds an hour count to the canonical two-decimal precision.
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn roundtrip_all_variants() {
        for variant in [ClockAction::ClockIn, ClockAction::ClockOut] {
            let s = variant.to_string();
            let parsed: ClockAction = s.parse().expect("should parse");
            assert_eq!(parsed, variant, "roundtrip failed for {variant:?}");
        }
    }

    #[test]
    fn short_aliases_parse() {
        assert_eq!("in".parse::<ClockAction>().unwrap(), ClockAction::ClockIn);
        assert_eq!("out".parse::<ClockAction>().unwrap(), ClockAction::ClockOut);
    }

    #[test]
    fn unknown_action_errors() {
        let err = "Pointer pause".parse::<ClockAction>().unwrap_err();
        assert_eq!(err.to_string(), "unknown clock action: Pointer pause");
    }

    #[test]
    fn event_serializes_action_as_snake_case() {
        let ts = NaiveDate::from_ymd_opt(2025, 1, 10)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let event = ClockEvent::new("A", ts, ClockAction::ClockIn);
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"person":"A","timestamp":"2025-01-10T08:00:00","action":"clock_in"}"#
        );

        let parsed: ClockEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn round_hours_keeps_two_decimals() {
        assert!((round_hours(8.5) - 8.5).abs() < f64::EPSILON);
        assert!((round_hours(7.0 + 20.0 / 60.0) - 7.33).abs() < f64::EPSILON);
        assert!((round_hours(2.0 / 3.0) - 0.67).abs() < f64::EPSILON);
    }
}
